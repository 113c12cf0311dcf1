//! The compressed metadata tables stream (`#~`).
//!
//! Identity probing needs exactly one row out of this stream: row 1 of the `Assembly`
//! table. Tables are stored back to back in [`TableId`] order, so locating that row
//! requires knowing the row size of every present table before it, which in turn depends
//! on heap index widths and coded index widths. [`TableInfo`] computes those widths from the
//! stream header; [`AssemblyRaw`] decodes the row itself.
//!
//! # Reference
//! - [ECMA-335 II.22 and II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod assembly;
mod codedindex;
mod tableinfo;

pub use assembly::AssemblyRaw;
pub use codedindex::CodedIndexType;
pub use tableinfo::TableInfo;

use strum::{EnumCount, EnumIter};

/// Identifiers of the metadata tables that can appear before, or be referenced from,
/// the `Assembly` table.
///
/// The discriminant equals the table number and the bit position in the `valid` mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumCount)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TableId {
    Module = 0x00,
    TypeRef = 0x01,
    TypeDef = 0x02,
    FieldPtr = 0x03,
    Field = 0x04,
    MethodPtr = 0x05,
    MethodDef = 0x06,
    ParamPtr = 0x07,
    Param = 0x08,
    InterfaceImpl = 0x09,
    MemberRef = 0x0A,
    Constant = 0x0B,
    CustomAttribute = 0x0C,
    FieldMarshal = 0x0D,
    DeclSecurity = 0x0E,
    ClassLayout = 0x0F,
    FieldLayout = 0x10,
    StandAloneSig = 0x11,
    EventMap = 0x12,
    EventPtr = 0x13,
    Event = 0x14,
    PropertyMap = 0x15,
    PropertyPtr = 0x16,
    Property = 0x17,
    MethodSemantics = 0x18,
    MethodImpl = 0x19,
    ModuleRef = 0x1A,
    TypeSpec = 0x1B,
    ImplMap = 0x1C,
    FieldRVA = 0x1D,
    EncLog = 0x1E,
    EncMap = 0x1F,
    Assembly = 0x20,
    AssemblyProcessor = 0x21,
    AssemblyOS = 0x22,
    AssemblyRef = 0x23,
    AssemblyRefProcessor = 0x24,
    AssemblyRefOS = 0x25,
    File = 0x26,
    ExportedType = 0x27,
    ManifestResource = 0x28,
    NestedClass = 0x29,
    GenericParam = 0x2A,
    MethodSpec = 0x2B,
    GenericParamConstraint = 0x2C,
}
