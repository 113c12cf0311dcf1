use crate::{
    file::parser::Parser,
    metadata::tables::{TableId, TableInfo},
    Error::NotSupported,
    Result,
};

/// Row 1 of the `Assembly` table (0x20), with heap indexes left unresolved.
///
/// The `Assembly` table holds at most one row: the identity of the manifest module. Name
/// and culture index the `#Strings` heap, the public key indexes the `#Blob` heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRaw {
    /// `AssemblyHashAlgorithm` used for the file hashes of the manifest
    pub hash_alg_id: u32,
    /// Major version number
    pub major_version: u16,
    /// Minor version number
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags` bitmask
    pub flags: u32,
    /// Index into the `#Blob` heap: the full public key, 0 if unsigned
    pub public_key: u32,
    /// Index into the `#Strings` heap
    pub name: u32,
    /// Index into the `#Strings` heap, 0 for a neutral culture
    pub culture: u32,
}

impl AssemblyRaw {
    /// `PublicKey` flag: the `public_key` blob holds a full key rather than a token
    pub const FLAG_PUBLIC_KEY: u32 = 0x0001;

    /// Read the first `Assembly` row out of the tables stream.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the image has no `Assembly` row (a
    /// netmodule), or an error if the row lies outside the stream.
    pub fn read(data: &[u8], info: &TableInfo) -> Result<AssemblyRaw> {
        if !info.is_present(TableId::Assembly) || info.rows(TableId::Assembly) == 0 {
            return Err(NotSupported);
        }

        let mut parser = Parser::new(data);
        parser.seek(info.table_offset(TableId::Assembly)?)?;

        Ok(AssemblyRaw {
            hash_alg_id: parser.read_le::<u32>()?,
            major_version: parser.read_le::<u16>()?,
            minor_version: parser.read_le::<u16>()?,
            build_number: parser.read_le::<u16>()?,
            revision_number: parser.read_le::<u16>()?,
            flags: parser.read_le::<u32>()?,
            public_key: parser.read_index(info.is_large_blob())?,
            name: parser.read_index(info.is_large_str())?,
            culture: parser.read_index(info.is_large_str())?,
        })
    }
}
