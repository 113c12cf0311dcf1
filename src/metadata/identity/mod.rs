//! Assembly identity types.
//!
//! An identity is what the global assembly cache is keyed on: simple name, four-part
//! version, culture, and public key token, plus the processor architecture the image
//! declares. Identities are read from files by [`crate::metadata::manifest`] and
//! compared against queries by [`crate::gac`].
//!
//! # Key Components
//!
//! - [`AssemblyIdentity`] - Complete assembly identification
//! - [`AssemblyVersion`] - Four-part version numbering with parsing and comparison
//! - [`ProcessorArchitecture`] - Processor architecture, and its derivation from headers
//! - [`PublicKeyToken`] - 8-byte strong-name fingerprint
//!
//! # ECMA-335 References
//!
//! - **Section II.6.2.1.3**: PublicKeyToken computation
//! - **Section II.22.2**: Assembly table

mod assembly;
mod token;

pub(crate) use assembly::{escape_display_value, parse_components};
pub use assembly::{AssemblyIdentity, AssemblyVersion, ProcessorArchitecture};
pub use token::PublicKeyToken;
