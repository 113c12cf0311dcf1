//! Metadata streams used by the identity reader.
//!
//! Only three of the five ECMA-335 streams matter for identity probing: the tables
//! stream (`#~`, or the uncompressed `#-`), the `#Strings` heap holding the assembly name
//! and culture, and the `#Blob` heap holding the public key.
//!
//! # Key Components
//!
//! - [`StreamHeader`] - Entry of the stream directory in the metadata root
//! - [`Strings`] - `#Strings` heap view
//! - [`Blob`] - `#Blob` heap view

mod blob;
mod streamheader;
mod strings;

pub use blob::Blob;
pub use streamheader::StreamHeader;
pub use strings::Strings;
