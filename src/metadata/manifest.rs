//! Lightweight assembly manifest reader.
//!
//! Reads just enough of a CLI image to recover its [`AssemblyIdentity`]: the CLI header,
//! the metadata root, the tables stream header, row 1 of the `Assembly` table and the
//! heap entries it points at. Method bodies, types and every other table are never
//! touched; on a memory-mapped file only the header pages and the start of the metadata
//! are paged in.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gacscope::AssemblyManifest;
//! use std::path::Path;
//!
//! let manifest = AssemblyManifest::from_path(Path::new("/usr/lib/mono/4.5/mscorlib.dll"))?;
//! println!("{}", manifest.identity);
//! # Ok::<(), gacscope::Error>(())
//! ```

use std::path::Path;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        identity::{AssemblyIdentity, AssemblyVersion, ProcessorArchitecture, PublicKeyToken},
        root::Root,
        streams::{Blob, Strings},
        tables::{AssemblyRaw, TableInfo},
    },
    Result,
};

/// The manifest facts of one assembly file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyManifest {
    /// Identity recorded in the `Assembly` row, with the declared architecture filled in
    pub identity: AssemblyIdentity,
    /// `AssemblyFlags` of the `Assembly` row
    pub flags: u32,
    /// Hash algorithm of the manifest file hashes
    pub hash_alg_id: u32,
    /// Runtime version string of the metadata root (e.g. `v4.0.30319`)
    pub runtime_version: String,
}

impl AssemblyManifest {
    /// Read the manifest of the file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be mapped, is not a CLI image, or carries no
    /// `Assembly` row ([`crate::Error::NotSupported`]).
    pub fn from_path(path: &Path) -> Result<AssemblyManifest> {
        Self::read(&File::from_file(path)?)
    }

    /// Read the manifest of an in-memory image.
    ///
    /// # Errors
    /// See [`AssemblyManifest::from_path`].
    pub fn from_mem(data: Vec<u8>) -> Result<AssemblyManifest> {
        Self::read(&File::from_mem(data)?)
    }

    /// Read the manifest of a loaded file.
    ///
    /// # Errors
    /// See [`AssemblyManifest::from_path`].
    pub fn read(file: &File) -> Result<AssemblyManifest> {
        let (clr_rva, clr_size) = file.clr();
        if clr_size < Cor20Header::SIZE {
            return Err(malformed_error!(
                "CLR runtime header directory too small - {}",
                clr_size
            ));
        }

        let clr_offset = file.rva_to_offset(clr_rva)?;
        let header = Cor20Header::read(file.data_slice(clr_offset, Cor20Header::SIZE)?)?;

        let meta_offset = file.rva_to_offset(header.meta_data_rva as usize)?;
        let metadata = file.data_slice(meta_offset, header.meta_data_size as usize)?;

        let root = Root::read(metadata)?;
        let tables = root
            .stream_data(metadata, "#~")
            .or_else(|| root.stream_data(metadata, "#-"))
            .ok_or_else(|| malformed_error!("Metadata has no tables stream"))?;
        let strings = Strings::from(
            root.stream_data(metadata, "#Strings")
                .ok_or_else(|| malformed_error!("Metadata has no #Strings heap"))?,
        )?;

        let info = TableInfo::read(tables)?;
        let row = AssemblyRaw::read(tables, &info)?;

        let name = strings.get(row.name as usize)?;
        if name.is_empty() {
            return Err(malformed_error!("Assembly name is empty"));
        }

        let culture = match strings.get(row.culture as usize)? {
            "" => None,
            culture if culture.eq_ignore_ascii_case("neutral") => None,
            culture => Some(culture.to_string()),
        };

        let public_key_token = if row.public_key == 0 {
            None
        } else {
            let blob = Blob::from(
                root.stream_data(metadata, "#Blob")
                    .ok_or_else(|| malformed_error!("Metadata has no #Blob heap"))?,
            )?;
            token_of(blob.get(row.public_key as usize)?, row.flags)
        };

        let identity = AssemblyIdentity::new(
            name,
            AssemblyVersion::new(
                row.major_version,
                row.minor_version,
                row.build_number,
                row.revision_number,
            ),
            culture,
            public_key_token,
            ProcessorArchitecture::from_image(file.machine(), header.flags),
        );

        Ok(AssemblyManifest {
            identity,
            flags: row.flags,
            hash_alg_id: row.hash_alg_id,
            runtime_version: root.version,
        })
    }
}

/// The token of the `Assembly` row's key blob: hashed when it is a full key, taken as is
/// when it already is an 8-byte token.
fn token_of(key: &[u8], flags: u32) -> Option<PublicKeyToken> {
    if key.is_empty() {
        return None;
    }

    if flags & AssemblyRaw::FLAG_PUBLIC_KEY == 0 {
        if let Ok(bytes) = <[u8; 8]>::try_from(key) {
            return Some(PublicKeyToken::new(bytes));
        }
    }

    Some(PublicKeyToken::from_public_key(key))
}
