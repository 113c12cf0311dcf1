//! PE file access for assembly identity probing.
//!
//! This module wraps a memory-mapped (or in-memory) PE image together with its parsed
//! [`goblin`] headers. It is the lowest layer of the identity reader: it validates that the
//! image carries a CLR runtime header, exposes the header fields the reader needs (machine
//! type, CLR directory) and translates relative virtual addresses into file offsets.
//!
//! # Key Components
//!
//! - [`File`] - A loaded PE image with .NET metadata
//! - [`backend::Backend`] - Source of the raw bytes (memory map or owned buffer)
//! - [`parser::Parser`] - Sequential reader used by the metadata layer
//!
//! # Examples
//!
//! ```rust,no_run
//! use gacscope::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("/usr/lib/mono/4.5/mscorlib.dll"))?;
//! let (clr_rva, clr_size) = file.clr();
//! println!("CLR header at RVA 0x{:x}, size: {} bytes", clr_rva, clr_size);
//! println!("Machine: 0x{:04x}", file.machine());
//! # Ok::<(), gacscope::Error>(())
//! ```

pub mod backend;
pub mod io;
pub mod parser;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};
use backend::{Backend, Memory, Physical};
use goblin::pe::PE;
use ouroboros::self_referencing;

#[self_referencing]
/// A loaded PE image that carries a CLR runtime header.
///
/// Construction fails for anything that is not a PE image with an optional header and
/// a CLR runtime header directory, which makes [`File`] the first filter applied to a
/// candidate found in the assembly cache.
pub struct File {
    /// The underlying data of the file
    data: Box<dyn Backend>,
    /// The parsed PE headers, borrowing from `data`
    #[borrows(data)]
    #[covariant]
    pe: PE<'this>,
}

impl File {
    /// Loads a PE file from disk by memory-mapping it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, is empty, is not a PE
    /// image, or has no CLR runtime header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::open(file)?;

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, is not a PE image, or has no CLR runtime
    /// header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data: Box<dyn Backend> = Box::new(data);

        File::try_new(data, |data| match PE::parse(data.data()) {
            Ok(pe) => match pe.header.optional_header {
                Some(optional_header) => {
                    if optional_header
                        .data_directories
                        .get_clr_runtime_header()
                        .is_none()
                    {
                        Err(malformed_error!(
                            "File does not have a CLR runtime header directory"
                        ))
                    } else {
                        Ok(pe)
                    }
                }
                None => Err(malformed_error!("File does not have an OptionalHeader")),
            },
            Err(error) => Err(GoblinErr(error)),
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_data(|data| data.len())
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw data of the loaded file.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a bounds-checked slice of the file data.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Returns the COFF machine type (`IMAGE_FILE_MACHINE_*`).
    #[must_use]
    pub fn machine(&self) -> u16 {
        self.with_pe(|pe| pe.header.coff_header.machine)
    }

    /// Returns `true` for PE32+ images.
    #[must_use]
    pub fn is_pe32_plus(&self) -> bool {
        self.with_pe(|pe| pe.is_64)
    }

    /// Returns the RVA and size of the CLR runtime header.
    ///
    /// Loading guarantees the directory exists; `(0, 0)` is never returned for a
    /// successfully loaded file.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            pe.header
                .optional_header
                .as_ref()
                .and_then(|optional_header| {
                    optional_header
                        .data_directories
                        .get_clr_runtime_header()
                        .as_ref()
                        .map(|clr_dir| (clr_dir.virtual_address as usize, clr_dir.size as usize))
                })
                .unwrap_or((0, 0))
        })
    }

    /// Converts a relative virtual address into a file offset using the section table.
    ///
    /// # Errors
    ///
    /// Returns an error if the RVA does not fall inside any section, or a section header
    /// is malformed.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let section_size = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(section_size) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
