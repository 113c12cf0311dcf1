//! Byte sources for [`crate::File`].
//!
//! Cache probing opens many files but reads only their headers and metadata, so files on
//! disk are memory-mapped. Owned buffers cover images that are already in memory.

use std::{fs, path::Path};

use memmap2::Mmap;

use crate::{Error::OutOfBounds, Result};

/// Source of the raw bytes of an image.
pub trait Backend: Send + Sync {
    /// The entire data buffer.
    fn data(&self) -> &[u8];

    /// Total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }

    /// A bounds-checked slice of `len` bytes at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range does not lie inside the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data().get(offset..end))
            .ok_or(OutOfBounds)
    }
}

/// An owned buffer.
#[derive(Debug)]
pub struct Memory(Vec<u8>);

impl Memory {
    pub fn new(data: Vec<u8>) -> Self {
        Memory(data)
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        &self.0
    }
}

/// A read-only memory map of a file on disk.
#[derive(Debug)]
pub struct Physical(Mmap);

impl Physical {
    /// Map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;

        // Safety: the map is read-only; truncation by another process while mapped
        // surfaces as a bus error, the same as for any mmap reader.
        let map = unsafe { Mmap::map(&file)? };

        Ok(Physical(map))
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error::FileError;

    #[test]
    fn memory() {
        let mut data = vec![0xCC_u8; 64];
        data[10..15].fill(0xBB);

        let memory = Memory::new(data);

        assert_eq!(memory.len(), 64);
        assert_eq!(memory.data_slice(10, 5).unwrap(), &[0xBB; 5]);
        assert_eq!(memory.data_slice(64, 0).unwrap(), &[] as &[u8]);
        assert!(memory.data_slice(60, 5).is_err());
        assert!(memory.data_slice(usize::MAX, 2).is_err());
    }

    #[test]
    fn physical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tiny.dll");
        fs::write(&path, [0x4D, 0x5A, 0x90, 0x00]).unwrap();

        let physical = Physical::open(&path).unwrap();

        assert_eq!(physical.len(), 4);
        assert_eq!(&physical.data()[..2], b"MZ");
        assert_eq!(physical.data_slice(2, 2).unwrap(), &[0x90, 0x00]);
        assert!(physical.data_slice(3, 2).is_err());
    }

    #[test]
    fn physical_missing() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            Physical::open(&dir.path().join("absent.dll")),
            Err(FileError(_))
        ));
    }
}
