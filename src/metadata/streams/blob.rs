//! The `#Blob` heap: length-prefixed binary values (ECMA-335 II.24.2.4).

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Read-only view over the `#Blob` heap.
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a `Blob` view over the raw heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the mandatory empty blob
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Get the blob starting at `index`, without its compressed length prefix.
    ///
    /// # Errors
    /// Returns an error if the index or the encoded length point outside the heap
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        parser.read_bytes(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0x00,
            0x03, 0x01, 0x02, 0x03,
            0x00,
            0x02, 0xAA, 0xBB,
        ];

        let blob = Blob::from(&data).unwrap();

        assert!(blob.get(0).unwrap().is_empty());
        assert_eq!(blob.get(1).unwrap(), &[0x01, 0x02, 0x03]);
        assert!(blob.get(5).unwrap().is_empty());
        assert_eq!(blob.get(6).unwrap(), &[0xAA, 0xBB]);
    }

    #[test]
    fn crafted_invalid() {
        assert!(Blob::from(&[]).is_err());
        assert!(Blob::from(&[0x01]).is_err());

        // Length prefix claims more data than the heap holds
        let blob = Blob::from(&[0x00, 0x05, 0x01]).unwrap();
        assert!(blob.get(1).is_err());
        assert!(blob.get(3).is_err());
    }
}
