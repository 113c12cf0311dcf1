//! The `#Strings` heap: NUL-terminated UTF-8 identifiers (ECMA-335 II.24.2.3).

use std::{ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// Read-only view over the `#Strings` heap.
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a `Strings` view over the raw heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the mandatory empty string
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Get the string starting at `index`.
    ///
    /// # Errors
    /// Returns an error if the index is past the heap, or the string is unterminated or not UTF-8
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
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
            0x3c, 0x4d, 0x6f, 0x64, 0x75, 0x6c, 0x65, 0x3e, 0x00,
            0x53, 0x79, 0x73, 0x74, 0x65, 0x6d, 0x00,
            0x65, 0x6e, 0x2d, 0x55, 0x53, 0x00,
        ];

        let str_view = Strings::from(&data).unwrap();

        assert_eq!(str_view.get(0).unwrap(), "");
        assert_eq!(str_view.get(1).unwrap(), "<Module>");
        assert_eq!(str_view.get(10).unwrap(), "System");
        assert_eq!(str_view.get(17).unwrap(), "en-US");
        assert_eq!(str_view.get(19).unwrap(), "-US");
        assert!(str_view.get(data.len()).is_err());
    }

    #[test]
    fn crafted_invalid() {
        assert!(Strings::from(&[]).is_err());
        assert!(Strings::from(&[0x41, 0x00]).is_err());

        let unterminated = Strings::from(&[0x00, 0x41, 0x42]).unwrap();
        assert!(unterminated.get(1).is_err());
    }
}
