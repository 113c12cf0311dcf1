//! Stream headers of the metadata root directory (ECMA-335 II.24.2.2).

use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// Names of the streams a metadata root may list.
const KNOWN_STREAMS: [&str; 6] = ["#Strings", "#US", "#Blob", "#GUID", "#~", "#-"];

/// One entry of the metadata stream directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Memory offset with start of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of this stream in bytes, shall be a multiple of 4
    pub size: u32,
    /// Name of Stream\0 max 32char
    pub name: String,
}

impl StreamHeader {
    /// Create a `StreamHeader` object from a sequence of bytes
    ///
    /// # Arguments
    /// * 'data' - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is too short or the stream name is not a known stream
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let name_bytes = &data[8..data.len().min(8 + 32)];
        let name_len = name_bytes
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| malformed_error!("Stream header name is not terminated"))?;
        let name = String::from_utf8_lossy(&name_bytes[..name_len]).into_owned();

        if !KNOWN_STREAMS.iter().any(|valid_name| name == *valid_name) {
            return Err(malformed_error!("Invalid stream header name - {}", name));
        }

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name,
        })
    }

    /// Size of this header inside the directory: 8 bytes plus the name padded to 4.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x23, 0x7E, 0x00,
        ];

        let parsed_header = StreamHeader::from(&header_bytes).unwrap();

        assert_eq!(parsed_header.offset, 0x6C);
        assert_eq!(parsed_header.size, 0x45A4);
        assert_eq!(parsed_header.name, "#~");
        assert_eq!(parsed_header.encoded_len(), 12);
    }

    #[test]
    fn crafted_uncompressed_tables() {
        let header_bytes = [0x6C, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x23, 0x2D, 0x00];

        let parsed_header = StreamHeader::from(&header_bytes).unwrap();
        assert_eq!(parsed_header.name, "#-");
    }

    #[test]
    fn crafted_invalid() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x24, 0x7E, 0x00,
        ];

        assert!(StreamHeader::from(&header_bytes).is_err());

        // Unterminated name
        let unterminated = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x23];
        assert!(StreamHeader::from(&unterminated).is_err());
    }
}
