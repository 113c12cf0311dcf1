//! CLI (Cor20) header parsing.
//!
//! The CLI header sits at the start of the `IMAGE_DIRECTORY_ENTRY_COM_DESCRIPTOR` data
//! directory. The identity reader needs two things from it: where the metadata root lives,
//! and the runtime flags that, together with the PE machine type, determine the declared
//! processor architecture of the assembly.
//!
//! # Reference
//! - [ECMA-335 II.25.3.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use bitflags::bitflags;

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

bitflags! {
    /// Runtime flags of the CLI header (`COMIMAGE_FLAGS_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CorFlags: u32 {
        /// The image contains only IL code
        const IL_ONLY = 0x0000_0001;
        /// The image can only be loaded into a 32-bit process
        const REQUIRED_32BIT = 0x0000_0002;
        /// Obsolete IL library flag
        const IL_LIBRARY = 0x0000_0004;
        /// The image has a strong name signature
        const STRONG_NAME_SIGNED = 0x0000_0008;
        /// The entry point is a native RVA rather than a token
        const NATIVE_ENTRYPOINT = 0x0000_0010;
        /// Runtime should track debug data
        const TRACK_DEBUG_DATA = 0x0001_0000;
        /// Together with `REQUIRED_32BIT`: AnyCPU, but prefer a 32-bit process
        const PREFERRED_32BIT = 0x0002_0000;
    }
}

/// The fixed 72-byte CLI header.
///
/// Only the fields the identity reader consumes are kept.
#[derive(Debug, Clone, Copy)]
pub struct Cor20Header {
    /// Size of header in bytes
    pub cb: u32,
    /// The minimum version of runtime required to run this program
    pub major_runtime_version: u16,
    /// The minor portion of the version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata
    pub meta_data_size: u32,
    /// Flags describing this runtime
    pub flags: CorFlags,
}

impl Cor20Header {
    /// Size of the CLI header in bytes.
    pub const SIZE: usize = 72;

    /// Read the CLI header from the start of `data`.
    ///
    /// Unknown flag bits are retained rather than rejected; newer compilers emit flags
    /// (such as `PREFERRED_32BIT`) that older readers did not know.
    ///
    /// # Errors
    /// Returns an error if the data is shorter than 72 bytes, `cb` is not 72, or the
    /// metadata directory is empty or implausibly large.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < Self::SIZE {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != Self::SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let flags = CorFlags::from_bits_retain(parser.read_le::<u32>()?);

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x48, 0x00, 0x00, 0x00,
            0x02, 0x00,
            0x05, 0x00,
            0x50, 0x20, 0x00, 0x00,
            0x3C, 0x01, 0x00, 0x00,
            0x09, 0x00, 0x02, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let header = Cor20Header::read(&header_bytes).unwrap();

        assert_eq!(header.cb, 72);
        assert_eq!(header.major_runtime_version, 2);
        assert_eq!(header.minor_runtime_version, 5);
        assert_eq!(header.meta_data_rva, 0x2050);
        assert_eq!(header.meta_data_size, 0x13C);
        assert!(header.flags.contains(CorFlags::IL_ONLY));
        assert!(header.flags.contains(CorFlags::STRONG_NAME_SIGNED));
        assert!(header.flags.contains(CorFlags::PREFERRED_32BIT));
        assert!(!header.flags.contains(CorFlags::REQUIRED_32BIT));
    }

    #[test]
    fn crafted_invalid() {
        let mut header_bytes = [0u8; 72];
        assert!(Cor20Header::read(&header_bytes[..40]).is_err());

        // cb must be 72
        header_bytes[0] = 0x40;
        assert!(Cor20Header::read(&header_bytes).is_err());

        // metadata directory must not be empty
        header_bytes[0] = 0x48;
        assert!(Cor20Header::read(&header_bytes).is_err());
    }
}
