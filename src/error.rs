use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, covering every failure of the lightweight metadata reader.
///
/// These errors describe why a single file could not be read as a .NET assembly. The
/// resolver never surfaces them to its callers: a candidate that fails to read is simply
/// not a candidate. They are returned directly by [`crate::AssemblyManifest`] and
/// [`crate::File`] for callers that inspect individual files.
///
/// # Error Categories
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file boundaries
/// - [`Error::NotSupported`] - A valid image that is not an assembly manifest
/// - [`Error::Empty`] - Empty input provided
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from goblin crate
///
/// # Examples
///
/// ```rust,no_run
/// use gacscope::{AssemblyManifest, Error};
/// use std::path::Path;
///
/// match AssemblyManifest::from_path(Path::new("System.dll")) {
///     Ok(manifest) => println!("{}", manifest.identity),
///     Err(Error::NotSupported) => eprintln!("not an assembly manifest"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// Includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Returned for CLI images without an Assembly table (netmodules), which carry no
    /// assembly identity.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}

/// Failure to parse an assembly display name.
///
/// Local to display-name parsing; [`crate::gac::GlobalAssemblyCache::resolve_partial_name`]
/// surfaces it wrapped in [`ResolveError::BadQuery`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `Version` or `PublicKeyToken` value could not be parsed.
    #[error("Malformed display name - {0}")]
    Malformed(String),

    /// The simple name segment is empty or whitespace.
    #[error("Assembly name cannot be empty")]
    EmptyName,
}

/// The failure outcomes of resolving a partial display name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The display name could not be parsed.
    #[error("Invalid assembly display name: {0}")]
    BadQuery(#[from] ParseError),

    /// No candidate in the repository matched the query.
    #[error("No matching assembly found in the global assembly cache")]
    NotFound,
}
