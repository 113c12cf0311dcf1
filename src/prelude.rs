//! # gacscope Prelude
//!
//! The types most callers need to query a global assembly cache, for glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The error type of the file and metadata readers
pub use crate::Error;

/// Display-name and resolution failures
pub use crate::{ParseError, ResolveError};

/// The result type of the file and metadata readers
pub use crate::Result;

// ================================================================================================
// Resolution
// ================================================================================================

/// Entry point and configuration of cache lookups
pub use crate::gac::{GlobalAssemblyCache, RepositoryLayout};

/// Queries built from display names
pub use crate::gac::{parse_display_name, ResolutionQuery, VersionSpec};

// ================================================================================================
// Identities
// ================================================================================================

/// Assembly identity value types
pub use crate::metadata::identity::{
    AssemblyIdentity, AssemblyVersion, ProcessorArchitecture, PublicKeyToken,
};

/// Identity reading for a single file
pub use crate::AssemblyManifest;
