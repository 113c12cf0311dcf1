// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # gacscope
//!
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](LICENSE-APACHE)
//!
//! Lookup of .NET assemblies in a Mono-style global assembly cache, without a runtime.
//!
//! `gacscope` answers three questions about an installed cache: which assemblies does it
//! hold, which of them match a (partial) assembly display name, and which single file
//! should a request like `"System.Xml, Version=4.0"` load. Every candidate is verified by
//! reading its identity straight out of the PE image and its ECMA-335 metadata.
//!
//! ## Features
//!
//! - **Display names** - Parse `Name, Version=..., Culture=..., PublicKeyToken=...`
//! - **Identity reading** - Name, version, culture, token and architecture of any CLI image
//! - **Mono cache layout** - Core library directory, facades, and `gac/<Name>/<Version>_<Culture>_<Token>`
//! - **Lazy enumeration** - Candidates are produced on demand and re-read on every call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gacscope::prelude::*;
//!
//! let cache = GlobalAssemblyCache::system().expect("no Mono installation found");
//!
//! let (identity, path) = cache.resolve_partial_name(
//!     "System.Xml, Version=4.0.0.0, PublicKeyToken=b77a5c561934e089",
//!     &[],
//!     None,
//! )?;
//! println!("{identity}");
//! println!("  -> {}", path.display());
//! # Ok::<(), gacscope::ResolveError>(())
//! ```
//!
//! ### Custom Locations
//!
//! ```rust,no_run
//! use gacscope::{GlobalAssemblyCache, RepositoryLayout};
//!
//! let layout = RepositoryLayout::new("/opt/mono/lib/mono/4.5", "/opt/mono/lib/mono/gac");
//! let cache = GlobalAssemblyCache::new(layout);
//!
//! for identity in cache.assembly_identities_by_name(Some("System.Core"), &[]) {
//!     println!("{identity}");
//! }
//! ```
//!
//! ### Reading a Single File
//!
//! ```rust,no_run
//! use gacscope::AssemblyManifest;
//!
//! let manifest = AssemblyManifest::from_path("Widgets.dll".as_ref())?;
//! println!("{} built for {}", manifest.identity, manifest.runtime_version);
//! # Ok::<(), gacscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`gac`] - Candidate generation, verification and resolution
//! - [`metadata`] - The CLI header, metadata root, streams and `Assembly` table
//! - [`File`] - Memory-mapped PE access via `goblin`
//!
//! ## Error Handling
//!
//! Resolution failures are reported as [`ResolveError`]; display-name problems as
//! [`ParseError`]. [`Error`] is reserved for reading individual files, and a file that
//! fails to read during a cache lookup is skipped rather than reported.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: short-circuit hits and
//! resolutions at `debug`, individual misses at `trace`, unreadable candidates at `warn`.
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use gacscope::prelude::*;
///
/// let cache = GlobalAssemblyCache::new(RepositoryLayout::from_mono_prefix("/usr".as_ref()));
/// let names: Vec<String> = cache.assembly_simple_names(&[ProcessorArchitecture::X86]).collect();
/// println!("{} assemblies", names.len());
/// ```
pub mod prelude;

/// The global assembly cache: layout, queries, candidate generation and resolution
///
/// # Key Types
///
/// - [`gac::GlobalAssemblyCache`] - The resolution entry points
/// - [`gac::RepositoryLayout`] - Where the core library directory and cache root live
/// - [`gac::ResolutionQuery`] - A parsed (partial) display name
/// - [`gac::paths::CandidatePaths`] - Ordered candidate file paths
/// - [`gac::probe::CandidateProbe`] - Per-file verification and architecture filtering
pub mod gac;

/// Reading of ECMA-335 metadata, limited to what identifies an assembly
///
/// # Key Components
///
/// - [`metadata::manifest::AssemblyManifest`] - The identity of one image
/// - [`metadata::identity`] - Identity value types
/// - [`metadata::tables::AssemblyRaw`] - The raw `Assembly` row
pub mod metadata;

/// `gacscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` used by the file and metadata readers.
///
/// # Examples
///
/// ```rust,no_run
/// use gacscope::{AssemblyManifest, Result};
///
/// fn read(path: &str) -> Result<AssemblyManifest> {
///     AssemblyManifest::from_path(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `gacscope` Error types
///
/// [`Error`] describes why one file could not be read, [`ParseError`] why a display name
/// was rejected, and [`ResolveError`] why a resolution produced no assembly.
///
/// # Examples
///
/// ```rust,no_run
/// use gacscope::{GlobalAssemblyCache, ResolveError};
///
/// let cache = GlobalAssemblyCache::system().expect("no Mono installation found");
/// match cache.resolve_partial_name("System.Missing", &[], None) {
///     Ok((identity, _)) => println!("Found {identity}"),
///     Err(ResolveError::NotFound) => println!("Not installed"),
///     Err(ResolveError::BadQuery(error)) => println!("Bad name: {error}"),
/// }
/// ```
pub use error::{Error, ParseError, ResolveError};

/// Identity of a single assembly file.
///
/// # Example
///
/// ```rust,no_run
/// use gacscope::AssemblyManifest;
///
/// let manifest = AssemblyManifest::from_path(std::path::Path::new("mscorlib.dll"))?;
/// assert_eq!(manifest.identity.name, "mscorlib");
/// # Ok::<(), gacscope::Error>(())
/// ```
pub use metadata::manifest::AssemblyManifest;

/// Assembly identity value types.
pub use metadata::identity::{
    AssemblyIdentity, AssemblyVersion, ProcessorArchitecture, PublicKeyToken,
};

/// Resolution entry point and its inputs.
///
/// # Example
///
/// ```rust,no_run
/// use gacscope::{GlobalAssemblyCache, ResolutionQuery};
///
/// let cache = GlobalAssemblyCache::system().expect("no Mono installation found");
/// let query: ResolutionQuery = "System.Data, Version=4.0".parse()?;
/// for (identity, path) in cache.identities_and_paths(&query) {
///     println!("{identity} -> {}", path.display());
/// }
/// # Ok::<(), gacscope::ParseError>(())
/// ```
pub use gac::{GlobalAssemblyCache, RepositoryLayout, ResolutionQuery, VersionSpec};

/// Low-level file and byte parsing utilities.
///
/// # Example
///
/// ```rust
/// use gacscope::Parser;
///
/// let mut parser = Parser::new(&[0x81, 0x02, 0xAA]);
/// assert_eq!(parser.read_compressed_uint()?, 0x102);
/// assert_eq!(parser.read_le::<u8>()?, 0xAA);
/// # Ok::<(), gacscope::Error>(())
/// ```
pub use file::{parser::Parser, File};
