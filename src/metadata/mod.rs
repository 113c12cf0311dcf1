//! Lightweight ECMA-335 metadata reading.
//!
//! This module reads the handful of structures needed to identify an assembly file:
//! the CLI header, the metadata root, the tables stream header, the `Assembly` row and
//! the `#Strings` and `#Blob` heaps. Nothing else in the metadata is decoded.
//!
//! # Key Components
//!
//! - [`manifest::AssemblyManifest`] - Identity and manifest facts of one file
//! - [`identity`] - Identity value types shared with the resolver
//! - [`cor20header`], [`root`], [`streams`], [`tables`] - The structures on the way there
//!
//! # Examples
//!
//! ```rust,no_run
//! use gacscope::metadata::manifest::AssemblyManifest;
//! use std::path::Path;
//!
//! let manifest = AssemblyManifest::from_path(Path::new("System.Xml.dll"))?;
//! println!("{} ({})", manifest.identity, manifest.runtime_version);
//! # Ok::<(), gacscope::Error>(())
//! ```

/// Implementation of the Header of CIL
pub mod cor20header;
/// Assembly identity value types
pub mod identity;
/// Identity extraction from a CLI image
pub mod manifest;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of the metadata streams the reader needs
pub mod streams;
/// Implementation of the tables stream header and the `Assembly` row
pub mod tables;
