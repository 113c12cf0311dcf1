//! Verification of candidate paths.

use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::metadata::{
    identity::{AssemblyIdentity, ProcessorArchitecture},
    manifest::AssemblyManifest,
};

/// Turns candidate paths into verified `(identity, path)` pairs.
///
/// A candidate survives when the file exists, reads as an assembly manifest, and its
/// declared architecture passes the filter.
#[derive(Debug, Clone, Default)]
pub struct CandidateProbe {
    architectures: Vec<ProcessorArchitecture>,
}

impl CandidateProbe {
    /// A probe accepting the given architectures; an empty filter accepts all.
    #[must_use]
    pub fn new(architectures: &[ProcessorArchitecture]) -> Self {
        CandidateProbe {
            architectures: architectures.to_vec(),
        }
    }

    /// Verify one candidate.
    ///
    /// Missing files, files that are not assemblies, and assemblies rejected by the
    /// architecture filter all yield `None`; unreadable files are logged at `warn`.
    #[must_use]
    pub fn probe(&self, path: PathBuf) -> Option<(AssemblyIdentity, PathBuf)> {
        if !path.is_file() {
            trace!("Candidate {} does not exist", path.display());
            return None;
        }

        let identity = match AssemblyManifest::from_path(&path) {
            Ok(manifest) => manifest.identity,
            Err(error) => {
                warn!("Skipping {}: {error}", path.display());
                return None;
            }
        };

        if !self.accepts(identity.processor_architecture) {
            debug!(
                "Skipping {}: architecture {:?} not accepted",
                path.display(),
                identity.processor_architecture
            );
            return None;
        }

        trace!("Candidate {} is {identity}", path.display());
        Some((identity, path))
    }

    /// Verify one candidate given by reference.
    #[must_use]
    pub fn probe_path(&self, path: &Path) -> Option<(AssemblyIdentity, PathBuf)> {
        self.probe(path.to_path_buf())
    }

    /// Architecture-neutral and unknown architectures always pass; specific ones must be
    /// listed in a non-empty filter.
    #[must_use]
    pub fn accepts(&self, architecture: Option<ProcessorArchitecture>) -> bool {
        match architecture {
            Some(architecture) if architecture.is_specific() => {
                self.architectures.is_empty() || self.architectures.contains(&architecture)
            }
            _ => true,
        }
    }
}
