//! Lookup of assemblies in a Mono-style global assembly cache.
//!
//! [`GlobalAssemblyCache`] is the entry point. Every operation re-scans the filesystem:
//! [`paths::CandidatePaths`] produces candidate files in priority order and
//! [`probe::CandidateProbe`] reads each candidate's manifest and applies the architecture
//! filter. Nothing is cached between calls.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gacscope::{GlobalAssemblyCache, RepositoryLayout};
//! use std::path::Path;
//!
//! let cache = GlobalAssemblyCache::new(RepositoryLayout::from_mono_prefix(Path::new("/usr")));
//!
//! for name in cache.assembly_simple_names(&[]) {
//!     println!("{name}");
//! }
//!
//! let (identity, path) = cache.resolve_partial_name("System.Xml", &[], None)?;
//! println!("{identity} at {}", path.display());
//! # Ok::<(), gacscope::ResolveError>(())
//! ```

mod layout;
pub mod paths;
pub mod probe;
mod query;

pub use layout::{RepositoryLayout, DEFAULT_EXTENSION};
pub use query::{parse_display_name, ResolutionQuery, VersionSpec};

use std::{collections::HashSet, path::PathBuf};

use log::{debug, trace};

use crate::{
    gac::{paths::CandidatePaths, probe::CandidateProbe, query::normalize_culture},
    metadata::identity::{AssemblyIdentity, ProcessorArchitecture},
    ResolveError,
};

/// Verified candidates of one query, in candidate-generation order.
pub struct Candidates {
    paths: CandidatePaths,
    probe: CandidateProbe,
}

impl Iterator for Candidates {
    type Item = (AssemblyIdentity, PathBuf);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.paths.next()?;
            if let Some(candidate) = self.probe.probe(path) {
                return Some(candidate);
            }
        }
    }
}

/// Read-only view of one global assembly cache.
#[derive(Debug, Clone)]
pub struct GlobalAssemblyCache {
    layout: RepositoryLayout,
}

impl GlobalAssemblyCache {
    /// A cache rooted at `layout`.
    #[must_use]
    pub fn new(layout: RepositoryLayout) -> Self {
        GlobalAssemblyCache { layout }
    }

    /// The cache of the detected Mono installation, if there is one.
    #[must_use]
    pub fn system() -> Option<Self> {
        RepositoryLayout::system().cloned().map(Self::new)
    }

    /// The layout this cache reads.
    #[must_use]
    pub fn layout(&self) -> &RepositoryLayout {
        &self.layout
    }

    /// Verified `(identity, path)` pairs matching `query`, filtered by its architectures.
    #[must_use]
    pub fn identities_and_paths(&self, query: &ResolutionQuery) -> Candidates {
        Candidates {
            paths: CandidatePaths::new(&self.layout, query),
            probe: CandidateProbe::new(&query.architectures),
        }
    }

    /// Identities matching `query`, filtered by its architectures.
    pub fn assembly_identities(
        &self,
        query: &ResolutionQuery,
    ) -> impl Iterator<Item = AssemblyIdentity> {
        self.identities_and_paths(query)
            .map(|(identity, _)| identity)
    }

    /// Identities matching a display name, or the whole cache for `None`.
    ///
    /// A display name that does not parse yields nothing.
    pub fn assembly_identities_by_name(
        &self,
        partial_name: Option<&str>,
        architectures: &[ProcessorArchitecture],
    ) -> impl Iterator<Item = AssemblyIdentity> {
        let query = match partial_name {
            None => Some(ResolutionQuery::all()),
            Some(partial_name) => match parse_display_name(partial_name) {
                Ok(query) => Some(query),
                Err(error) => {
                    debug!("Ignoring display name '{partial_name}': {error}");
                    None
                }
            },
        };

        query
            .map(|query| self.identities_and_paths(&query.with_architectures(architectures)))
            .into_iter()
            .flatten()
            .map(|(identity, _)| identity)
    }

    /// Simple names of all assemblies in the cache, each once, in first-seen order.
    pub fn assembly_simple_names(
        &self,
        architectures: &[ProcessorArchitecture],
    ) -> impl Iterator<Item = String> {
        let mut seen = HashSet::new();

        self.identities_and_paths(&ResolutionQuery::all().with_architectures(architectures))
            .filter_map(move |(identity, _)| {
                seen.insert(identity.name.clone()).then_some(identity.name)
            })
    }

    /// Resolve a partial display name to one assembly.
    ///
    /// Candidates are visited in generation order. The first candidate is kept as the
    /// fallback; the first candidate whose culture equals `preferred_culture` wins and ends
    /// the scan. `None`, `"neutral"` and `""` all prefer culture-neutral assemblies.
    ///
    /// # Errors
    /// Returns [`ResolveError::BadQuery`] if the display name does not parse, and
    /// [`ResolveError::NotFound`] if no candidate survives.
    pub fn resolve_partial_name(
        &self,
        display_name: &str,
        architectures: &[ProcessorArchitecture],
        preferred_culture: Option<&str>,
    ) -> Result<(AssemblyIdentity, PathBuf), ResolveError> {
        let query = parse_display_name(display_name)?.with_architectures(architectures);
        let preferred = preferred_culture.and_then(normalize_culture);

        match select_preferred(self.identities_and_paths(&query), preferred.as_deref()) {
            Some((identity, path)) => {
                debug!("{display_name} resolved to {}", path.display());
                Ok((identity, path))
            }
            None => Err(ResolveError::NotFound),
        }
    }
}

/// The first candidate whose culture is `preferred`, else the first candidate.
///
/// Stops pulling from `candidates` at the first exact match.
fn select_preferred<I>(
    candidates: I,
    preferred: Option<&str>,
) -> Option<(AssemblyIdentity, PathBuf)>
where
    I: IntoIterator<Item = (AssemblyIdentity, PathBuf)>,
{
    let mut best = None;
    for (identity, path) in candidates {
        if identity.culture.as_deref() == preferred {
            return Some((identity, path));
        }

        if best.is_none() {
            trace!("{} is the fallback candidate", path.display());
            best = Some((identity, path));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            cor20header::CorFlags,
            identity::{AssemblyVersion, PublicKeyToken},
        },
        test::{builders::AssemblyImageBuilder, helpers::GacFixture},
        ParseError,
    };
    use std::cell::Cell;

    const TOKEN: PublicKeyToken =
        PublicKeyToken::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11]);

    fn satellite(culture: Option<&str>, major: u16) -> AssemblyImageBuilder {
        let builder = AssemblyImageBuilder::new("Widgets.resources")
            .version(major, 0, 0, 0)
            .public_key_token(TOKEN);
        match culture {
            Some(culture) => builder.culture(culture),
            None => builder,
        }
    }

    #[test]
    fn test_resolve_direct_path_scenario() {
        let fixture = GacFixture::with_extension("lib");
        let installed = fixture.install_in(
            &AssemblyImageBuilder::new("Widgets").public_key_token(TOKEN),
            "1.0.0.0__aabbccddeeff0011",
        );
        assert!(installed.ends_with("Widgets/1.0.0.0__aabbccddeeff0011/Widgets.lib"));

        let cache = GlobalAssemblyCache::new(fixture.layout());
        let (identity, path) = cache
            .resolve_partial_name(
                "Widgets, Version=1.0.0.0, PublicKeyToken=aabbccddeeff0011",
                &[],
                None,
            )
            .unwrap();

        assert_eq!(path, installed);
        assert_eq!(identity.name, "Widgets");
        assert_eq!(identity.version, AssemblyVersion::new(1, 0, 0, 0));
        assert_eq!(identity.public_key_token, Some(TOKEN));
    }

    #[test]
    fn test_resolve_errors() {
        let fixture = GacFixture::new();
        let cache = GlobalAssemblyCache::new(fixture.layout());

        assert_eq!(
            cache.resolve_partial_name("Missing", &[], None),
            Err(ResolveError::NotFound)
        );
        assert_eq!(
            cache.resolve_partial_name("  ", &[], None),
            Err(ResolveError::BadQuery(ParseError::EmptyName))
        );
        assert!(matches!(
            cache.resolve_partial_name("Widgets, Version=x", &[], None),
            Err(ResolveError::BadQuery(ParseError::Malformed(_)))
        ));
    }

    #[test]
    fn test_resolve_missing_direct_path() {
        let fixture = GacFixture::new();
        fixture.install(&satellite(None, 2));
        let cache = GlobalAssemblyCache::new(fixture.layout());

        // Pinned to a version that is not installed: no fallback to the scan
        assert_eq!(
            cache.resolve_partial_name(
                "Widgets.resources, Version=1.0.0.0, PublicKeyToken=aabbccddeeff0011",
                &[],
                None
            ),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_resolve_prefers_later_exact_culture() {
        let fixture = GacFixture::new();
        fixture.install(&satellite(Some("de-DE"), 1));
        fixture.install(&satellite(Some("en-US"), 2));
        fixture.install(&satellite(Some("es-ES"), 3));
        let french = fixture.install(&satellite(Some("fr-FR"), 4));
        fixture.install(&satellite(Some("it-IT"), 5));

        let cache = GlobalAssemblyCache::new(fixture.layout());
        let (identity, path) = cache
            .resolve_partial_name("Widgets.resources", &[], Some("fr-FR"))
            .unwrap();

        assert_eq!(path, french);
        assert_eq!(identity.culture.as_deref(), Some("fr-FR"));
    }

    #[test]
    fn test_resolve_stops_at_exact_culture() {
        let fixture = GacFixture::new();
        let german = fixture.install(&satellite(Some("de-DE"), 1));
        fixture.install(&satellite(Some("fr-FR"), 2));
        fixture.install(&satellite(Some("it-IT"), 3));

        let cache = GlobalAssemblyCache::new(fixture.layout());
        let query = ResolutionQuery::new("Widgets.resources");

        let pulls = |preferred: Option<&str>| {
            let pulled = Cell::new(0);
            let selected = select_preferred(
                cache
                    .identities_and_paths(&query)
                    .inspect(|_| pulled.set(pulled.get() + 1)),
                preferred,
            );
            (selected.map(|(_, path)| path), pulled.get())
        };

        assert_eq!(pulls(Some("de-DE")), (Some(german.clone()), 1));
        assert_eq!(pulls(Some("fr-FR")).1, 2);
        assert_eq!(pulls(Some("ja-JP")), (Some(german), 3));
        assert!(select_preferred(Vec::<(AssemblyIdentity, PathBuf)>::new(), None).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_first() {
        let fixture = GacFixture::new();
        let first = fixture.install(&satellite(Some("de-DE"), 1));
        fixture.install(&satellite(Some("en-US"), 2));

        let cache = GlobalAssemblyCache::new(fixture.layout());

        let (_, path) = cache
            .resolve_partial_name("Widgets.resources", &[], Some("ja-JP"))
            .unwrap();
        assert_eq!(path, first);

        // No neutral candidate either
        let (_, path) = cache
            .resolve_partial_name("Widgets.resources", &[], None)
            .unwrap();
        assert_eq!(path, first);
    }

    #[test]
    fn test_resolve_neutral_preference() {
        let fixture = GacFixture::new();
        fixture.install(&satellite(Some("de-DE"), 1));
        let neutral = fixture.install(&satellite(None, 2));

        let cache = GlobalAssemblyCache::new(fixture.layout());

        for preferred in [None, Some("neutral"), Some("")] {
            let (identity, path) = cache
                .resolve_partial_name("Widgets.resources", &[], preferred)
                .unwrap();
            assert_eq!(path, neutral);
            assert!(identity.is_culture_neutral());
        }
    }

    #[test]
    fn test_resolve_architecture_filter() {
        let fixture = GacFixture::new();
        fixture.install(
            &AssemblyImageBuilder::new("Native")
                .version(1, 0, 0, 0)
                .machine(0x8664),
        );
        let x86 = fixture.install(
            &AssemblyImageBuilder::new("Native")
                .version(2, 0, 0, 0)
                .cor_flags(CorFlags::IL_ONLY | CorFlags::REQUIRED_32BIT),
        );

        let cache = GlobalAssemblyCache::new(fixture.layout());

        let (identity, path) = cache
            .resolve_partial_name("Native", &[ProcessorArchitecture::X86], None)
            .unwrap();
        assert_eq!(path, x86);
        assert_eq!(identity.processor_architecture, Some(ProcessorArchitecture::X86));

        assert_eq!(
            cache.resolve_partial_name("Native", &[ProcessorArchitecture::ARM], None),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_assembly_identities() {
        let fixture = GacFixture::new();
        fixture.install(&satellite(None, 1));
        fixture.install(&satellite(None, 2));
        fixture.write_raw(
            "Widgets.resources/3.0.0.0__aabbccddeeff0011/Widgets.resources.dll",
            b"garbage",
        );

        let cache = GlobalAssemblyCache::new(fixture.layout());

        let versions: Vec<AssemblyVersion> = cache
            .assembly_identities(&ResolutionQuery::new("Widgets.resources"))
            .map(|identity| identity.version)
            .collect();
        assert_eq!(
            versions,
            vec![AssemblyVersion::new(1, 0, 0, 0), AssemblyVersion::new(2, 0, 0, 0)]
        );

        let pairs: Vec<_> = cache
            .identities_and_paths(&ResolutionQuery::new("Widgets.resources"))
            .collect();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(_, path)| path.is_file()));
    }

    #[test]
    fn test_assembly_identities_by_name() {
        let fixture = GacFixture::new();
        fixture.install(&satellite(None, 1));
        fixture.install(&AssemblyImageBuilder::new("Gadgets"));

        let cache = GlobalAssemblyCache::new(fixture.layout());

        assert_eq!(cache.assembly_identities_by_name(None, &[]).count(), 2);
        assert_eq!(
            cache
                .assembly_identities_by_name(Some("Gadgets, Version=1.0"), &[])
                .count(),
            1
        );
        assert_eq!(
            cache
                .assembly_identities_by_name(Some("Gadgets, Version=bogus"), &[])
                .count(),
            0
        );
        assert_eq!(cache.assembly_identities_by_name(Some(""), &[]).count(), 0);
    }

    #[test]
    fn test_assembly_simple_names_distinct() {
        let fixture = GacFixture::new();
        fixture.install(&satellite(Some("de-DE"), 1));
        fixture.install(&satellite(Some("fr-FR"), 1));
        fixture.install(&satellite(None, 2));
        fixture.install(&AssemblyImageBuilder::new("Gadgets"));
        fixture.install(
            &AssemblyImageBuilder::new("Native")
                .machine(0xAA64)
                .version(3, 0, 0, 0),
        );

        let cache = GlobalAssemblyCache::new(fixture.layout());

        let names: Vec<String> = cache.assembly_simple_names(&[]).collect();
        assert_eq!(names, vec!["Gadgets", "Native", "Widgets.resources"]);

        let x86_names: Vec<String> = cache
            .assembly_simple_names(&[ProcessorArchitecture::X86])
            .collect();
        assert_eq!(x86_names, vec!["Gadgets", "Widgets.resources"]);
    }

    #[test]
    fn test_corlib_neighbour_wins() {
        let fixture = GacFixture::new();
        let corlib = fixture.install_corlib(&AssemblyImageBuilder::new("System").version(4, 0, 0, 0));
        fixture.install(&AssemblyImageBuilder::new("System").version(2, 0, 0, 0));

        let cache = GlobalAssemblyCache::new(fixture.layout());
        let (identity, path) = cache.resolve_partial_name("System", &[], None).unwrap();

        assert_eq!(path, corlib);
        assert_eq!(identity.version, AssemblyVersion::new(4, 0, 0, 0));
        assert_eq!(cache.layout(), &fixture.layout());
    }
}
