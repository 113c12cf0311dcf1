//! Ordered, lazy generation of candidate file paths for a query.
//!
//! Candidates come from four rules, tried in order; the first three short-circuit:
//!
//! 1. `<corlib_dir>/<Name>.<ext>`, if the file exists
//! 2. `<corlib_dir>/Facades/<Name>.<ext>`, if the file exists
//! 3. `<gac_root>/<Name>/<Version>__<Token>/<Name>.<ext>` when the query pins both version
//!    and token. This path is yielded without an existence check and without falling back
//!    to a scan; the probe decides whether it is real.
//! 4. A scan of `<gac_root>/<Name>/*`, keeping the subdirectories whose name starts with
//!    the version text and ends with the token hex, and yielding the assembly file inside
//!    each when it exists.
//!
//! A whole-cache query (empty name) skips rules 1 to 3 and scans every
//! `<gac_root>/<Dir>/<Sub>/<Dir>.<ext>`.
//!
//! Directory listings are read one directory at a time and visited in name order.
//! Entries that cannot be read or whose names are not UTF-8 are skipped.

use std::{
    fs,
    path::{Path, PathBuf},
    vec,
};

use log::{debug, trace};

use crate::gac::{layout::RepositoryLayout, query::ResolutionQuery};

/// Name of the facade directory below the core library directory.
pub const FACADES_DIR: &str = "Facades";

enum Stage {
    CorlibDir,
    Facades,
    Direct,
    Scan(Scan),
    Done,
}

/// Iterator over the candidate paths of one query.
///
/// Finite. Restartable by constructing a new `CandidatePaths`, which reads the
/// filesystem afresh.
pub struct CandidatePaths {
    layout: RepositoryLayout,
    query: ResolutionQuery,
    stage: Stage,
}

impl CandidatePaths {
    /// Start candidate generation for `query` in `layout`.
    #[must_use]
    pub fn new(layout: &RepositoryLayout, query: &ResolutionQuery) -> Self {
        CandidatePaths {
            layout: layout.clone(),
            query: query.clone(),
            stage: Stage::CorlibDir,
        }
    }

    fn start_scan(&self) -> Scan {
        let names = if self.query.is_whole_repository() {
            debug!("Scanning the whole cache at {}", self.layout.gac_root().display());
            sorted_entries(self.layout.gac_root())
        } else {
            vec![self.query.name.clone()]
        };

        Scan {
            gac_root: self.layout.gac_root().to_path_buf(),
            prefix: self.query.version.map(|version| version.to_string()),
            suffix: self.query.public_key_token.map(|token| token.to_string()),
            names: names.into_iter(),
            current: None,
        }
    }
}

impl Iterator for CandidatePaths {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match std::mem::replace(&mut self.stage, Stage::Done) {
                Stage::CorlibDir => {
                    if self.query.is_whole_repository() {
                        self.stage = Stage::Scan(self.start_scan());
                        continue;
                    }

                    let path = self
                        .layout
                        .corlib_dir()
                        .join(self.layout.file_name(&self.query.name));
                    if path.is_file() {
                        debug!("{} found next to the core library", self.query.name);
                        return Some(path);
                    }

                    self.stage = Stage::Facades;
                }
                Stage::Facades => {
                    let path = self
                        .layout
                        .corlib_dir()
                        .join(FACADES_DIR)
                        .join(self.layout.file_name(&self.query.name));
                    if path.is_file() {
                        debug!("{} found in the facades directory", self.query.name);
                        return Some(path);
                    }

                    self.stage = Stage::Direct;
                }
                Stage::Direct => {
                    if let (Some(version), Some(token)) =
                        (&self.query.version, &self.query.public_key_token)
                    {
                        debug!("{} pinned to {version}__{token}", self.query.name);
                        return Some(
                            self.layout
                                .gac_root()
                                .join(&self.query.name)
                                .join(format!("{version}__{token}"))
                                .join(self.layout.file_name(&self.query.name)),
                        );
                    }

                    self.stage = Stage::Scan(self.start_scan());
                }
                Stage::Scan(mut scan) => {
                    let next = scan.next_candidate(&self.layout);
                    if next.is_some() {
                        self.stage = Stage::Scan(scan);
                    }
                    return next;
                }
                Stage::Done => return None,
            }
        }
    }
}

struct Scan {
    gac_root: PathBuf,
    prefix: Option<String>,
    suffix: Option<String>,
    names: vec::IntoIter<String>,
    current: Option<(String, vec::IntoIter<String>)>,
}

impl Scan {
    fn next_candidate(&mut self, layout: &RepositoryLayout) -> Option<PathBuf> {
        loop {
            if let Some((name, directories)) = &mut self.current {
                for directory in directories.by_ref() {
                    if !selects(self.prefix.as_deref(), self.suffix.as_deref(), &directory) {
                        continue;
                    }

                    let path = self
                        .gac_root
                        .join(name.as_str())
                        .join(&directory)
                        .join(layout.file_name(name));
                    if path.is_file() {
                        return Some(path);
                    }

                    trace!("No assembly file at {}", path.display());
                }

                self.current = None;
            }

            let name = self.names.next()?;
            let directories = sorted_entries(&self.gac_root.join(&name));
            self.current = Some((name, directories.into_iter()));
        }
    }
}

/// Version directories are `<Version>_<Culture>_<Token>`; the version text must lead and
/// the token hex must trail.
fn selects(prefix: Option<&str>, suffix: Option<&str>, directory: &str) -> bool {
    prefix.is_none_or(|prefix| directory.starts_with(prefix))
        && suffix.is_none_or(|suffix| directory.ends_with(suffix))
}

/// Names of the entries of `directory` in name order; unreadable directories are empty.
fn sorted_entries(directory: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(directory) else {
        trace!("Cannot list {}", directory.display());
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gac::VersionSpec,
        metadata::identity::{AssemblyVersion, PublicKeyToken},
        test::{builders::AssemblyImageBuilder, helpers::GacFixture},
    };

    const TOKEN: PublicKeyToken =
        PublicKeyToken::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11]);

    fn widgets(major: u16) -> AssemblyImageBuilder {
        AssemblyImageBuilder::new("Widgets")
            .version(major, 0, 0, 0)
            .public_key_token(TOKEN)
    }

    fn candidates(fixture: &GacFixture, query: &ResolutionQuery) -> Vec<PathBuf> {
        CandidatePaths::new(&fixture.layout(), query).collect()
    }

    #[test]
    fn test_corlib_dir_short_circuits() {
        let fixture = GacFixture::new();
        let corlib = fixture.install_corlib(&widgets(1));
        fixture.install_facade(&widgets(1));
        fixture.install(&widgets(1));

        let query = ResolutionQuery::new("Widgets");
        assert_eq!(candidates(&fixture, &query), vec![corlib]);
    }

    #[test]
    fn test_facades_short_circuit() {
        let fixture = GacFixture::new();
        let facade = fixture.install_facade(&widgets(1));
        fixture.install(&widgets(1));

        let query = ResolutionQuery::new("Widgets")
            .with_version(AssemblyVersion::new(1, 0, 0, 0))
            .with_public_key_token(TOKEN);
        assert_eq!(candidates(&fixture, &query), vec![facade]);
    }

    #[test]
    fn test_direct_path_is_unverified() {
        let fixture = GacFixture::new();
        fixture.install(&widgets(2));

        let query = ResolutionQuery::new("Widgets")
            .with_version(AssemblyVersion::new(1, 0, 0, 0))
            .with_public_key_token(TOKEN);
        let expected = fixture
            .layout()
            .gac_root()
            .join("Widgets/1.0.0.0__aabbccddeeff0011/Widgets.dll");

        // Yielded alone even though it does not exist; no fallback scan
        assert_eq!(candidates(&fixture, &query), vec![expected]);
    }

    #[test]
    fn test_no_direct_path_without_version_and_token() {
        let fixture = GacFixture::new();
        let installed = fixture.install(&widgets(1));

        let version_only =
            ResolutionQuery::new("Widgets").with_version(AssemblyVersion::new(1, 0, 0, 0));
        let token_only = ResolutionQuery::new("Widgets").with_public_key_token(TOKEN);

        assert_eq!(candidates(&fixture, &version_only), vec![installed.clone()]);
        assert_eq!(candidates(&fixture, &token_only), vec![installed]);

        let missing = ResolutionQuery::new("Widgets").with_version(AssemblyVersion::new(9, 0, 0, 0));
        assert!(candidates(&fixture, &missing).is_empty());
    }

    #[test]
    fn test_scan_filters_by_prefix_and_suffix() {
        let fixture = GacFixture::new();
        let v1 = fixture.install(&widgets(1));
        let v2 = fixture.install(&widgets(2));
        let unsigned = fixture.install(&AssemblyImageBuilder::new("Widgets").version(2, 5, 0, 0));
        fixture.write_raw("Widgets/3.0.0.0__aabbccddeeff0011/readme.txt", b"no assembly");

        let all = ResolutionQuery::new("Widgets");
        assert_eq!(candidates(&fixture, &all), vec![v1, v2.clone(), unsigned.clone()]);

        let major2 = ResolutionQuery::new("Widgets").with_version(VersionSpec::parse("2").unwrap());
        assert_eq!(candidates(&fixture, &major2), vec![v2.clone(), unsigned]);

        // Version and token present: direct path, which exists here
        let signed2 = ResolutionQuery::new("Widgets")
            .with_version(AssemblyVersion::new(2, 0, 0, 0))
            .with_public_key_token(TOKEN);
        assert_eq!(candidates(&fixture, &signed2), vec![v2]);
    }

    #[test]
    fn test_new_sequence_rereads_filesystem() {
        let fixture = GacFixture::new();
        let query = ResolutionQuery::new("Widgets");
        let v1 = fixture.install(&widgets(1));

        let mut first = CandidatePaths::new(&fixture.layout(), &query);
        assert_eq!(first.next(), Some(v1.clone()));
        assert_eq!(first.next(), None);
        assert_eq!(first.next(), None);

        let v2 = fixture.install(&widgets(2));
        assert_eq!(candidates(&fixture, &query), vec![v1, v2]);
    }

    #[test]
    fn test_missing_assembly_directory() {
        let fixture = GacFixture::new();

        assert!(candidates(&fixture, &ResolutionQuery::new("Missing")).is_empty());
    }

    #[test]
    fn test_whole_repository_scan() {
        let fixture = GacFixture::new();
        fixture.install_corlib(&AssemblyImageBuilder::new("mscorlib"));
        let alpha = fixture.install(&AssemblyImageBuilder::new("Alpha"));
        let beta1 = fixture.install(&AssemblyImageBuilder::new("Beta").version(1, 0, 0, 0));
        let beta2 = fixture.install(&AssemblyImageBuilder::new("Beta").version(2, 0, 0, 0));
        fixture.write_raw("stray-file", b"not a directory");

        assert_eq!(
            candidates(&fixture, &ResolutionQuery::all()),
            vec![alpha, beta1, beta2]
        );
    }

    #[test]
    fn test_custom_extension() {
        let fixture = GacFixture::with_extension("lib");
        let installed = fixture.install(&widgets(1));

        assert_eq!(installed.extension().unwrap(), "lib");
        assert_eq!(
            candidates(&fixture, &ResolutionQuery::new("Widgets")),
            vec![installed]
        );
    }

    #[test]
    fn test_selects() {
        assert!(selects(None, None, "anything"));
        assert!(selects(Some("4.0"), None, "4.0.0.0__b77a5c561934e089"));
        assert!(!selects(Some("4.0"), None, "2.0.0.0__b77a5c561934e089"));
        assert!(selects(None, Some("e089"), "4.0.0.0__b77a5c561934e089"));
        assert!(!selects(Some("4.0"), Some("0011"), "4.0.0.0__b77a5c561934e089"));
    }
}
