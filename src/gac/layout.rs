//! Where the cache lives on disk.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use log::debug;

/// Install prefixes searched by [`RepositoryLayout::detect`], in order.
const MONO_PREFIXES: [&str; 4] = [
    "/usr",
    "/usr/local",
    "/opt/mono",
    "/Library/Frameworks/Mono.framework/Versions/Current",
];

/// Extension of assembly files when none is configured.
pub const DEFAULT_EXTENSION: &str = "dll";

static SYSTEM_LAYOUT: OnceLock<Option<RepositoryLayout>> = OnceLock::new();

/// The two roots of a Mono-style global assembly cache and the file extension of the
/// assemblies stored in it.
///
/// * `corlib_dir` holds the core library (`mscorlib.dll`) and, under `Facades/`, the
///   facade assemblies. Most framework assemblies also have a symlink here.
/// * `gac_root` holds `<Name>/<Version>_<Culture>_<Token>/<Name>.<ext>`.
///
/// # Examples
///
/// ```rust
/// use gacscope::RepositoryLayout;
/// use std::path::Path;
///
/// let layout = RepositoryLayout::from_mono_prefix(Path::new("/usr"));
/// assert_eq!(layout.corlib_dir(), Path::new("/usr/lib/mono/4.5"));
/// assert_eq!(layout.gac_root(), Path::new("/usr/lib/mono/gac"));
/// assert_eq!(layout.file_name("System"), "System.dll");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLayout {
    corlib_dir: PathBuf,
    gac_root: PathBuf,
    extension: String,
}

impl RepositoryLayout {
    /// Create a layout from explicit roots, with the default `dll` extension.
    pub fn new(corlib_dir: impl Into<PathBuf>, gac_root: impl Into<PathBuf>) -> Self {
        RepositoryLayout {
            corlib_dir: corlib_dir.into(),
            gac_root: gac_root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Replace the file extension of assembly files. A leading `.` is ignored.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// The layout of a Mono installation under `prefix`.
    #[must_use]
    pub fn from_mono_prefix(prefix: &Path) -> Self {
        let mono = prefix.join("lib").join("mono");
        Self::new(mono.join("4.5"), mono.join("gac"))
    }

    /// Probe the well-known Mono prefixes and return the first complete installation.
    ///
    /// An installation is complete when `mscorlib.dll` exists in its core library
    /// directory and its cache root is a directory.
    #[must_use]
    pub fn detect() -> Option<Self> {
        MONO_PREFIXES.iter().find_map(|prefix| {
            let layout = Self::from_mono_prefix(Path::new(prefix));
            let complete = layout.corlib_dir.join(layout.file_name("mscorlib")).is_file()
                && layout.gac_root.is_dir();

            debug!("Mono prefix {prefix}: {}", if complete { "found" } else { "absent" });
            complete.then_some(layout)
        })
    }

    /// [`RepositoryLayout::detect`], evaluated once per process.
    #[must_use]
    pub fn system() -> Option<&'static RepositoryLayout> {
        SYSTEM_LAYOUT.get_or_init(Self::detect).as_ref()
    }

    /// Directory of the core library.
    #[must_use]
    pub fn corlib_dir(&self) -> &Path {
        &self.corlib_dir
    }

    /// Root of the shared store.
    #[must_use]
    pub fn gac_root(&self) -> &Path {
        &self.gac_root
    }

    /// File extension of assembly files, without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `<name>.<extension>`
    #[must_use]
    pub fn file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension() {
        let layout = RepositoryLayout::new("/a", "/b").with_extension(".lib");

        assert_eq!(layout.extension(), "lib");
        assert_eq!(layout.file_name("Widgets"), "Widgets.lib");
        assert_eq!(layout.corlib_dir(), Path::new("/a"));
        assert_eq!(layout.gac_root(), Path::new("/b"));
    }

    #[test]
    fn test_from_mono_prefix() {
        let layout = RepositoryLayout::from_mono_prefix(Path::new("/opt/mono"));

        assert_eq!(layout.corlib_dir(), Path::new("/opt/mono/lib/mono/4.5"));
        assert_eq!(layout.gac_root(), Path::new("/opt/mono/lib/mono/gac"));
        assert_eq!(layout.extension(), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_system_is_stable() {
        let first = RepositoryLayout::system();
        let second = RepositoryLayout::system();

        assert_eq!(first, second);
        if let (Some(first), Some(second)) = (first, second) {
            assert!(std::ptr::eq(first, second));
        }
    }
}
