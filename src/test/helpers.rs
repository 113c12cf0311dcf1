//! Temporary cache installations for tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{gac::RepositoryLayout, test::builders::AssemblyImageBuilder};

/// A Mono prefix in a temporary directory, with empty core library and cache roots.
pub struct GacFixture {
    _dir: TempDir,
    layout: RepositoryLayout,
}

impl GacFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = RepositoryLayout::from_mono_prefix(dir.path());

        fs::create_dir_all(layout.corlib_dir()).unwrap();
        fs::create_dir_all(layout.gac_root()).unwrap();

        GacFixture { _dir: dir, layout }
    }

    /// Same, with a custom assembly file extension.
    pub fn with_extension(extension: &str) -> Self {
        let mut fixture = Self::new();
        fixture.layout = fixture.layout.clone().with_extension(extension);
        fixture
    }

    pub fn layout(&self) -> RepositoryLayout {
        self.layout.clone()
    }

    /// Install into `<gac_root>/<Name>/<Version>_<Culture>_<Token>/<Name>.<ext>`.
    pub fn install(&self, image: &AssemblyImageBuilder) -> PathBuf {
        let directory = format!(
            "{}_{}_{}",
            image.assembly_version(),
            image.assembly_culture().unwrap_or_default(),
            image.token().map(|token| token.to_string()).unwrap_or_default()
        );

        self.install_in(image, &directory)
    }

    /// Install into `<gac_root>/<Name>/<directory>/<Name>.<ext>`.
    pub fn install_in(&self, image: &AssemblyImageBuilder, directory: &str) -> PathBuf {
        let path = self
            .layout
            .gac_root()
            .join(image.name())
            .join(directory)
            .join(self.layout.file_name(image.name()));

        self.write(&path, &image.build())
    }

    /// Install next to the core library.
    pub fn install_corlib(&self, image: &AssemblyImageBuilder) -> PathBuf {
        let path = self
            .layout
            .corlib_dir()
            .join(self.layout.file_name(image.name()));

        self.write(&path, &image.build())
    }

    /// Install into the facades directory.
    pub fn install_facade(&self, image: &AssemblyImageBuilder) -> PathBuf {
        let path = self
            .layout
            .corlib_dir()
            .join("Facades")
            .join(self.layout.file_name(image.name()));

        self.write(&path, &image.build())
    }

    /// Write arbitrary bytes below the cache root.
    pub fn write_raw(&self, relative: &str, data: &[u8]) -> PathBuf {
        self.write(&self.layout.gac_root().join(relative), data)
    }

    fn write(&self, path: &Path, data: &[u8]) -> PathBuf {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_owns_its_directory() {
        let fixture = GacFixture::with_extension("lib");
        let layout = fixture.layout();

        assert!(layout.corlib_dir().is_dir());
        assert!(layout.gac_root().is_dir());
        assert_eq!(layout.file_name("Widgets"), "Widgets.lib");

        drop(fixture);
        assert!(!layout.gac_root().exists());
    }
}
