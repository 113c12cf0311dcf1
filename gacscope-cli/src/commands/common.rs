use std::path::Path;

use anyhow::Context;
use gacscope::{AssemblyIdentity, GlobalAssemblyCache, RepositoryLayout};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Build the cache from `--corlib-dir`/`--gac-dir`, `--prefix`, or the detected install.
pub fn open_cache(opts: &GlobalOptions) -> anyhow::Result<GlobalAssemblyCache> {
    let layout = match (&opts.corlib_dir, &opts.gac_dir, &opts.prefix) {
        (Some(corlib_dir), Some(gac_dir), _) => RepositoryLayout::new(corlib_dir, gac_dir),
        (_, _, Some(prefix)) => RepositoryLayout::from_mono_prefix(prefix),
        _ => RepositoryLayout::system().cloned().context(
            "no Mono installation found; pass --prefix or --corlib-dir and --gac-dir",
        )?,
    };

    log::debug!(
        "Using core library directory {} and cache root {}",
        layout.corlib_dir().display(),
        layout.gac_root().display()
    );

    Ok(GlobalAssemblyCache::new(layout.with_extension(opts.extension.as_str())))
}

/// Serializable view of an identity, optionally with the file it was read from.
#[derive(Debug, Serialize)]
pub struct IdentityInfo {
    pub name: String,
    pub version: String,
    pub culture: String,
    pub public_key_token: Option<String>,
    pub architecture: Option<String>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl IdentityInfo {
    pub fn new(identity: &AssemblyIdentity, path: Option<&Path>) -> Self {
        IdentityInfo {
            name: identity.name.clone(),
            version: identity.version.to_string(),
            culture: identity
                .culture
                .clone()
                .unwrap_or_else(|| "neutral".to_string()),
            public_key_token: identity.public_key_token.map(|token| token.to_string()),
            architecture: identity
                .processor_architecture
                .map(|architecture| architecture.to_string()),
            display_name: identity.display_name(),
            path: path.map(|path| path.display().to_string()),
        }
    }

    /// Token column text, `null` for unsigned assemblies.
    pub fn token_or_null(&self) -> String {
        self.public_key_token
            .clone()
            .unwrap_or_else(|| "null".to_string())
    }

    /// Architecture column text, `-` when unknown.
    pub fn architecture_or_dash(&self) -> String {
        self.architecture.clone().unwrap_or_else(|| "-".to_string())
    }
}
