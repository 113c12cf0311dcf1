use anyhow::bail;
use gacscope::{ProcessorArchitecture, ResolveError};

use crate::{
    app::GlobalOptions,
    commands::common::{open_cache, IdentityInfo},
    output::print_output,
};

pub fn run(
    name: &str,
    architectures: &[ProcessorArchitecture],
    culture: Option<&str>,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let cache = open_cache(opts)?;

    let (identity, path) = match cache.resolve_partial_name(name, architectures, culture) {
        Ok(resolved) => resolved,
        Err(ResolveError::NotFound) => bail!("no assembly matching '{name}' found"),
        Err(ResolveError::BadQuery(error)) => bail!("invalid display name '{name}': {error}"),
    };

    let info = IdentityInfo::new(&identity, Some(&path));

    print_output(&info, opts, |info| {
        println!("{}", info.display_name);
        if let Some(path) = &info.path {
            println!("  {path}");
        }
    })
}
