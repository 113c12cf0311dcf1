use gacscope::ProcessorArchitecture;

use crate::{
    app::GlobalOptions,
    commands::common::{open_cache, IdentityInfo},
    output::{print_output, Align, TabWriter},
};

pub fn run(
    name: Option<&str>,
    architectures: &[ProcessorArchitecture],
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let cache = open_cache(opts)?;

    let query = match name {
        Some(name) => gacscope::gac::parse_display_name(name)?,
        None => gacscope::ResolutionQuery::all(),
    };

    let entries: Vec<IdentityInfo> = cache
        .identities_and_paths(&query.with_architectures(architectures))
        .map(|(identity, path)| IdentityInfo::new(&identity, Some(&path)))
        .collect();

    print_output(&entries, opts, |entries| {
        if entries.is_empty() {
            println!("No assemblies found.");
            return;
        }

        let mut tw = TabWriter::new(&[
            ("Name", Align::Left),
            ("Version", Align::Right),
            ("Culture", Align::Left),
            ("Token", Align::Left),
            ("Arch", Align::Left),
            ("Path", Align::Left),
        ]);
        for entry in entries {
            tw.row(vec![
                entry.name.clone(),
                entry.version.clone(),
                entry.culture.clone(),
                entry.token_or_null(),
                entry.architecture_or_dash(),
                entry.path.clone().unwrap_or_default(),
            ]);
        }
        println!("{tw}");
        println!("{} assemblies", entries.len());
    })
}
