use gacscope::ProcessorArchitecture;

use crate::{app::GlobalOptions, commands::common::open_cache, output::print_output};

pub fn run(architectures: &[ProcessorArchitecture], opts: &GlobalOptions) -> anyhow::Result<()> {
    let cache = open_cache(opts)?;

    let names: Vec<String> = cache.assembly_simple_names(architectures).collect();

    print_output(&names, opts, |names| {
        for name in names {
            println!("{name}");
        }
    })
}
