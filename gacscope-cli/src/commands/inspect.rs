use std::path::Path;

use anyhow::Context;
use gacscope::{AssemblyManifest, File};
use serde::Serialize;

use crate::{app::GlobalOptions, commands::common::IdentityInfo, output::print_output};

#[derive(Debug, Serialize)]
struct InspectOutput {
    #[serde(flatten)]
    identity: IdentityInfo,
    runtime_version: String,
    machine: String,
    pe32_plus: bool,
    hash_algorithm: String,
    assembly_flags: String,
    strong_named: bool,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = File::from_file(path)
        .with_context(|| format!("failed to load image: {}", path.display()))?;
    let manifest = AssemblyManifest::read(&file)
        .with_context(|| format!("failed to read assembly manifest: {}", path.display()))?;

    let output = InspectOutput {
        identity: IdentityInfo::new(&manifest.identity, None),
        runtime_version: manifest.runtime_version.clone(),
        machine: format!("0x{:04X}", file.machine()),
        pe32_plus: file.is_pe32_plus(),
        hash_algorithm: format!("0x{:04X}", manifest.hash_alg_id),
        assembly_flags: format!("0x{:08X}", manifest.flags),
        strong_named: manifest.identity.is_strong_named(),
    };

    print_output(&output, opts, |out| {
        println!("Assembly:        {}", out.identity.name);
        println!("Version:         {}", out.identity.version);
        println!("Culture:         {}", out.identity.culture);
        println!("Token:           {}", out.identity.token_or_null());
        println!("Architecture:    {}", out.identity.architecture_or_dash());
        println!("Display name:    {}", out.identity.display_name);
        println!("Runtime:         {}", out.runtime_version);
        println!("Machine:         {}", out.machine);
        println!("PE32+:           {}", if out.pe32_plus { "yes" } else { "no" });
        println!("Hash algorithm:  {}", out.hash_algorithm);
        println!("Assembly flags:  {}", out.assembly_flags);
        let sn = if out.strong_named { "yes" } else { "no" };
        println!("Strong-named:    {sn}");
    })
}
