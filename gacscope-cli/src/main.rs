mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // Show gacscope warnings on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        env_logger::Builder::new()
            .filter_module("gacscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::List {
            name,
            architectures,
        } => commands::list::run(name.as_deref(), architectures, &cli.global),
        Command::Names { architectures } => commands::names::run(architectures, &cli.global),
        Command::Resolve {
            name,
            architectures,
            culture,
        } => commands::resolve::run(name, architectures, culture.as_deref(), &cli.global),
        Command::Inspect { path } => commands::inspect::run(path, &cli.global),
    }
}
