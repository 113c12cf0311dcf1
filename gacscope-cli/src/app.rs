use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gacscope::ProcessorArchitecture;

/// gacscope - list, resolve and inspect assemblies of a Mono global assembly cache
#[derive(Debug, Parser)]
#[command(name = "gacscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Mono installation prefix (e.g. /usr or /opt/mono). Default: auto-detect.
    #[arg(long, global = true, value_name = "DIR", conflicts_with_all = ["corlib_dir", "gac_dir"])]
    pub prefix: Option<PathBuf>,

    /// Directory of the core library (e.g. /usr/lib/mono/4.5). Requires --gac-dir.
    #[arg(long, global = true, value_name = "DIR", requires = "gac_dir")]
    pub corlib_dir: Option<PathBuf>,

    /// Root of the assembly cache (e.g. /usr/lib/mono/gac). Requires --corlib-dir.
    #[arg(long, global = true, value_name = "DIR", requires = "corlib_dir")]
    pub gac_dir: Option<PathBuf>,

    /// File extension of assembly files inside the cache.
    #[arg(long, global = true, default_value = gacscope::gac::DEFAULT_EXTENSION)]
    pub extension: String,

    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List assemblies matching a partial display name, or the whole cache.
    List {
        /// Partial display name, e.g. "System.Xml, Version=4.0".
        #[arg(value_name = "PARTIAL_NAME")]
        name: Option<String>,

        /// Accepted processor architectures (x86, amd64, ia64, arm, arm64); repeatable.
        #[arg(short, long = "arch", value_name = "ARCH")]
        architectures: Vec<ProcessorArchitecture>,
    },

    /// List the distinct simple names of all assemblies in the cache.
    Names {
        /// Accepted processor architectures; repeatable.
        #[arg(short, long = "arch", value_name = "ARCH")]
        architectures: Vec<ProcessorArchitecture>,
    },

    /// Resolve a partial display name to a single assembly file.
    Resolve {
        /// Partial display name, e.g. "System.Xml, Version=4.0.0.0, PublicKeyToken=b77a5c561934e089".
        #[arg(value_name = "DISPLAY_NAME")]
        name: String,

        /// Accepted processor architectures; repeatable.
        #[arg(short, long = "arch", value_name = "ARCH")]
        architectures: Vec<ProcessorArchitecture>,

        /// Preferred culture (e.g. de-DE); default prefers culture-neutral assemblies.
        #[arg(short, long)]
        culture: Option<String>,
    },

    /// Show the identity recorded in a single assembly file.
    Inspect {
        /// Path to the .NET assembly file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}
