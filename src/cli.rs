use std::path::PathBuf;

use clap::Parser;

/// Real-time airfield scene viewer.
#[derive(Debug, Parser)]
#[command(name = "airfield", version, about)]
pub struct Cli {
    /// Scene configuration file (JSON). Built-in defaults apply when
    /// omitted.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start with the presentation fly-around enabled.
    #[arg(long)]
    pub presentation: bool,

    /// Build the scene, advance a few frames without a window, and exit.
    #[arg(long)]
    pub check: bool,
}
