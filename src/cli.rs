use std::path::PathBuf;

use clap::Parser;

/// Convert the HTML files in the documentation directory to PDF.
#[derive(Parser, Debug)]
#[command(name = "docpdf", version, about = "Convert HTML documentation to PDF")]
pub struct Cli {
    /// Show manual conversion instructions instead of converting.
    #[arg(long = "manual")]
    pub manual: bool,
    #[arg(short = 'C', long = "chdir")]
    pub chdir: Option<PathBuf>,
    /// Configuration file to use instead of the discovered one.
    #[arg(short = 'f', long = "config")]
    pub config: Option<PathBuf>,
    /// Directory holding the HTML files (defaults to `docs/pdf`).
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,
    /// Only consider the named conversion backend.
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Write an example configuration to `.docpdf/config.toml`.
    #[arg(long = "init-config", conflicts_with = "manual")]
    pub init_config: bool,
    #[arg(long = "force", requires = "init_config")]
    pub force: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
