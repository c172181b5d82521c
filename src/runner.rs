use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

use crate::cli::Cli;
use crate::config::{self, CONFIG_DIR, CONFIG_FILE};
use crate::convert::{self, Converter, attempt_automatic_conversion};
use crate::discover::discover;
use crate::instructions::print_manual_instructions;

pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(cli, &mut out)
}

/// One invocation, reporting to `out`. Conversion outcomes never turn into an `Err`.
pub fn run_with(cli: Cli, out: &mut impl Write) -> Result<()> {
    if let Some(path) = &cli.chdir {
        std::env::set_current_dir(path)
            .with_context(|| format!("changing directory to {}", path.display()))?;
    }
    let cwd = current_dir()?;

    if cli.init_config {
        let path = cwd.join(CONFIG_DIR).join(CONFIG_FILE);
        config::write_example_config(&path, cli.force)?;
        writeln!(out, "Wrote example configuration to {}", path)?;
        return Ok(());
    }

    let resolved = config::resolve_path(cli.config.as_deref(), &cwd)?;
    let mut config = config::load(resolved.as_ref())?;
    if let Some(resolved) = &resolved {
        tracing::debug!(path = %resolved.path, source = resolved.source.as_str(), "configuration resolved");
    }
    if let Some(name) = &cli.backend {
        config.restrict_to(name)?;
    }

    let dir = match &cli.dir {
        Some(dir) => utf8(dir)?,
        None => config.docs_dir.clone(),
    };

    if cli.manual {
        let files = discover(&dir);
        print_manual_instructions(out, &dir, &files)?;
        return Ok(());
    }

    let converters = convert::registry(&config.backends);
    run_automatic(out, &dir, &converters, cli.dry_run)?;
    Ok(())
}

/// Automatic path: discover, convert, and point at `--manual` on failure.
pub fn run_automatic(
    out: &mut impl Write,
    dir: &Utf8Path,
    converters: &[Box<dyn Converter>],
    dry_run: bool,
) -> Result<bool> {
    writeln!(out, "Attempting automatic PDF conversion...")?;
    let ok = convert_directory(out, dir, converters, dry_run)?;
    if !ok {
        writeln!(out)?;
        writeln!(out, "Automatic conversion failed. Use --manual flag for instructions.")?;
    }
    Ok(ok)
}

fn convert_directory(
    out: &mut impl Write,
    dir: &Utf8Path,
    converters: &[Box<dyn Converter>],
    dry_run: bool,
) -> Result<bool> {
    if !dir.is_dir() {
        writeln!(out, "PDF directory not found!")?;
        return Ok(false);
    }

    let files = discover(dir);
    if files.is_empty() {
        writeln!(out, "No HTML files found to convert!")?;
        return Ok(false);
    }

    writeln!(out, "Found HTML files to convert:")?;
    for file in &files {
        writeln!(out, "  • {}", file)?;
    }
    writeln!(out)?;

    let (ok, report) = attempt_automatic_conversion(out, dir, &files, converters, dry_run)?;
    tracing::info!(
        backend = report.backend.as_deref().unwrap_or("<none>"),
        converted = report.converted(),
        failed = report.failed(),
        "batch finished"
    );
    Ok(ok)
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    utf8(&cwd)
}

fn utf8(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|_| anyhow!("path {} must be valid UTF-8", path.display()))
}
