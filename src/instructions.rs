use std::io::Write;

use anyhow::{Context, Result};
use camino::Utf8Path;
use url::Url;

use crate::discover::output_name;
use crate::templates;

const RULE_WIDTH: usize = 60;

/// Print browser print-to-PDF guidance for `files` found in `dir`.
pub fn print_manual_instructions(out: &mut impl Write, dir: &Utf8Path, files: &[String]) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let steps = templates::get_string(templates::MANUAL_STEPS)?;

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "   MANUAL PDF CONVERSION INSTRUCTIONS")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;
    writeln!(out, "Since automatic PDF generation requires additional system libraries,")?;
    writeln!(out, "here are instructions for manual conversion:")?;
    writeln!(out)?;
    writeln!(out, "1. Open each HTML file in your web browser:")?;
    for file in files {
        writeln!(out, "   • {}", file_url(&dir.join(file))?)?;
    }
    writeln!(out)?;
    write!(out, "{steps}")?;
    writeln!(out)?;
    writeln!(out, "5. Save the PDFs with these names:")?;
    for file in files {
        writeln!(out, "   • {} → {}", file, output_name(file))?;
    }
    writeln!(out)?;
    writeln!(out, "The HTML files are professionally formatted and will print well!")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;
    Ok(())
}

/// `file://` URL of `path`, made absolute against the working directory.
pub fn file_url(path: &Utf8Path) -> Result<Url> {
    let absolute =
        std::path::absolute(path).with_context(|| format!("resolving absolute path of {}", path))?;
    Url::from_file_path(&absolute)
        .map_err(|_| anyhow::anyhow!("cannot express {} as a file URL", absolute.display()))
}
