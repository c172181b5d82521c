use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "templates"]
struct Bundled;

pub const MANUAL_STEPS: &str = "manual/steps.txt";
pub const EXAMPLE_CONFIG: &str = "config/example.toml";

/// Bundled text file, decoded as UTF-8.
pub fn get_string(name: &str) -> Result<String> {
    let file = Bundled::get(name).ok_or_else(|| anyhow!("no bundled file named `{}`", name))?;
    String::from_utf8(file.data.into_owned())
        .with_context(|| format!("bundled file `{}` is not UTF-8", name))
}

/// Copy a bundled file to `destination`, creating parent directories.
pub fn write_template(destination: &Utf8Path, name: &str) -> Result<()> {
    let text = get_string(name)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent))?;
    }
    fs::write(destination, text).with_context(|| format!("writing {}", destination))
}
