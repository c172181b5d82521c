use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::templates;

pub const CONFIG_DIR: &str = ".docpdf";
pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_DOCS_DIR: &str = "docs/pdf";

/// Root configuration document, usually `.docpdf/config.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_docs_dir")]
    pub docs_dir: Utf8PathBuf,
    #[serde(default = "default_backends")]
    pub backends: Vec<Backend>,
}

/// One external HTML-to-PDF tool. `args` may use `{input}`, `{output}` and `{input_url}`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Backend {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            backends: default_backends(),
        }
    }
}

impl Config {
    /// Keep only the backend called `name`.
    pub fn restrict_to(&mut self, name: &str) -> Result<()> {
        let Some(backend) = self.backends.iter().find(|b| b.name == name).cloned() else {
            let known: Vec<&str> = self.backends.iter().map(|b| b.name.as_str()).collect();
            bail!("unknown backend `{}` (configured: {})", name, known.join(", "));
        };
        self.backends = vec![backend];
        Ok(())
    }
}

fn default_docs_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_DOCS_DIR)
}

fn backend(name: &str, program: &str, args: &[&str]) -> Backend {
    Backend {
        name: name.to_owned(),
        program: program.to_owned(),
        args: args.iter().map(|arg| (*arg).to_owned()).collect(),
    }
}

fn default_backends() -> Vec<Backend> {
    vec![
        backend(
            "wkhtmltopdf",
            "wkhtmltopdf",
            &["--quiet", "--enable-local-file-access", "{input}", "{output}"],
        ),
        backend(
            "chromium",
            "chromium",
            &[
                "--headless",
                "--disable-gpu",
                "--no-pdf-header-footer",
                "--print-to-pdf={output}",
                "{input_url}",
            ],
        ),
        backend("weasyprint", "weasyprint", &["{input}", "{output}"]),
    ]
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Explicit => "explicit",
            ConfigSource::Discovered => "discovered",
            ConfigSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfigPath {
    pub path: Utf8PathBuf,
    pub source: ConfigSource,
}

/// Explicit path first, then the nearest `.docpdf/config.toml` above `cwd`, then the home default.
///
/// `None` means there is nowhere to look, and the built-in defaults apply.
pub fn resolve_path(explicit: Option<&Path>, cwd: &Utf8Path) -> Result<Option<ResolvedConfigPath>> {
    if let Some(path) = explicit {
        let path = Utf8PathBuf::from_path_buf(path.to_path_buf())
            .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
        return Ok(Some(ResolvedConfigPath {
            path,
            source: ConfigSource::Explicit,
        }));
    }

    let mut dir = Some(cwd);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.exists() {
            return Ok(Some(ResolvedConfigPath {
                path: candidate,
                source: ConfigSource::Discovered,
            }));
        }
        dir = current.parent();
    }

    Ok(home_candidate(dirs::home_dir()))
}

fn home_candidate(home: Option<PathBuf>) -> Option<ResolvedConfigPath> {
    let Some(home) = home else {
        tracing::debug!("no home directory, skipping user config");
        return None;
    };
    match Utf8PathBuf::from_path_buf(home) {
        Ok(home) => Some(ResolvedConfigPath {
            path: home.join(CONFIG_DIR).join(CONFIG_FILE),
            source: ConfigSource::HomeDefault,
        }),
        Err(home) => {
            tracing::warn!(home = %home.display(), "home directory is not UTF-8, skipping user config");
            None
        }
    }
}

pub fn load_from_path(path: &Utf8Path) -> Result<Config> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// Only an explicit path has to exist; anything else missing means defaults.
pub fn load(resolved: Option<&ResolvedConfigPath>) -> Result<Config> {
    let Some(resolved) = resolved else {
        return Ok(Config::default());
    };
    if resolved.source != ConfigSource::Explicit && !resolved.path.exists() {
        tracing::debug!(path = %resolved.path, "no config file, using defaults");
        return Ok(Config::default());
    }
    load_from_path(&resolved.path)
}

pub fn write_example_config(path: &Utf8Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!("refusing to replace {} (pass --force)", path);
    }

    templates::write_template(path, templates::EXAMPLE_CONFIG)
}
