use std::io::Write;
use std::path::Path;
use std::process::Command as ProcessCommand;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;

use crate::config::Backend;
use crate::discover::output_name;
use crate::instructions::{file_url, print_manual_instructions};

/// Something able to render one HTML file to PDF.
pub trait Converter {
    fn name(&self) -> &str;

    /// Whether the capability exists in this environment.
    fn is_available(&self) -> bool;

    fn convert(&self, input: &Utf8Path, output: &Utf8Path) -> Result<()>;

    /// Human-readable form of what `convert` would do, used by dry runs.
    fn describe(&self, input: &Utf8Path, output: &Utf8Path) -> String {
        format!("{} {} -> {}", self.name(), input, output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted,
    Failed(String),
    NotAttempted,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub backend: Option<String>,
    pub outcomes: Vec<(String, ConversionOutcome)>,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Converted))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ConversionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Probe `converters` in order and run the first available one over every file.
///
/// Returns `false` only when no converter is available, after printing the manual
/// instructions. Per-file failures are reported and do not stop the batch.
pub fn attempt_automatic_conversion(
    out: &mut impl Write,
    dir: &Utf8Path,
    files: &[String],
    converters: &[Box<dyn Converter>],
    dry_run: bool,
) -> Result<(bool, BatchReport)> {
    let mut report = BatchReport::default();

    let Some(converter) = select_converter(out, converters)? else {
        writeln!(out, "No automatic conversion methods available.")?;
        report.outcomes = files
            .iter()
            .map(|file| (file.clone(), ConversionOutcome::NotAttempted))
            .collect();
        print_manual_instructions(out, dir, files)?;
        return Ok((false, report));
    };

    report.backend = Some(converter.name().to_owned());
    writeln!(out, "✓ Trying {} conversion...", converter.name())?;

    for file in files {
        let input = dir.join(file);
        let pdf_name = output_name(file);
        let output = dir.join(&pdf_name);

        if dry_run {
            writeln!(out, "  (dry-run) {}", converter.describe(&input, &output))?;
            report.outcomes.push((file.clone(), ConversionOutcome::NotAttempted));
            continue;
        }

        let start = Instant::now();
        let outcome = match converter.convert(&input, &output) {
            Ok(()) => {
                tracing::info!(%input, elapsed = ?start.elapsed(), "converted");
                writeln!(out, "  ✓ Converted: {} → {}", file, pdf_name)?;
                ConversionOutcome::Converted
            }
            Err(err) => {
                tracing::warn!(%input, error = %format!("{err:#}"), "conversion failed");
                writeln!(out, "  ✗ Failed to convert {}: {:#}", file, err)?;
                ConversionOutcome::Failed(format!("{err:#}"))
            }
        };
        report.outcomes.push((file.clone(), outcome));
    }

    Ok((true, report))
}

fn select_converter<'a>(
    out: &mut impl Write,
    converters: &'a [Box<dyn Converter>],
) -> Result<Option<&'a dyn Converter>> {
    for converter in converters {
        if converter.is_available() {
            tracing::debug!(backend = converter.name(), "backend available");
            return Ok(Some(converter.as_ref()));
        }
        writeln!(out, "✗ {} not available", converter.name())?;
    }
    Ok(None)
}

/// A converter backed by an external program found on `PATH`.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    backend: Backend,
}

impl ExternalTool {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn argv(&self, input: &Utf8Path, output: &Utf8Path) -> Result<Vec<String>> {
        let needs_url = self.backend.args.iter().any(|arg| arg.contains("{input_url}"));
        let input_url = if needs_url {
            file_url(input)?.to_string()
        } else {
            String::new()
        };

        let mut argv = Vec::with_capacity(self.backend.args.len() + 1);
        argv.push(self.backend.program.clone());
        for arg in &self.backend.args {
            argv.push(
                arg.replace("{input_url}", &input_url)
                    .replace("{input}", input.as_str())
                    .replace("{output}", output.as_str()),
            );
        }
        Ok(argv)
    }
}

impl Converter for ExternalTool {
    fn name(&self) -> &str {
        &self.backend.name
    }

    fn is_available(&self) -> bool {
        let program = &self.backend.program;
        if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
            return Path::new(program).is_file();
        }
        command_exists(program)
    }

    fn convert(&self, input: &Utf8Path, output: &Utf8Path) -> Result<()> {
        let argv = self.argv(input, output)?;
        let rendered = format_command(&argv);
        tracing::debug!(command = %rendered, "running backend");

        let result = ProcessCommand::new(&argv[0])
            .args(&argv[1..])
            .output()
            .with_context(|| format!("executing `{}`", rendered))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!(
                "`{}` failed with exit code {:?}: {}",
                self.backend.program,
                result.status.code(),
                stderr.trim()
            );
        }
        Ok(())
    }

    fn describe(&self, input: &Utf8Path, output: &Utf8Path) -> String {
        match self.argv(input, output) {
            Ok(argv) => format_command(&argv),
            Err(err) => format!("{} (unrenderable: {err})", self.backend.name),
        }
    }
}

/// Build the converter list for the configured backends, in order.
pub fn registry(backends: &[Backend]) -> Vec<Box<dyn Converter>> {
    backends
        .iter()
        .cloned()
        .map(|backend| Box::new(ExternalTool::new(backend)) as Box<dyn Converter>)
        .collect()
}

/// `which` exits 0 only when `cmd` resolves on `PATH`.
pub fn command_exists(cmd: &str) -> bool {
    ProcessCommand::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.chars().any(|c| c.is_whitespace()) {
                let escaped = arg.replace('"', "\\\"");
                format!("\"{}\"", escaped)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
