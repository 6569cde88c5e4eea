//! CI outputs and console formatting

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use console::style;

use railenv_core::error::PreviewResult;

/// Publishes step outputs and failure annotations for the CI runner
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    /// File named by `$GITHUB_OUTPUT`, when running under GitHub Actions
    output_file: Option<PathBuf>,
}

impl ActionOutput {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Use `$GITHUB_OUTPUT` when the runner provides it
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("GITHUB_OUTPUT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        )
    }

    /// Publish a named output.
    ///
    /// Appends `name=value` to the output file, or prints it when there is
    /// none. Multi-line values use the delimiter form.
    pub fn set_output(&self, name: &str, value: &str) -> PreviewResult<()> {
        let line = if value.contains('\n') {
            let delimiter = format!("railenv_{}_eof", name);
            format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
        } else {
            format!("{}={}\n", name, value)
        };

        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(line.as_bytes())?;
            }
            None => print!("{}", line),
        }
        Ok(())
    }

    /// Emit a failure annotation
    pub fn error(&self, message: &str) {
        println!("::error::{}", escape_annotation(message));
    }

    /// Emit a warning annotation
    pub fn warning(&self, message: &str) {
        println!("::warning::{}", escape_annotation(message));
    }
}

/// Escape a message for a workflow command
pub fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a success message
pub fn format_success(msg: &str) -> String {
    style(format!("Success: {}", msg)).green().to_string()
}

/// Format a warning message
pub fn format_warning(msg: &str) -> String {
    style(format!("Warning: {}", msg)).yellow().to_string()
}

/// Format a label/value pair
pub fn format_field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{}: {}", style(label).bold(), value)
}
