//! Markdown to HTML rendering through an external converter (pandoc).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::{AppError, ConverterConfig, Result};

/// Renders a transcript into its display format.
pub trait DocumentConverter {
    /// Converts `markdown` into `output`, using `title` as the document title.
    ///
    /// # Errors
    /// Returns `Converter` if the conversion does not complete successfully.
    fn convert(&self, markdown: &Path, output: &Path, title: &str) -> Result<()>;
}

/// Invokes pandoc (or a compatible program) once per document.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
    stylesheet: PathBuf,
}

impl PandocConverter {
    #[must_use]
    pub fn new(program: impl Into<String>, stylesheet: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            stylesheet: stylesheet.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.program.clone(), config.stylesheet.clone())
    }

    /// Stylesheet file name as referenced from the generated HTML.
    fn stylesheet_name(&self) -> String {
        self.stylesheet.file_name().map_or_else(
            || self.stylesheet.to_string_lossy().into_owned(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    /// Copies the stylesheet next to the documents so relative links resolve.
    ///
    /// Returns `false` if the stylesheet does not exist; documents still render
    /// but unstyled.
    ///
    /// # Errors
    /// Returns error if the copy fails.
    pub fn install_stylesheet(&self, dir: &Path) -> Result<bool> {
        if !self.stylesheet.is_file() {
            tracing::warn!(
                stylesheet = %self.stylesheet.display(),
                "Stylesheet not found, HTML will be unstyled"
            );
            return Ok(false);
        }

        let dest = dir.join(self.stylesheet_name());
        fs::copy(&self.stylesheet, &dest).map_err(|e| {
            AppError::io(format!("Failed to copy stylesheet to {}", dest.display()), e)
        })?;

        Ok(true)
    }

    fn failure(&self, message: impl Into<String>) -> AppError {
        AppError::Converter {
            program: self.program.clone(),
            message: message.into(),
        }
    }
}

impl DocumentConverter for PandocConverter {
    fn convert(&self, markdown: &Path, output: &Path, title: &str) -> Result<()> {
        let result = Command::new(&self.program)
            .arg("-s")
            .arg("--css")
            .arg(self.stylesheet_name())
            .arg("--metadata")
            .arg(format!("title={title}"))
            .args(["-f", "markdown-tex_math_dollars", "-t", "html"])
            .arg(markdown)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| self.failure(format!("could not start: {e}")))?;

        if result.status.success() {
            tracing::debug!(output = %output.display(), "Rendered document");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(self.failure(format!("{} {}", result.status, stderr.trim())))
        }
    }
}
