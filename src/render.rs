//! Turning parts into documents.
//!
//! Documents are rendered with `minijinja` from a built-in Markdown template
//! or a template file named in the configuration. The template sees two
//! values: `part` (a serialised [`Part`]) and `generated_at` (UTC date).

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use minijinja::{context, Environment};

use crate::config::OutputConfig;
use crate::error::RenderError;
use crate::part::Part;

const PART_TEMPLATE: &str = include_str!("../templates/part.md.jinja");

const TEMPLATE_NAME: &str = "part";

/// Renders parts and writes them as `<directory>/<part_id>.<extension>`.
#[derive(Debug, Clone)]
pub struct Renderer {
    source: Cow<'static, str>,
    extension: String,
}

impl Renderer {
    /// Creates a renderer using the built-in Markdown template.
    #[must_use]
    pub fn builtin(extension: impl Into<String>) -> Self {
        Self {
            source: Cow::Borrowed(PART_TEMPLATE),
            extension: extension.into(),
        }
    }

    /// Creates a renderer from a template file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path, extension: impl Into<String>) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            source: Cow::Owned(source),
            extension: extension.into(),
        })
    }

    /// Creates the renderer described by the output configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured template file cannot be read.
    pub fn from_config(output: &OutputConfig) -> Result<Self, RenderError> {
        let extension = output.extension.trim_start_matches('.');
        match &output.template {
            Some(path) => Self::from_file(path, extension),
            None => Ok(Self::builtin(extension)),
        }
    }

    /// Renders a part, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid or fails to render.
    pub fn render(&self, part: &Part) -> Result<String, RenderError> {
        self.render_at(part, Utc::now())
    }

    /// Renders a part with a fixed generation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid or fails to render.
    pub fn render_at(
        &self,
        part: &Part,
        generated_at: DateTime<Utc>,
    ) -> Result<String, RenderError> {
        let template_error = |source| RenderError::Template {
            part_id: part.part_id.clone(),
            source,
        };

        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_filter("cell", escape_cell);
        env.add_template(TEMPLATE_NAME, &self.source)
            .map_err(template_error)?;

        env.get_template(TEMPLATE_NAME)
            .and_then(|tmpl| {
                tmpl.render(context! {
                    part => part,
                    generated_at => generated_at.format("%Y-%m-%d").to_string(),
                })
            })
            .map_err(template_error)
    }

    /// Returns where a part's document goes inside `directory`.
    #[must_use]
    pub fn document_path(&self, directory: &Path, part: &Part) -> PathBuf {
        directory.join(format!("{}.{}", file_stem(&part.part_id), self.extension))
    }

    /// Renders a part and writes it into `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn write(&self, directory: &Path, part: &Part) -> Result<PathBuf, RenderError> {
        let document = self.render(part)?;
        let path = self.document_path(directory, part);

        std::fs::create_dir_all(directory).map_err(|source| RenderError::Write {
            path: directory.to_path_buf(),
            source,
        })?;
        std::fs::write(&path, document).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Makes a part identifier safe to use as a file name.
///
/// Path separators and characters Windows rejects become `_`.
#[must_use]
pub fn file_stem(part_id: &str) -> String {
    let stem: String = part_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match stem.as_str() {
        "" | "." | ".." => format!("_{stem}"),
        _ => stem,
    }
}

/// Escapes text for a Markdown table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
