//! Template-driven rendering using Jinja2-compatible syntax.
//!
//! Users can supply a template file to control the structure of the
//! rendered document instead of the built-in Markdown layout.
//!
//! # Available Variables
//!
//! **Document-level:**
//! - `owner`, `repository`, `number`, `url`, `title` — pull request identity
//! - `generated_at` — render timestamp (ISO 8601)
//! - `comments` — list of comment objects
//!
//! **Comment-level** (inside `{% for comment in comments %}`):
//! - `comment.file` — file path
//! - `comment.line` — line number (empty string when unanchored)
//! - `comment.reviewer` — comment author
//! - `comment.body` — comment text
//! - `comment.context` — diff hunk
//! - `comment.timestamp` — creation timestamp
//! - `comment.resolved` / `comment.outdated` — state flags

use std::io::Write;

use chrono::Utc;
use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::Error;

use super::model::{ExportDocument, ExportedComment};

/// Template context for a single comment.
#[derive(Debug, Clone, Serialize)]
struct TemplateComment {
    /// File path.
    file: String,
    /// Line number (empty string when unanchored).
    line: String,
    /// Comment author (empty string when the account is gone).
    reviewer: String,
    /// Comment body text.
    body: String,
    /// Diff hunk context.
    context: String,
    /// Creation timestamp.
    timestamp: String,
    /// Whether the containing thread has been resolved.
    resolved: bool,
    /// Whether the comment is anchored to a superseded diff.
    outdated: bool,
}

impl From<&ExportedComment> for TemplateComment {
    fn from(comment: &ExportedComment) -> Self {
        Self {
            file: comment.file_path.clone(),
            line: comment
                .line
                .map_or_else(String::new, |number| number.to_string()),
            reviewer: comment.author.clone().unwrap_or_default(),
            body: comment.body.clone(),
            context: comment.diff_hunk.clone(),
            timestamp: comment.created_at.clone(),
            resolved: comment.is_resolved,
            outdated: comment.is_outdated,
        }
    }
}

/// Renders the document through a user-provided Jinja2 template.
///
/// # Errors
///
/// Returns [`Error::Template`] if the template has syntax errors or fails
/// to render, and [`Error::Io`] if writing the output fails.
///
/// # Example Template
///
/// ```jinja2
/// # Comments on {{ url }}
///
/// {% for c in comments %}
/// ## {{ c.file }}:{{ c.line }}
/// {{ c.body }}
/// {% endfor %}
/// ```
pub fn write_template<W: Write>(
    writer: &mut W,
    document: &ExportDocument,
    template_content: &str,
) -> Result<(), Error> {
    let mut env = Environment::new();

    // Users control the output format, so nothing is escaped for them.
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);

    env.add_template("export", template_content)
        .map_err(|e| Error::Template {
            message: format!("invalid template syntax: {e}"),
        })?;

    let template_comments: Vec<TemplateComment> =
        document.comments.iter().map(TemplateComment::from).collect();

    let generated_at = Utc::now().to_rfc3339();

    let ctx = context! {
        owner => document.owner,
        repository => document.repository,
        number => document.number,
        url => document.url,
        title => document.title.clone().unwrap_or_default(),
        generated_at => generated_at,
        comments => template_comments,
    };

    let template = env.get_template("export").map_err(|e| Error::Template {
        message: format!("failed to retrieve template: {e}"),
    })?;

    let output = template.render(ctx).map_err(|e| Error::Template {
        message: format!("template rendering failed: {e}"),
    })?;

    writer.write_all(output.as_bytes()).map_err(|e| Error::Io {
        message: format!("failed to write template output: {e}"),
    })?;

    Ok(())
}
