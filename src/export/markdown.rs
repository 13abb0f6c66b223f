//! Markdown renderer for fetched review comments.
//!
//! Generates human-readable Markdown: a header naming the pull request,
//! then one section per comment with its file location, reviewer,
//! timestamps, state badges, body text, and the diff hunk in a fenced code
//! block.

use std::io::Write;

use camino::Utf8Path;

use crate::error::Error;

use super::model::{ExportDocument, ExportedComment};

/// Writes the document in Markdown format to the given writer.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(writer: &mut W, document: &ExportDocument) -> Result<(), Error> {
    write_header(writer, document)?;

    for comment in &document.comments {
        write_comment_section(writer, comment)?;
    }

    Ok(())
}

/// Writes the document header naming the pull request.
fn write_header<W: Write>(writer: &mut W, document: &ExportDocument) -> Result<(), Error> {
    let heading = document.title.as_ref().map_or_else(
        || {
            format!(
                "Review comments for {}/{}#{}",
                document.owner, document.repository, document.number
            )
        },
        |title| {
            format!(
                "Review comments for {}/{}#{}: {title}",
                document.owner, document.repository, document.number
            )
        },
    );

    writeln!(writer, "# {heading}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "PR: {}", document.url).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes a single comment section.
fn write_comment_section<W: Write>(
    writer: &mut W,
    comment: &ExportedComment,
) -> Result<(), Error> {
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    write_location_heading(writer, comment)?;
    write_metadata(writer, comment)?;

    if !comment.body.is_empty() {
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "{}", comment.body).map_err(|e| io_error(&e))?;
    }

    if !comment.diff_hunk.is_empty() {
        write_code_block(writer, &comment.file_path, &comment.diff_hunk)?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes the file location heading.
fn write_location_heading<W: Write>(
    writer: &mut W,
    comment: &ExportedComment,
) -> Result<(), Error> {
    let location = comment.line.map_or_else(
        || comment.file_path.clone(),
        |line| format!("{}:{line}", comment.file_path),
    );
    writeln!(writer, "## {location}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes reviewer, timestamps and state badges.
fn write_metadata<W: Write>(writer: &mut W, comment: &ExportedComment) -> Result<(), Error> {
    if let Some(author) = &comment.author {
        writeln!(writer, "**Reviewer:** {author}").map_err(|e| io_error(&e))?;
    }
    writeln!(writer, "**Created:** {}", comment.created_at).map_err(|e| io_error(&e))?;
    if let Some(updated_at) = &comment.updated_at {
        writeln!(writer, "**Updated:** {updated_at}").map_err(|e| io_error(&e))?;
    }

    let badges = state_badges(comment);
    if !badges.is_empty() {
        writeln!(writer, "**State:** {}", badges.join(", ")).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Badges describing the comment's resolution and anchoring state.
fn state_badges(comment: &ExportedComment) -> Vec<&'static str> {
    let mut badges = Vec::new();
    if comment.is_resolved {
        badges.push("resolved");
    }
    if comment.is_outdated {
        badges.push("outdated");
    }
    badges
}

/// Writes a fenced code block with a language hint from the extension.
///
/// Uses a fence length that exceeds any backtick run in the diff hunk so
/// nested fences cannot break the surrounding document.
fn write_code_block<W: Write>(
    writer: &mut W,
    file_path: &str,
    diff_hunk: &str,
) -> Result<(), Error> {
    let language = Utf8Path::new(file_path)
        .extension()
        .map_or("diff", extension_to_language);

    let fence = compute_fence(diff_hunk);
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{fence}{language}").map_err(|e| io_error(&e))?;
    writeln!(writer, "{diff_hunk}").map_err(|e| io_error(&e))?;
    writeln!(writer, "{fence}").map_err(|e| io_error(&e))?;
    Ok(())
}

/// Computes a fence string that exceeds any backtick run in the content.
fn compute_fence(content: &str) -> String {
    let max_backticks = content.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let fence_len = max_backticks.max(2) + 1;
    "`".repeat(fence_len)
}

/// Extension-to-language mapping entries.
const EXTENSION_MAPPINGS: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "jsx"),
    ("tsx", "tsx"),
    ("rb", "ruby"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("swift", "swift"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("h", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("php", "php"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "zsh"),
    ("ps1", "powershell"),
    ("sql", "sql"),
    ("md", "markdown"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("xml", "xml"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
];

/// Maps file extensions to Markdown code block language hints.
fn extension_to_language(ext: &str) -> &'static str {
    let ext_lower = ext.to_lowercase();
    EXTENSION_MAPPINGS
        .iter()
        .find(|(candidate, _)| *candidate == ext_lower)
        .map_or("diff", |(_, language)| language)
}

/// Converts an I/O error to an [`Error::Io`].
fn io_error(error: &std::io::Error) -> Error {
    Error::Io {
        message: error.to_string(),
    }
}
