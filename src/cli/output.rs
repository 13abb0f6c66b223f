//! Output destination handling.

use std::fs;
use std::io::{self, Write};

use chrono::Local;

use crate::error::Error;
use crate::github::PullRequestRef;

/// Where the rendered document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to standard output.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputTarget {
    /// Chooses the target from the output flags.
    ///
    /// An explicit `output_file` path beats the `output` flag; `output`
    /// alone generates a filename from the pull request identity.
    #[must_use]
    pub fn choose(output: bool, output_file: Option<&str>, pull_request: &PullRequestRef) -> Self {
        if let Some(path) = output_file {
            return Self::File(path.to_owned());
        }
        if output {
            return Self::File(generated_filename(pull_request));
        }
        Self::Stdout
    }

    /// Writes the rendered bytes to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the destination cannot be written.
    pub fn write(&self, rendered: &[u8]) -> Result<(), Error> {
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(rendered).map_err(|error| Error::Io {
                    message: error.to_string(),
                })
            }
            Self::File(path) => {
                fs::write(path, rendered).map_err(|error| Error::Io {
                    message: format!("could not write '{path}': {error}"),
                })?;
                tracing::info!(path, "output saved");
                Ok(())
            }
        }
    }
}

/// Generates `<owner>-<repo>-<timestamp>-pr<number>.md`.
#[must_use]
pub fn generated_filename(pull_request: &PullRequestRef) -> String {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    format!(
        "{}-{}-{timestamp}-pr{}.md",
        pull_request.owner(),
        pull_request.repository(),
        pull_request.number()
    )
}
