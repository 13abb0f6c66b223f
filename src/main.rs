//! Marginalia CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use marginalia::{Error, MarginaliaConfig};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let config = load_config()?;
    marginalia::cli::run(&config)
}

/// Installs the stderr tracing subscriber, filtered by `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ignored = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<MarginaliaConfig, Error> {
    MarginaliaConfig::load().map_err(|error| Error::Configuration {
        message: error.to_string(),
    })
}
