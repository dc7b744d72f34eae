#![forbid(unsafe_code)]

mod admin;
mod entry;
mod handlers;
mod server;
mod support;

pub(crate) use support::*;

use std::path::PathBuf;
use std::process::ExitCode;
use survey_storage::SqliteStore;

const STORAGE_DIR_ENV: &str = "SURVEY_STORAGE_DIR";

pub(crate) struct SurveyServer {
    store: SqliteStore,
}

fn main() -> ExitCode {
    init_tracing();

    let storage_dir = match resolve_storage_dir() {
        Ok(dir) => dir,
        Err(message) => {
            tracing::error!(reason = message, "startup configuration failed");
            return ExitCode::FAILURE;
        }
    };

    let store = match SqliteStore::open(&storage_dir) {
        Ok(store) => {
            tracing::info!(dir = %store.storage_dir().display(), "survey store opened");
            store
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to open survey store");
            return ExitCode::FAILURE;
        }
    };

    let mut server = SurveyServer::new(store);
    if let Err(err) = entry::run_stdio(&mut server) {
        tracing::error!(error = %err, "stdio transport failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Ordered configuration resolution: CLI flag first, then the environment.
/// Absence of both is a startup failure; there is no placeholder fallback.
fn resolve_storage_dir() -> Result<PathBuf, &'static str> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--storage-dir" {
            return match args.next() {
                Some(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
                _ => Err("--storage-dir requires a value"),
            };
        }
        if let Some(value) = arg.strip_prefix("--storage-dir=") {
            if value.trim().is_empty() {
                return Err("--storage-dir requires a value");
            }
            return Ok(PathBuf::from(value));
        }
    }

    match std::env::var(STORAGE_DIR_ENV) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => Err("no storage directory configured; pass --storage-dir or set SURVEY_STORAGE_DIR"),
    }
}
