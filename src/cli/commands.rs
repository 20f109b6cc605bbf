//! CLI command implementations
//!
//! `serve` boots the file store and runs the HTTP server inside a
//! tokio runtime; `import` and `flush` are the one-shot bulk loader.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::http::ApiServer;
use crate::model::Tour;
use crate::store::{DocumentStore, FileStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Collection the loader operates on.
const TOURS_COLLECTION: &str = "tours";

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Import { config, fixture } => import(&config, &fixture),
        Command::Flush { config } => flush(&config),
    }
}

fn init_tracing() {
    // try_init: tests may install a subscriber first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn open_store(config: &Config) -> CliResult<FileStore> {
    Ok(FileStore::open(config.data_path())?)
}

/// Start the HTTP API server.
///
/// Runs until a shutdown signal drains in-flight requests; any boot or
/// serve failure propagates to a non-zero process exit.
pub fn serve(config_path: &Path, port_override: Option<u16>) -> CliResult<()> {
    init_tracing();

    let mut config = Config::load(config_path)?;
    if let Some(port) = port_override {
        config.port = port;
    }

    let store = open_store(&config)?;
    let server = ApiServer::new(config.http(), Arc::new(store));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::server(format!("Failed to create tokio runtime: {}", e)))?;

    runtime.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::server(e.to_string()))
    })
}

/// Bulk-import a fixture file into the tours collection.
///
/// The whole file is validated before anything is inserted, so a bad
/// record aborts the import without a partial write.
pub fn import(config_path: &Path, fixture_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let content = fs::read_to_string(fixture_path).map_err(|e| {
        CliError::fixture(format!(
            "Failed to read {}: {}",
            fixture_path.display(),
            e
        ))
    })?;

    let records: Vec<Value> = serde_json::from_str(&content)
        .map_err(|e| CliError::fixture(format!("Fixture is not a JSON array: {}", e)))?;

    let mut documents = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let tour = Tour::parse(record)
            .map_err(|e| CliError::fixture(format!("Record {}: {}", index, e)))?;
        documents.push(tour.to_document());
    }

    let inserted = store.insert_many(TOURS_COLLECTION, documents)?;
    tracing::info!(count = inserted.len(), "fixture imported");

    write_response(json!({ "imported": inserted.len() }))
}

/// Delete every document in the tours collection.
pub fn flush(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let deleted = store.delete_many(TOURS_COLLECTION)?;
    tracing::info!(count = deleted, "tours collection flushed");

    write_response(json!({ "deleted": deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryOptions;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) -> std::path::PathBuf {
        let config_path = dir.path().join("tourbase.json");
        let data_dir = dir.path().join("data");
        fs::write(
            &config_path,
            json!({"data_dir": data_dir.to_string_lossy()}).to_string(),
        )
        .unwrap();
        config_path
    }

    fn write_fixture(dir: &TempDir, body: Value) -> std::path::PathBuf {
        let fixture_path = dir.path().join("tours.json");
        fs::write(&fixture_path, body.to_string()).unwrap();
        fixture_path
    }

    fn valid_fixture() -> Value {
        json!([
            {
                "name": "The Forest Hiker",
                "price": 397.0,
                "summary": "Breathtaking hike",
                "difficulty": "easy",
                "startDates": ["2030-04-25T09:00:00Z"]
            },
            {
                "name": "The Sea Explorer",
                "price": 497.0,
                "summary": "Exploring the coast",
                "difficulty": "medium"
            }
        ])
    }

    #[test]
    fn test_import_then_flush_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);
        let fixture_path = write_fixture(&dir, valid_fixture());

        import(&config_path, &fixture_path).unwrap();

        let config = Config::load(&config_path).unwrap();
        let store = FileStore::open(config.data_path()).unwrap();
        let all = store
            .find_many(TOURS_COLLECTION, &QueryOptions::default())
            .unwrap();
        assert_eq!(all.len(), 2);

        flush(&config_path).unwrap();
        let store = FileStore::open(config.data_path()).unwrap();
        let all = store
            .find_many(TOURS_COLLECTION, &QueryOptions::default())
            .unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_import_missing_fixture_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);

        let result = import(&config_path, &dir.path().join("absent.json"));
        assert!(matches!(result, Err(CliError::Fixture(_))));
    }

    #[test]
    fn test_import_invalid_record_aborts_without_partial_write() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);
        let fixture_path = write_fixture(
            &dir,
            json!([
                {
                    "name": "Good",
                    "price": 100.0,
                    "summary": "ok",
                    "difficulty": "easy"
                },
                {
                    "name": "Bad",
                    "price": -5.0,
                    "summary": "negative price",
                    "difficulty": "easy"
                }
            ]),
        );

        let result = import(&config_path, &fixture_path);
        assert!(matches!(result, Err(CliError::Fixture(_))));

        let config = Config::load(&config_path).unwrap();
        let store = FileStore::open(config.data_path()).unwrap();
        let all = store
            .find_many(TOURS_COLLECTION, &QueryOptions::default())
            .unwrap();
        assert!(all.is_empty());
    }
}
