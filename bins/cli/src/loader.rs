//! Reading report definitions and ledgers from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use finstate_core::reports::{ReportDefinition, ReportRegistry};
use finstate_core::trial_balance::LedgerRow;
use finstate_shared::AppError;
use finstate_shared::config::ReportsConfig;
use finstate_shared::types::StatementType;

/// Reads a whole file, tagging errors with the path.
pub fn read_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|err| AppError::Io(format!("{}: {err}", path.display())))
}

/// Parses a JSON document, tagging errors with the path.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|err| AppError::Parse(format!("{}: {err}", path.display())))
}

/// Loads a ledger snapshot: a JSON array of rows.
pub fn load_ledger(path: &Path) -> Result<Vec<LedgerRow>, AppError> {
    let rows: Vec<LedgerRow> = read_json(path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded ledger");
    Ok(rows)
}

/// Registers every `*.json` definition in the configured directory.
///
/// Definitions that fail to parse or validate are skipped with a warning so
/// one broken file does not hide the others.
pub fn load_registry(config: &ReportsConfig) -> Result<ReportRegistry, AppError> {
    let dir = Path::new(&config.directory);
    let entries = fs::read_dir(dir)
        .map_err(|err| AppError::Io(format!("{}: {err}", dir.display())))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut registry = ReportRegistry::new();
    for path in paths {
        let definition: ReportDefinition = match read_json(&path) {
            Ok(definition) => definition,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable report definition");
                continue;
            }
        };
        if let Err(err) = registry.register(definition) {
            warn!(path = %path.display(), error = %err, "skipping report definition");
        }
    }

    for (name, report_id) in &config.defaults {
        match name.parse::<StatementType>() {
            Ok(statement_type) => {
                if let Err(err) = registry.set_default(statement_type, report_id) {
                    warn!(statement_type = %name, error = %err, "ignoring default report");
                }
            }
            Err(err) => warn!(error = %err, "ignoring default report"),
        }
    }

    info!(
        directory = %dir.display(),
        reports = registry.len(),
        "loaded report registry"
    );
    Ok(registry)
}
