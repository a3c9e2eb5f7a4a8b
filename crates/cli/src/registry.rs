//! JSON file backed cell registry.
//!
//! The file holds either a bare array of cell records or an object with a
//! `cells` array (the shape the admin listing returns).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cellring::{Cell, CellRegistry};
use serde::Deserialize;
use tracing::debug;

/// Errors raised while loading a cell snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The snapshot file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON or has the wrong shape.
    #[error("malformed cell snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A record failed validation.
    #[error(transparent)]
    Invalid(#[from] cellring::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    List(Vec<Cell>),
    Wrapped { cells: Vec<Cell> },
}

/// Parse and validate a snapshot. Duplicate ids are rejected.
pub fn parse_snapshot(json: &str) -> Result<Vec<Cell>, RegistryError> {
    let cells = match serde_json::from_str(json)? {
        Snapshot::List(cells) | Snapshot::Wrapped { cells } => cells,
    };

    let mut seen = HashSet::with_capacity(cells.len());
    for cell in &cells {
        cell.validate()?;
        if !seen.insert(&cell.cell_id) {
            return Err(cellring::Error::DuplicateCell(cell.cell_id.clone()).into());
        }
    }
    Ok(cells)
}

/// Registry reading a JSON snapshot from disk on every scan.
#[derive(Debug, Clone)]
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CellRegistry for JsonFileRegistry {
    type Error = RegistryError;

    fn scan(&self) -> Result<Vec<Cell>, RegistryError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;
        let cells = parse_snapshot(&content)?;
        debug!(path = %self.path.display(), cells = cells.len(), "scanned registry");
        Ok(cells)
    }
}
