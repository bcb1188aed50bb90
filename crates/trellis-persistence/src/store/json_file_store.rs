use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_core::{TrellisError, TrellisResult};
use trellis_domain::RepositorySnapshot;

use crate::store::atomic_writer::AtomicWriter;

pub const FORMAT_VERSION: u32 = 1;

/// Reads and writes a [`RepositorySnapshot`] as JSON.
///
/// Saved files carry a small envelope with the format version and save
/// time. A bare snapshot object (as written by hand for fixtures) is
/// accepted on load as well.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonEnvelope {
    version: u32,
    saved_at: DateTime<Utc>,
    data: RepositorySnapshot,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, snapshot: &RepositorySnapshot) -> TrellisResult<()> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            data: snapshot.clone(),
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TrellisError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes)?;

        tracing::info!(
            "Saved {} bytes to {}",
            json_bytes.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Loads the snapshot; a missing file is an empty snapshot.
    pub fn load(&self) -> TrellisResult<RepositorySnapshot> {
        if !self.exists() {
            tracing::info!("{} does not exist, starting empty", self.path.display());
            return Ok(RepositorySnapshot::default());
        }

        let file_bytes = AtomicWriter::read_all(&self.path)?;
        let value: serde_json::Value = serde_json::from_slice(&file_bytes)
            .map_err(|e| TrellisError::Serialization(e.to_string()))?;

        let snapshot = match value.get("version").and_then(serde_json::Value::as_u64) {
            Some(version) if version == u64::from(FORMAT_VERSION) => {
                let envelope: JsonEnvelope = serde_json::from_value(value)
                    .map_err(|e| TrellisError::Serialization(e.to_string()))?;
                envelope.data
            }
            Some(version) => {
                return Err(TrellisError::Serialization(format!(
                    "Unsupported format version: {}",
                    version
                )))
            }
            None => serde_json::from_value(value)
                .map_err(|e| TrellisError::Serialization(e.to_string()))?,
        };

        tracing::info!(
            "Loaded {} bytes from {}",
            file_bytes.len(),
            self.path.display()
        );
        Ok(snapshot)
    }
}
