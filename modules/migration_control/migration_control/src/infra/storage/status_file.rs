//! Deployment status document storage.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use migration_control_sdk::DeploymentRecord;
use parking_lot::Mutex;

use crate::domain::lifecycle::DeploymentStatusStore;

/// JSON document shared with the deployment orchestrator.
///
/// Writes go to a temporary file in the same directory and are renamed over
/// the document, so readers never observe a partial record.
pub struct FileStatusStore {
    path: PathBuf,
}

impl FileStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeploymentStatusStore for FileStatusStore {
    async fn load(&self) -> anyhow::Result<Option<DeploymentRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading {}", self.path.display()));
            }
        };

        let record = serde_json::from_slice(&bytes)
            .with_context(|| format!("decoding {}", self.path.display()))?;
        Ok(Some(record))
    }

    async fn save(&self, record: &DeploymentRecord) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(record).context("encoding deployment record")?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .context("status writer task failed")?
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents).context("writing temp file")?;
    tmp.as_file().sync_all().context("syncing temp file")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Process-local store, for tests and for running without an orchestrator.
#[derive(Default)]
pub struct InMemoryStatusStore {
    record: Mutex<Option<DeploymentRecord>>,
}

#[async_trait]
impl DeploymentStatusStore for InMemoryStatusStore {
    async fn load(&self) -> anyhow::Result<Option<DeploymentRecord>> {
        Ok(self.record.lock().clone())
    }

    async fn save(&self, record: &DeploymentRecord) -> anyhow::Result<()> {
        *self.record.lock() = Some(record.clone());
        Ok(())
    }
}
