use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::StoreError;
use crate::schema::Tables;

/// Shared handle to the record store.
///
/// Readers see committed state only. Writers go through [`Database::begin`],
/// which hands out a [`UnitOfWork`]; units of work are serialized, so a
/// read-then-write sequence inside one unit cannot interleave with another.
#[derive(Clone)]
pub struct Database {
    committed: Arc<RwLock<Tables>>,
    snapshot: Option<Arc<SnapshotFile>>,
}

impl Database {
    pub fn in_memory() -> Self {
        Self {
            committed: Arc::new(RwLock::new(Tables::default())),
            snapshot: None,
        }
    }

    /// Opens a store persisted to `path`, loading the previous snapshot if any.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let snapshot = SnapshotFile::new(path.into());
        let tables = snapshot.load().await?;

        Ok(Self {
            committed: Arc::new(RwLock::new(tables)),
            snapshot: Some(Arc::new(snapshot)),
        })
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match &config.data_file {
            Some(path) => Self::open(path.clone()).await,
            None => Ok(Self::in_memory()),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.committed.read().await
    }

    /// Takes the global write lock and stages a full clone of every table.
    ///
    /// With a snapshot file configured, commit also rewrites the whole JSON
    /// image while the lock is held, so each write costs O(total rows).
    pub async fn begin(&self) -> UnitOfWork<'_> {
        let guard = self.committed.write().await;
        let staged = guard.clone();

        UnitOfWork {
            guard,
            staged,
            snapshot: self.snapshot.as_deref(),
        }
    }
}

/// Staged writes against a private copy of the tables.
///
/// Nothing is visible to other callers until [`UnitOfWork::commit`];
/// dropping the unit of work discards every staged write.
pub struct UnitOfWork<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    staged: Tables,
    snapshot: Option<&'a SnapshotFile>,
}

impl UnitOfWork<'_> {
    pub async fn commit(self) -> Result<(), StoreError> {
        let UnitOfWork { mut guard, staged, snapshot } = self;

        if let Some(snapshot) = snapshot {
            snapshot.store(&staged).await?;
        }

        *guard = staged;
        debug!("Unit of work committed");
        Ok(())
    }
}

impl Deref for UnitOfWork<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.staged
    }
}

impl DerefMut for UnitOfWork<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.staged
    }
}

/// JSON image of the committed tables on disk.
struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn load(&self) -> Result<Tables, StoreError> {
        if !tokio::fs::try_exists(&self.path).await? {
            info!("No snapshot at {}, starting with empty tables", self.path.display());
            return Ok(Tables::default());
        }

        let bytes = tokio::fs::read(&self.path).await?;
        let tables: Tables = serde_json::from_slice(&bytes)?;
        info!("Loaded snapshot from {}", self.path.display());
        Ok(tables)
    }

    async fn store(&self, tables: &Tables) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(tables)?;
        let staging = staging_path(&self.path);

        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
