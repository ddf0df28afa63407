//! File-backed message store.
//!
//! All submissions live in one pretty-printed JSON array at
//! `<data_dir>/messages.json`. Entries are kept as untyped JSON, so whatever
//! was stored comes back verbatim. Every append reloads the array, pushes the
//! new submission and replaces the whole file. Appends on one [`MessageStore`] are
//! serialized through an async mutex so concurrent submissions cannot drop
//! each other, and the replacement goes through a temp file + rename so a
//! failed write never leaves a truncated document behind.

use std::io;
use std::path::{Path, PathBuf};

use folio_common::message::Submission;
use serde_json::Value;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File name of the store inside the data directory.
pub const MESSAGES_FILE: &str = "messages.json";

/// What to do when the store file exists but is not a JSON array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CorruptStorePolicy {
    /// Log a warning and treat the store as empty. The next append replaces
    /// the corrupt file.
    #[default]
    Reset,
    /// Surface the problem to the caller and leave the file untouched.
    Fail,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{} is not a JSON array of messages: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode messages: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug)]
pub struct MessageStore {
    data_dir: PathBuf,
    path: PathBuf,
    policy: CorruptStorePolicy,
    writer: Mutex<()>,
}

impl MessageStore {
    pub fn new(data_dir: impl Into<PathBuf>, policy: CorruptStorePolicy) -> Self {
        let data_dir = data_dir.into();
        let path = data_dir.join(MESSAGES_FILE);
        Self {
            data_dir,
            path,
            policy,
            writer: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> CorruptStorePolicy {
        self.policy
    }

    /// Create the data directory and any missing parents. Idempotent.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: self.data_dir.clone(),
                source,
            })
    }

    /// Every stored entry, in arrival order.
    ///
    /// A store that was never written is empty. A file that is not a JSON
    /// array is handled according to the store's [`CorruptStorePolicy`]. Any
    /// other I/O failure is returned as [`StoreError::Read`], so a transient
    /// error never leads to the file being replaced.
    pub async fn read_all(&self) -> Result<Vec<Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "message store not created yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(source) => self.recover(StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Number of stored entries.
    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read_all().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }

    /// Append `submission` to the end of the store and return the new entry
    /// count.
    ///
    /// The caller is answered only after the full document has been replaced
    /// on disk.
    pub async fn append(&self, submission: Submission) -> Result<usize, StoreError> {
        let _guard = self.writer.lock().await;
        let mut entries = self.read_all().await?;
        entries.push(submission.into());
        self.write_entries(&entries).await?;
        Ok(entries.len())
    }

    fn recover(&self, err: StoreError) -> Result<Vec<Value>, StoreError> {
        match self.policy {
            CorruptStorePolicy::Reset => {
                warn!(error = %err, "treating corrupt message store as empty");
                Ok(Vec::new())
            }
            CorruptStorePolicy::Fail => Err(err),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn write_entries(&self, entries: &[Value]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(entries).map_err(StoreError::Serialize)?;
        let tmp = self.temp_path();

        if let Err(source) = write_synced(&tmp, &body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Write { path: tmp, source });
        }
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

async fn write_synced(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(body).await?;
    file.sync_all().await
}
