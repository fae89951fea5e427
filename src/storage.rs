use crate::errors::StoreError;
use crate::models::{LogDocument, LogEntry};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Date-keyed persistence for log entries. An entry is stored under its own
/// `date`, and `upsert` replaces whatever was there.
#[async_trait]
pub trait LogStore: Send + Sync + 'static {
    fn backend(&self) -> &'static str;

    async fn get(&self, date: NaiveDate) -> Result<Option<LogEntry>, StoreError>;

    async fn get_all(&self) -> Result<BTreeMap<NaiveDate, LogEntry>, StoreError>;

    async fn upsert(&self, entry: LogEntry) -> Result<LogEntry, StoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    logs: Mutex<BTreeMap<NaiveDate, LogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = LogEntry>) -> Self {
        let logs = entries
            .into_iter()
            .map(|entry| (entry.date, entry))
            .collect();
        Self {
            logs: Mutex::new(logs),
        }
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, date: NaiveDate) -> Result<Option<LogEntry>, StoreError> {
        Ok(self.logs.lock().await.get(&date).cloned())
    }

    async fn get_all(&self) -> Result<BTreeMap<NaiveDate, LogEntry>, StoreError> {
        Ok(self.logs.lock().await.clone())
    }

    async fn upsert(&self, entry: LogEntry) -> Result<LogEntry, StoreError> {
        self.logs.lock().await.insert(entry.date, entry.clone());
        Ok(entry)
    }
}

/// The whole log as one pretty-printed JSON document.
///
/// Every operation re-reads the file. Read-modify-write cycles are serialized
/// behind a lock, and writes land through a temp file and rename so a reader
/// never sees a half-written document. Other processes writing the same file
/// are not coordinated with.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl LogStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "json-file"
    }

    async fn get(&self, date: NaiveDate) -> Result<Option<LogEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut data = load_data(&self.path).await?;
        Ok(data.logs.remove(&date))
    }

    async fn get_all(&self) -> Result<BTreeMap<NaiveDate, LogEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(load_data(&self.path).await?.logs)
    }

    async fn upsert(&self, entry: LogEntry) -> Result<LogEntry, StoreError> {
        let _guard = self.lock.lock().await;
        let mut data = load_data(&self.path).await?;
        data.logs.insert(entry.date, entry.clone());
        persist_data(&self.path, &data).await?;
        debug!(date = %entry.date, entries = data.logs.len(), "log entry written");
        Ok(entry)
    }
}

/// Reads the document, creating an empty one on first access.
pub async fn load_data(path: &Path) -> Result<LogDocument, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            let data = LogDocument::default();
            persist_data(path, &data).await?;
            info!(path = %path.display(), "created empty log document");
            Ok(data)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_data(path: &Path, data: &LogDocument) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}
