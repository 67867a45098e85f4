//! redb-based storage for the pending label queue

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::{LabelId, QueuedLabel};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Pending labels table: key = label id, value = JSON
const QUEUE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("label_queue");

#[derive(Debug, Error)]
pub enum QueueStorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type QueueStorageResult<T> = Result<T, QueueStorageError>;

/// Persistent pending queue
#[derive(Clone)]
pub struct QueueStorage {
    db: Arc<Database>,
}

impl QueueStorage {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> QueueStorageResult<Self> {
        Self::init(Database::create(path)?)
    }

    /// Open in-memory database
    pub fn open_in_memory() -> QueueStorageResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> QueueStorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(QUEUE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Store (or overwrite) a label
    pub fn insert(&self, label: &QueuedLabel) -> QueueStorageResult<()> {
        let key = label.id().to_string();
        let value = serde_json::to_vec(label)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(QUEUE_TABLE)?;
            table.insert(key.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove labels by id, returns how many existed
    pub fn remove(&self, ids: &[LabelId]) -> QueueStorageResult<usize> {
        let txn = self.db.begin_write()?;
        let mut removed = 0;
        {
            let mut table = txn.open_table(QUEUE_TABLE)?;
            for id in ids {
                if table.remove(id.to_string().as_str())?.is_some() {
                    removed += 1;
                }
            }
        }
        txn.commit()?;
        Ok(removed)
    }

    /// Remove every label, returns how many there were
    pub fn clear(&self) -> QueueStorageResult<usize> {
        let txn = self.db.begin_write()?;
        let removed;
        {
            let mut table = txn.open_table(QUEUE_TABLE)?;
            let mut keys = Vec::new();
            for result in table.iter()? {
                let (key, _) = result?;
                keys.push(key.value().to_string());
            }
            for key in &keys {
                table.remove(key.as_str())?;
            }
            removed = keys.len();
        }
        txn.commit()?;
        Ok(removed)
    }

    /// Load all labels ordered by creation time
    pub fn load_all(&self) -> QueueStorageResult<Vec<QueuedLabel>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(QUEUE_TABLE)?;

        let mut labels: Vec<QueuedLabel> = Vec::new();
        for result in table.iter()? {
            let (_, guard) = result?;
            let label: QueuedLabel = serde_json::from_slice(guard.value())?;
            labels.push(label);
        }

        labels.sort_by_key(|l| l.created_at());
        Ok(labels)
    }
}
