//! Pending label queue
//!
//! Ordered by creation time, keyed by label id. Optionally write-through
//! persisted so the queue survives restarts. Storage is updated first, so
//! a failed write leaves memory unchanged.

pub mod storage;

use shared::{Draft, LabelId, QueuedLabel};

pub use storage::{QueueStorage, QueueStorageError, QueueStorageResult};

#[derive(Default)]
pub struct PendingQueue {
    labels: Vec<QueuedLabel>,
    storage: Option<QueueStorage>,
}

impl PendingQueue {
    /// In-memory queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue backed by storage, loaded with whatever it already holds
    pub fn with_storage(storage: QueueStorage) -> QueueStorageResult<Self> {
        let labels = storage.load_all()?;
        Ok(Self {
            labels,
            storage: Some(storage),
        })
    }

    pub fn labels(&self) -> &[QueuedLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, id: LabelId) -> Option<&QueuedLabel> {
        self.labels.iter().find(|l| l.id() == id)
    }

    /// Add a label. A label with the same id replaces the old entry.
    pub fn push(&mut self, label: QueuedLabel) -> QueueStorageResult<()> {
        if let Some(storage) = &self.storage {
            storage.insert(&label)?;
        }

        self.labels.retain(|l| l.id() != label.id());
        let pos = self
            .labels
            .partition_point(|l| l.created_at() <= label.created_at());
        self.labels.insert(pos, label);
        Ok(())
    }

    /// Remove one label; no other entry is touched
    pub fn remove(&mut self, id: LabelId) -> QueueStorageResult<Option<QueuedLabel>> {
        let Some(pos) = self.labels.iter().position(|l| l.id() == id) else {
            return Ok(None);
        };
        if let Some(storage) = &self.storage {
            storage.remove(&[id])?;
        }
        Ok(Some(self.labels.remove(pos)))
    }

    /// Remove several labels, returns how many were present
    pub fn remove_many(&mut self, ids: &[LabelId]) -> QueueStorageResult<usize> {
        if let Some(storage) = &self.storage {
            storage.remove(ids)?;
        }
        let before = self.labels.len();
        self.labels.retain(|l| !ids.contains(&l.id()));
        Ok(before - self.labels.len())
    }

    /// Take a label out of the queue and hand it back as an editable draft
    pub fn edit(&mut self, id: LabelId) -> QueueStorageResult<Option<Draft>> {
        Ok(self.remove(id)?.as_ref().map(Draft::from))
    }

    /// Drop everything, returns how many labels there were
    pub fn clear(&mut self) -> QueueStorageResult<usize> {
        if let Some(storage) = &self.storage {
            storage.clear()?;
        }
        let count = self.labels.len();
        self.labels.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Decimal, LabelContent};

    fn label(name: &str, cents: i64) -> QueuedLabel {
        QueuedLabel::new(name, Decimal::new(cents, 2), vec!["A".to_string()]).unwrap()
    }

    #[test]
    fn test_remove_leaves_others_untouched() {
        let mut queue = PendingQueue::new();
        let a = label("A", 100);
        let b = label("B", 200);
        let c = label("C", 300);
        for l in [a.clone(), b.clone(), c.clone()] {
            queue.push(l).unwrap();
        }

        let removed = queue.remove(b.id()).unwrap().unwrap();
        assert_eq!(removed, b);
        assert_eq!(queue.labels(), &[a.clone(), c.clone()]);
        assert_eq!(queue.get(a.id()).unwrap().product_name(), "A");
        assert_eq!(queue.get(c.id()).unwrap().price(), Decimal::new(300, 2));

        assert!(queue.remove(b.id()).unwrap().is_none());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_push_keeps_creation_order() {
        let mut queue = PendingQueue::new();
        let a = label("A", 100);
        let b = label("B", 100);
        queue.push(b.clone()).unwrap();
        queue.push(a.clone()).unwrap();
        assert_eq!(queue.labels(), &[a, b]);
    }

    #[test]
    fn test_push_same_id_replaces() {
        let mut queue = PendingQueue::new();
        let a = label("A", 100);
        queue.push(a.clone()).unwrap();
        queue.push(a.clone()).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_edit_removes_and_returns_draft() {
        let mut queue = PendingQueue::new();
        let a = label("A", 1999);
        queue.push(a.clone()).unwrap();

        let draft = queue.edit(a.id()).unwrap().unwrap();
        assert!(queue.is_empty());
        assert_eq!(draft.product_name, "A");
        assert_eq!(draft.price, "19.99");
    }

    #[test]
    fn test_persistent_queue_reloads() {
        let storage = QueueStorage::open_in_memory().unwrap();
        let a = label("A", 100);
        let b = label("B", 200);

        {
            let mut queue = PendingQueue::with_storage(storage.clone()).unwrap();
            queue.push(a.clone()).unwrap();
            queue.push(b.clone()).unwrap();
            queue.remove(a.id()).unwrap();
        }

        let queue = PendingQueue::with_storage(storage.clone()).unwrap();
        assert_eq!(queue.labels(), &[b]);

        let mut queue = queue;
        assert_eq!(queue.clear().unwrap(), 1);
        assert!(storage.load_all().unwrap().is_empty());
    }
}
