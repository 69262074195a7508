use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::id::RecordId;

/// A document that can live in a [`MemoryCollection`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Logical collection name, used for tracing.
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;
    fn set_id(&mut self, id: RecordId);
}

/// In-memory document collection.
///
/// All access is async and fallible to match the store contract; the lock is
/// held only across the map operation itself, never across an await point.
/// Writers to the same collection are serialized by the RwLock, which is the
/// only isolation the workflows above assume.
pub struct MemoryCollection<T> {
    rows: RwLock<BTreeMap<RecordId, T>>,
}

impl<T: Record> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Fetch a single document by id.
    pub async fn find_by_id(&self, id: &RecordId) -> Result<Option<T>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.get(id).cloned())
    }

    /// Fetch every document matching `filter`.
    pub async fn find_many<F>(&self, filter: F) -> Result<Vec<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|row| filter(row)).cloned().collect())
    }

    /// Fetch every document in the collection.
    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.find_many(|_| true).await
    }

    /// Fetch the first document matching `filter`, if any.
    pub async fn find_one<F>(&self, filter: F) -> Result<Option<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|row| filter(row)).cloned())
    }

    /// Insert a document, assigning it a fresh id. Returns the stored record.
    pub async fn insert(&self, mut record: T) -> Result<T, StoreError> {
        let id = RecordId::generate();
        record.set_id(id.clone());
        let mut rows = self.rows.write().await;
        rows.insert(id.clone(), record.clone());
        tracing::debug!(collection = T::COLLECTION, %id, "document inserted");
        Ok(record)
    }

    /// Apply `patch` to the document with the given id.
    ///
    /// Returns the updated record, or `None` when no such document exists.
    /// The patch cannot change the id.
    pub async fn update_by_id<F>(&self, id: &RecordId, patch: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(id) else {
            return Ok(None);
        };
        patch(row);
        row.set_id(id.clone());
        tracing::debug!(collection = T::COLLECTION, %id, "document updated");
        Ok(Some(row.clone()))
    }

    /// Remove the document with the given id. Removing a missing id is a no-op.
    pub async fn delete_by_id(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if rows.remove(id).is_some() {
            tracing::debug!(collection = T::COLLECTION, %id, "document deleted");
        }
        Ok(())
    }

    /// Number of documents currently stored.
    pub async fn count(&self) -> Result<usize, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.len())
    }
}

impl<T: Record> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: RecordId,
        body: String,
    }

    impl Note {
        fn new(body: &str) -> Self {
            Self {
                id: RecordId::unassigned(),
                body: body.to_string(),
            }
        }
    }

    impl Record for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &RecordId {
            &self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_find_by_id_round_trips() {
        let notes = MemoryCollection::new();
        let stored = notes.insert(Note::new("hello")).await.unwrap();
        assert!(!stored.id().is_unassigned());

        let found = notes.find_by_id(stored.id()).await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn find_one_and_find_many_apply_filters() {
        let notes = MemoryCollection::new();
        notes.insert(Note::new("alpha")).await.unwrap();
        notes.insert(Note::new("beta")).await.unwrap();
        notes.insert(Note::new("beta")).await.unwrap();

        let betas = notes.find_many(|n| n.body == "beta").await.unwrap();
        assert_eq!(betas.len(), 2);

        let alpha = notes.find_one(|n| n.body == "alpha").await.unwrap();
        assert_eq!(alpha.unwrap().body, "alpha");

        let missing = notes.find_one(|n| n.body == "gamma").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_by_id_patches_in_place_and_preserves_id() {
        let notes = MemoryCollection::new();
        let stored = notes.insert(Note::new("draft")).await.unwrap();

        let updated = notes
            .update_by_id(stored.id(), |n| n.body = "final".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.body, "final");
        assert_eq!(updated.id(), stored.id());

        let ghost = notes
            .update_by_id(&RecordId::generate(), |n| n.body.clear())
            .await
            .unwrap();
        assert!(ghost.is_none());
    }

    #[tokio::test]
    async fn delete_by_id_removes_and_tolerates_missing() {
        let notes = MemoryCollection::new();
        let stored = notes.insert(Note::new("gone soon")).await.unwrap();

        notes.delete_by_id(stored.id()).await.unwrap();
        assert_eq!(notes.count().await.unwrap(), 0);

        // Deleting again must not error.
        notes.delete_by_id(stored.id()).await.unwrap();
    }
}
