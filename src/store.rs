//! Todo item store.
//!
//! Owns the lifecycle rules for todo items on top of a [`Repository`]:
//! titles are validated before anything is written, deletes are soft, and an
//! undo-delete is only accepted for an item that is currently deleted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::todo::{ListFilter, TodoItem, MAX_TITLE_LENGTH};
use crate::repository::memory::MemoryRepository;
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("todo item {0} does not exist")]
    NotFound(i32),

    #[error("{0}")]
    InvalidState(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

#[derive(Clone)]
pub struct TodoStore {
    repository: Arc<dyn Repository>,
}

impl TodoStore {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRepository::new()))
    }

    /// Items matching `filter`, in id order.
    #[tracing::instrument(skip(self))]
    pub fn list(&self, filter: ListFilter) -> Result<Vec<TodoItem>, StoreError> {
        self.repository.list(filter)
    }

    /// Every item regardless of its deleted flag.
    ///
    /// There is no change history behind this; it is the unfiltered listing.
    pub fn undo_changes(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.list(ListFilter::All)
    }

    #[tracing::instrument(skip(self))]
    pub fn create(&self, title: Option<&str>) -> Result<TodoItem, StoreError> {
        let title = validate_title(title)?;
        let todo = self.repository.insert(title)?;
        info!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Replaces the title of an item, deleted or not.
    #[tracing::instrument(skip(self))]
    pub fn update(&self, id: i32, title: Option<&str>) -> Result<TodoItem, StoreError> {
        let title = validate_title(title)?;
        let todo = self
            .repository
            .set_title(id, title)?
            .ok_or(StoreError::NotFound(id))?;
        info!(id, "todo updated");
        Ok(todo)
    }

    /// Soft-deletes an item. Deleting an already deleted item is accepted.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: i32) -> Result<(), StoreError> {
        let was_deleted = self
            .repository
            .swap_deleted(id, true)?
            .ok_or(StoreError::NotFound(id))?;
        info!(id, was_deleted, "todo deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn undo_delete(&self, id: i32) -> Result<(), StoreError> {
        let was_deleted = self
            .repository
            .swap_deleted(id, false)?
            .ok_or(StoreError::NotFound(id))?;
        if !was_deleted {
            warn!(id, "undo-delete rejected, item is active");
            return Err(StoreError::InvalidState("item is not deleted".to_string()));
        }
        info!(id, "todo restored");
        Ok(())
    }
}

fn validate_title(title: Option<&str>) -> Result<&str, StoreError> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(StoreError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(StoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> TodoStore {
        TodoStore::in_memory()
    }

    #[rstest]
    fn create_assigns_fresh_ids(store: TodoStore) {
        let first = store.create(Some("Buy milk")).unwrap();
        let second = store.create(Some("Walk dog")).unwrap();
        assert_ne!(first.id, second.id);
        assert!(!first.completed);
        assert!(!first.is_deleted);
        let ids: Vec<i32> = store.list(ListFilter::Active).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[rstest]
    fn create_trims_title(store: TodoStore) {
        let todo = store.create(Some("  Buy milk \n")).unwrap();
        assert_eq!(todo.title, "Buy milk");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn create_requires_title(store: TodoStore, #[case] title: Option<&str>) {
        let err = store.create(title).unwrap_err();
        assert_eq!(err, StoreError::Validation("title is required".to_string()));
        assert!(store.list(ListFilter::All).unwrap().is_empty());
    }

    #[rstest]
    fn create_rejects_long_title(store: TodoStore) {
        let title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(matches!(store.create(Some(title.as_str())), Err(StoreError::Validation(_))));
        let title = "x".repeat(MAX_TITLE_LENGTH);
        assert!(store.create(Some(title.as_str())).is_ok());
    }

    #[rstest]
    fn delete_hides_item_and_undo_restores_it(store: TodoStore) {
        let todo = store.create(Some("Buy milk")).unwrap();

        store.delete(todo.id).unwrap();
        assert!(store.list(ListFilter::Active).unwrap().is_empty());
        assert_eq!(store.list(ListFilter::Deleted).unwrap().len(), 1);

        store.undo_delete(todo.id).unwrap();
        let active = store.list(ListFilter::Active).unwrap();
        assert_eq!(active, vec![todo]);
    }

    #[rstest]
    fn delete_twice_is_accepted(store: TodoStore) {
        let todo = store.create(Some("Buy milk")).unwrap();
        store.delete(todo.id).unwrap();
        store.delete(todo.id).unwrap();
        let all = store.list(ListFilter::All).unwrap();
        assert!(all[0].is_deleted);
    }

    #[rstest]
    fn delete_unknown_id(store: TodoStore) {
        assert_eq!(store.delete(42), Err(StoreError::NotFound(42)));
    }

    #[rstest]
    fn undo_delete_rejects_active_item(store: TodoStore) {
        let todo = store.create(Some("Buy milk")).unwrap();
        let err = store.undo_delete(todo.id).unwrap_err();
        assert_eq!(err, StoreError::InvalidState("item is not deleted".to_string()));
        assert_eq!(store.list(ListFilter::Active).unwrap(), vec![todo]);
    }

    #[rstest]
    fn undo_delete_unknown_id(store: TodoStore) {
        assert_eq!(store.undo_delete(3), Err(StoreError::NotFound(3)));
    }

    #[rstest]
    fn update_changes_only_title(store: TodoStore) {
        let todo = store.create(Some("Buy milk")).unwrap();
        let updated = store.update(todo.id, Some("Buy oat milk")).unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.completed, todo.completed);
        assert_eq!(updated.is_deleted, todo.is_deleted);
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[rstest]
    fn update_reaches_deleted_item(store: TodoStore) {
        let todo = store.create(Some("Buy milk")).unwrap();
        store.delete(todo.id).unwrap();
        let updated = store.update(todo.id, Some("Buy bread")).unwrap();
        assert_eq!(updated.title, "Buy bread");
        assert!(updated.is_deleted);
    }

    #[rstest]
    fn update_validates_before_lookup(store: TodoStore) {
        assert!(matches!(store.update(99, None), Err(StoreError::Validation(_))));
        assert_eq!(store.update(99, Some("Buy milk")), Err(StoreError::NotFound(99)));
    }

    #[rstest]
    fn undo_changes_lists_everything(store: TodoStore) {
        let kept = store.create(Some("Buy milk")).unwrap();
        let gone = store.create(Some("Walk dog")).unwrap();
        store.delete(gone.id).unwrap();
        let ids: Vec<i32> = store.undo_changes().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![kept.id, gone.id]);
    }
}
