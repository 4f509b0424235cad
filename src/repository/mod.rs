//! Storage seam for todo items.
//!
//! Each method is one atomic row operation. Mutators return `Ok(None)` when
//! no row has the given id.

pub mod memory;
pub mod schema;
pub mod sqlite;

use crate::models::todo::{ListFilter, TodoItem};
use crate::store::StoreError;

pub trait Repository: Send + Sync {
    /// Rows matching `filter`, ordered by id.
    fn list(&self, filter: ListFilter) -> Result<Vec<TodoItem>, StoreError>;

    /// Stores a new active, uncompleted row with a fresh id.
    fn insert(&self, title: &str) -> Result<TodoItem, StoreError>;

    fn set_title(&self, id: i32, title: &str) -> Result<Option<TodoItem>, StoreError>;

    /// Sets the deleted flag and returns the value it held before.
    fn swap_deleted(&self, id: i32, is_deleted: bool) -> Result<Option<bool>, StoreError>;
}
