use chrono::prelude::*;
use std::sync::{Mutex, MutexGuard};

use crate::models::todo::{ListFilter, TodoItem};
use crate::repository::Repository;
use crate::store::StoreError;

struct Table {
    todos: Vec<TodoItem>,
    last_id: i32,
}

/// Process-local todo table. Contents are lost on shutdown.
pub struct MemoryRepository {
    table: Mutex<Table>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        MemoryRepository {
            table: Mutex::new(Table {
                todos: vec![],
                last_id: 0,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Storage("todo table lock poisoned".to_string()))
    }
}

impl Repository for MemoryRepository {
    fn list(&self, filter: ListFilter) -> Result<Vec<TodoItem>, StoreError> {
        let table = self.lock()?;
        Ok(table
            .todos
            .iter()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect())
    }

    fn insert(&self, title: &str) -> Result<TodoItem, StoreError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let todo = TodoItem {
            id: table.last_id,
            title: title.to_string(),
            completed: false,
            is_deleted: false,
            created_at: Utc::now().naive_utc(),
        };
        table.todos.push(todo.clone());
        Ok(todo)
    }

    fn set_title(&self, id: i32, title: &str) -> Result<Option<TodoItem>, StoreError> {
        let mut table = self.lock()?;
        let Some(todo) = table.todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };
        todo.title = title.to_string();
        Ok(Some(todo.clone()))
    }

    fn swap_deleted(&self, id: i32, is_deleted: bool) -> Result<Option<bool>, StoreError> {
        let mut table = self.lock()?;
        let previous = table
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .map(|todo| std::mem::replace(&mut todo.is_deleted, is_deleted));
        Ok(previous)
    }
}
