use diesel::{Identifiable, Queryable};
use serde::{Deserialize, Serialize};

/// Longest title the `todos.title` column accepts.
pub const MAX_TITLE_LENGTH: usize = 100;

/// A stored todo record, including its soft-delete flag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Identifiable)]
#[diesel(table_name = crate::repository::schema::todos)]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub completed: bool,
    pub is_deleted: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// Public shape of a todo returned by list, create and update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TodoData {
    pub id: i32,
    pub title: String,
    pub completed: bool,
}

/// Body accepted by create and update, either as JSON or as a form.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TodoPayload {
    #[serde(default)]
    pub title: Option<String>,
}

/// Which items a listing returns.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListFilter {
    #[default]
    Active,
    Deleted,
    All,
}

#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: ListFilter,
}

impl ListFilter {
    pub fn matches(&self, item: &TodoItem) -> bool {
        match self {
            ListFilter::Active => !item.is_deleted,
            ListFilter::Deleted => item.is_deleted,
            ListFilter::All => true,
        }
    }
}

impl From<&TodoItem> for TodoData {
    fn from(value: &TodoItem) -> Self {
        Self {
            id: value.id,
            title: value.title.clone(),
            completed: value.completed,
        }
    }
}

impl From<TodoItem> for TodoData {
    fn from(value: TodoItem) -> Self {
        Self {
            id: value.id,
            title: value.title,
            completed: value.completed,
        }
    }
}
