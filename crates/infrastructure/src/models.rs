use chrono::{DateTime, Utc};
use domain::{Todo, TodoId};

/// `todos` テーブルの 1 行
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRecord {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Todo {
            id: TodoId(record.id),
            text: record.text,
            completed: record.completed,
            created_at: record.created_at,
        }
    }
}

