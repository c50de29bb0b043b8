use crate::database::{store_error, Database, TODOS_TABLE};
use crate::models::TodoRecord;
use async_trait::async_trait;
use chrono::Utc;
use domain::{NewTodo, Todo, TodoError, TodoId, TodoPatch, TodoRepository};
use shared::telemetry::trace_store_operation;
use sqlx::SqlitePool;

/// `todos` テーブルに対する SQLite 実装
///
/// どの操作も単一の SQL 文なので、行単位の原子性は SQLite に任せる。
#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn from_database(database: &Database) -> Self {
        Self::new(database.pool().clone())
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn insert(&self, new_todo: NewTodo) -> Result<Todo, TodoError> {
        let pool = &self.pool;
        let text = new_todo.text.as_str();

        let record = trace_store_operation(TODOS_TABLE, "insert", move || async move {
            sqlx::query_as::<_, TodoRecord>(
                "INSERT INTO todos (text, created_at) VALUES (?, ?)
                 RETURNING id, text, completed, created_at",
            )
            .bind(text)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
        })
        .await
        .map_err(store_error)?;

        Ok(record.into())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoError> {
        let pool = &self.pool;

        let record = trace_store_operation(TODOS_TABLE, "select", move || async move {
            sqlx::query_as::<_, TodoRecord>(
                "SELECT id, text, completed, created_at FROM todos WHERE id = ?",
            )
            .bind(id.value())
            .fetch_optional(pool)
            .await
        })
        .await
        .map_err(store_error)?;

        Ok(record.map(Todo::from))
    }

    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        let pool = &self.pool;

        let records = trace_store_operation(TODOS_TABLE, "select_all", move || async move {
            sqlx::query_as::<_, TodoRecord>(
                "SELECT id, text, completed, created_at FROM todos ORDER BY id ASC",
            )
            .fetch_all(pool)
            .await
        })
        .await
        .map_err(store_error)?;

        Ok(records.into_iter().map(Todo::from).collect())
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, TodoError> {
        let pool = &self.pool;
        let TodoPatch { text, completed } = patch;

        // 省略されたフィールドは NULL を渡し、COALESCE で現在値を残す
        let record = trace_store_operation(TODOS_TABLE, "update", move || async move {
            sqlx::query_as::<_, TodoRecord>(
                "UPDATE todos
                 SET text = COALESCE(?, text), completed = COALESCE(?, completed)
                 WHERE id = ?
                 RETURNING id, text, completed, created_at",
            )
            .bind(text)
            .bind(completed)
            .bind(id.value())
            .fetch_optional(pool)
            .await
        })
        .await
        .map_err(store_error)?;

        Ok(record.map(Todo::from))
    }

    async fn delete(&self, id: TodoId) -> Result<bool, TodoError> {
        let pool = &self.pool;

        let result = trace_store_operation(TODOS_TABLE, "delete", move || async move {
            sqlx::query("DELETE FROM todos WHERE id = ?")
                .bind(id.value())
                .execute(pool)
                .await
        })
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, TodoError> {
        let pool = &self.pool;

        trace_store_operation(TODOS_TABLE, "count", move || async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos")
                .fetch_one(pool)
                .await
        })
        .await
        .map_err(store_error)
    }
}
