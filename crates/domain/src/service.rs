use crate::errors::TodoError;
use crate::input::{CreateTodoInput, DeleteTodoInput, GetTodoInput, UpdateTodoInput};
use crate::repository::TodoRepository;
use crate::todo::{DeleteOutcome, Todo};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// ToDo サービス
///
/// 呼び出し間で状態を持たない。入力を検証してからストアの 1 操作に変換するだけで、
/// リトライは行わない。
pub struct TodoService<R: TodoRepository> {
    repo: Arc<R>,
}

impl<R: TodoRepository> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateTodoInput) -> Result<Todo, TodoError> {
        let new_todo = input.validate()?;
        let todo = self.repo.insert(new_todo).await?;

        info!(todo_id = %todo.id, "ToDo作成完了");
        Ok(todo)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, input: GetTodoInput) -> Result<Option<Todo>, TodoError> {
        let todo = self.repo.find_by_id(input.id).await?;
        if todo.is_none() {
            debug!(todo_id = %input.id, "ToDoが存在しません");
        }
        Ok(todo)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = self.repo.find_all().await?;
        debug!(count = todos.len(), "ToDo一覧取得");
        Ok(todos)
    }

    #[instrument(skip(self, input), fields(todo_id = %input.id))]
    pub async fn update(&self, input: UpdateTodoInput) -> Result<Todo, TodoError> {
        let patch = input.validate()?;
        if patch.is_empty() {
            debug!("変更フィールドなし、現在の値を返す");
        }

        match self.repo.update(input.id, patch).await? {
            Some(todo) => {
                info!("ToDo更新完了");
                Ok(todo)
            }
            None => Err(TodoError::NotFound(input.id)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, input: DeleteTodoInput) -> Result<DeleteOutcome, TodoError> {
        let success = self.repo.delete(input.id).await?;
        if success {
            info!(todo_id = %input.id, "ToDo削除完了");
        } else {
            debug!(todo_id = %input.id, "削除対象のToDoが存在しません");
        }
        Ok(DeleteOutcome { success })
    }
}
