use crate::errors::TodoError;
use crate::todo::{NewTodo, Todo, TodoId, TodoPatch};
use async_trait::async_trait;

/// ToDo テーブルへのアクセスポート
///
/// 各メソッドは 1 文として原子的に実行されること。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 行を挿入し、採番された id と作成日時を含む永続化後の値を返す
    async fn insert(&self, new_todo: NewTodo) -> Result<Todo, TodoError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoError>;

    /// 挿入順（id 昇順）で全件を返す
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// パッチで指定されたフィールドだけを更新する。該当行が無ければ `Ok(None)`
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, TodoError>;

    /// 行を削除したら `true`
    async fn delete(&self, id: TodoId) -> Result<bool, TodoError>;

    async fn count(&self) -> Result<i64, TodoError>;
}
