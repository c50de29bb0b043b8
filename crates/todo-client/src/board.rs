use crate::client::TodoClient;
use crate::error::ClientError;
use crate::transport::RpcTransport;
use domain::{Todo, TodoId, UpdateTodoInput};
use tracing::{error, info};

/// 編集中の Todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TodoId,
    pub text: String,
}

/// 一覧の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// サーバーの結果をキャッシュした Todo 一覧
///
/// キャッシュは表示用の写しに過ぎない。変更のたびにサーバーが返した
/// Todo で該当エントリだけを置き換える。呼び出しが失敗した場合は
/// ログを出してエラーを返し、一覧は変更しない。
pub struct TodoBoard<T: RpcTransport> {
    client: TodoClient<T>,
    todos: Vec<Todo>,
    editing: Option<EditSession>,
}

impl<T: RpcTransport> TodoBoard<T> {
    pub fn new(client: TodoClient<T>) -> Self {
        Self {
            client,
            todos: Vec::new(),
            editing: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn stats(&self) -> BoardStats {
        let total = self.todos.len();
        let completed = self.todos.iter().filter(|t| t.completed).count();
        BoardStats {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// サーバーの一覧でキャッシュを置き換える
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.client.list().await {
            Ok(todos) => {
                info!(count = todos.len(), "Todo一覧を読み込みました");
                self.todos = todos;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Todo一覧の読み込みに失敗しました");
                Err(e)
            }
        }
    }

    /// 空白だけの入力は送信しない
    pub async fn add(&mut self, text: &str) -> Result<Option<Todo>, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        match self.client.create(text).await {
            Ok(todo) => {
                self.todos.push(todo.clone());
                Ok(Some(todo))
            }
            Err(e) => {
                error!(error = %e, "Todoの作成に失敗しました");
                Err(e)
            }
        }
    }

    pub async fn toggle(&mut self, id: TodoId) -> Result<Todo, ClientError> {
        let Some(completed) = self.find(id).map(|t| t.completed) else {
            let e = ClientError::NotCached(id);
            error!(error = %e, todo_id = %id, "Todoの完了切り替えに失敗しました");
            return Err(e);
        };

        let input = UpdateTodoInput::new(id).with_completed(!completed);
        match self.client.update(input).await {
            Ok(todo) => {
                self.replace(todo.clone());
                Ok(todo)
            }
            Err(e) => {
                error!(error = %e, todo_id = %id, "Todoの完了切り替えに失敗しました");
                Err(e)
            }
        }
    }

    /// 編集を開始する。キャッシュに無い id なら何もしない
    pub fn start_edit(&mut self, id: TodoId) -> bool {
        let Some(todo) = self.find(id) else {
            return false;
        };
        self.editing = Some(EditSession {
            id,
            text: todo.text.clone(),
        });
        true
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.text = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// 編集内容を保存する
    ///
    /// 編集中でない、または空白だけのテキストなら何も送らず `Ok(None)`。
    /// 失敗時は編集状態を残す。
    pub async fn save_edit(&mut self) -> Result<Option<Todo>, ClientError> {
        let Some(session) = self.editing.as_ref() else {
            return Ok(None);
        };
        let text = session.text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let id = session.id;
        let input = UpdateTodoInput::new(id).with_text(text);
        match self.client.update(input).await {
            Ok(todo) => {
                self.replace(todo.clone());
                self.editing = None;
                Ok(Some(todo))
            }
            Err(e) => {
                error!(error = %e, todo_id = %id, "Todoの更新に失敗しました");
                Err(e)
            }
        }
    }

    /// サーバー上に既に無かった場合もキャッシュからは取り除く
    pub async fn remove(&mut self, id: TodoId) -> Result<bool, ClientError> {
        match self.client.delete(id).await {
            Ok(outcome) => {
                self.todos.retain(|t| t.id != id);
                if self.editing.as_ref().is_some_and(|s| s.id == id) {
                    self.editing = None;
                }
                Ok(outcome.success)
            }
            Err(e) => {
                error!(error = %e, todo_id = %id, "Todoの削除に失敗しました");
                Err(e)
            }
        }
    }

    fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }
}
