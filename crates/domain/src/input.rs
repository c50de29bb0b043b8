use crate::errors::DomainError;
use crate::todo::{NewTodo, TodoId, TodoPatch};
use serde::{Deserialize, Deserializer, Serialize};

/// `create` の入力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoInput {
    pub text: String,
}

impl CreateTodoInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn validate(&self) -> Result<NewTodo, DomainError> {
        Ok(NewTodo {
            text: validate_text(&self.text)?,
        })
    }
}

/// `get` の入力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTodoInput {
    pub id: TodoId,
}

/// `list` の入力（フィールドなし）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTodosInput {}

/// `update` の入力
///
/// 省略されたフィールドは変更しない。`null` は省略とは区別され、
/// 型エラーとして拒否される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoInput {
    pub id: TodoId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub completed: Option<bool>,
}

impl UpdateTodoInput {
    pub fn new(id: TodoId) -> Self {
        Self {
            id,
            text: None,
            completed: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn validate(&self) -> Result<TodoPatch, DomainError> {
        let text = match &self.text {
            Some(text) => Some(validate_text(text)?),
            None => None,
        };

        Ok(TodoPatch {
            text,
            completed: self.completed,
        })
    }
}

/// `delete` の入力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoInput {
    pub id: TodoId,
}

/// テキストは前後の空白を除いて 1 文字以上必要
pub fn validate_text(text: &str) -> Result<String, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyText);
    }
    Ok(trimmed.to_string())
}

// キーが存在する場合だけ呼ばれるので、値そのものを T として読む（null は T の型エラーになる）
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
