use crate::todo::TodoId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Todo text cannot be empty")]
    EmptyText,

    /// 入力がスキーマに合わない（必須フィールド欠落・型違い・オブジェクト以外）
    #[error("Invalid input for '{procedure}': {reason}")]
    InvalidInput { procedure: String, reason: String },
}

impl DomainError {
    pub fn invalid_input(procedure: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidInput {
            procedure: procedure.into(),
            reason: reason.into(),
        }
    }
}

/// サービス層のエラー分類
///
/// 削除対象が無いことはエラーではなく `DeleteOutcome { success: false }` で表す。
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    #[error("Todo with id {0} not found")]
    NotFound(TodoId),

    #[error("Store error: {0}")]
    Store(String),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }
}
