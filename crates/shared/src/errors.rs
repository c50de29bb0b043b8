use domain::{DomainError, TodoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ゲートウェイ全体で使用される包括的なエラー型
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // 入力エラー
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // ルーティングエラー
    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    // インフラストラクチャエラー
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // システムエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// エラーの分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
    /// 一時的なエラー（呼び出し側で再試行してよい）
    Transient,
}

/// エラーの重要度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// エラーメタデータ
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    /// 呼び出し側が同じリクエストを再送してよいか（サーバー側ではリトライしない）
    pub retryable: bool,
}

impl AppError {
    /// エラーメタデータを取得
    pub fn metadata(&self) -> ErrorMetadata {
        match self {
            AppError::Validation(_) => ErrorMetadata {
                code: "VALIDATION_ERROR",
                category: ErrorCategory::Client,
                severity: ErrorSeverity::Info,
                retryable: false,
            },
            AppError::NotFound(_) => ErrorMetadata {
                code: "NOT_FOUND",
                category: ErrorCategory::Client,
                severity: ErrorSeverity::Info,
                retryable: false,
            },
            AppError::UnknownProcedure(_) => ErrorMetadata {
                code: "UNKNOWN_PROCEDURE",
                category: ErrorCategory::Client,
                severity: ErrorSeverity::Warning,
                retryable: false,
            },
            AppError::MethodNotAllowed(_) => ErrorMetadata {
                code: "METHOD_NOT_ALLOWED",
                category: ErrorCategory::Client,
                severity: ErrorSeverity::Warning,
                retryable: false,
            },
            AppError::Store(msg) => {
                let retryable = is_store_retryable(msg);
                ErrorMetadata {
                    code: "STORE_ERROR",
                    category: if retryable {
                        ErrorCategory::Transient
                    } else {
                        ErrorCategory::Server
                    },
                    severity: ErrorSeverity::Error,
                    retryable,
                }
            }
            AppError::Serialization(_) => ErrorMetadata {
                code: "SERIALIZATION_ERROR",
                category: ErrorCategory::Server,
                severity: ErrorSeverity::Error,
                retryable: false,
            },
            AppError::Configuration(_) => ErrorMetadata {
                code: "CONFIGURATION_ERROR",
                category: ErrorCategory::Server,
                severity: ErrorSeverity::Critical,
                retryable: false,
            },
            AppError::Internal(_) => ErrorMetadata {
                code: "INTERNAL_ERROR",
                category: ErrorCategory::Server,
                severity: ErrorSeverity::Critical,
                retryable: false,
            },
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::NotFound(_) | AppError::UnknownProcedure(_) => 404,
            AppError::MethodNotAllowed(_) => 405,
            AppError::Store(_) if self.metadata().retryable => 503,
            _ => 500,
        }
    }

    /// ユーザー向けメッセージを取得
    ///
    /// 入力エラーは何が不正かをそのまま伝える。サーバー側の詳細は出さない。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::UnknownProcedure(name) => format!("プロシージャ '{name}' は存在しません"),
            AppError::MethodNotAllowed(msg) => msg.clone(),
            AppError::Store(_) if self.metadata().retryable => {
                "ストアが混雑しています。しばらく待ってから再度お試しください".to_string()
            }
            _ => "予期しないエラーが発生しました".to_string(),
        }
    }

    /// 重要度に応じたレベルでエラーを記録
    pub fn log(&self, procedure: Option<&str>) {
        let metadata = self.metadata();
        let procedure = procedure.unwrap_or("-");

        match metadata.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(
                    error = %self,
                    code = metadata.code,
                    category = ?metadata.category,
                    retryable = metadata.retryable,
                    procedure,
                    "Procedure failed"
                );
            }
            ErrorSeverity::Warning => {
                tracing::warn!(
                    error = %self,
                    code = metadata.code,
                    procedure,
                    "Procedure rejected"
                );
            }
            ErrorSeverity::Info => {
                tracing::info!(
                    error = %self,
                    code = metadata.code,
                    procedure,
                    "Procedure rejected"
                );
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<TodoError> for AppError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::Validation(inner) => AppError::Validation(inner.to_string()),
            TodoError::NotFound(_) => AppError::NotFound(e.to_string()),
            TodoError::Store(msg) => AppError::Store(msg),
        }
    }
}

/// SQLite の一時的なロック競合かどうかを判定
fn is_store_retryable(error_message: &str) -> bool {
    let retryable_errors = ["database is locked", "database table is locked", "SQLITE_BUSY"];

    retryable_errors
        .iter()
        .any(|&err| error_message.contains(err))
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラーコード
    pub code: String,
    /// ユーザー向けメッセージ
    pub message: String,
    /// 詳細情報（開発環境のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub request_id: String,
    pub timestamp: String,
}

impl ErrorResponse {
    /// AppErrorからErrorResponseを作成
    pub fn from_app_error(error: &AppError, request_id: String, include_details: bool) -> Self {
        Self {
            code: error.metadata().code.to_string(),
            message: error.user_message(),
            details: if include_details {
                Some(error.to_string())
            } else {
                None
            },
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}
