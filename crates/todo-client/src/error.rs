use domain::TodoId;
use thiserror::Error;

/// クライアント側で発生するエラー
#[derive(Error, Debug)]
pub enum ClientError {
    /// サーバーが構造化エラーを返した
    #[error("RPCエラー [{code}] ({status}): {message}")]
    Rpc {
        code: String,
        message: String,
        status: u16,
    },

    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("レスポンスのデコードエラー: {0}")]
    Decode(String),

    /// 手元の一覧に無い id を操作しようとした（サーバーには送っていない）
    #[error("Todo {0} は一覧にありません")]
    NotCached(TodoId),
}

impl ClientError {
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Rpc { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some("NOT_FOUND")
    }

    pub fn is_validation(&self) -> bool {
        self.code() == Some("VALIDATION_ERROR")
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
