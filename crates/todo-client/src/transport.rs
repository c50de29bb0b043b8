use crate::error::ClientError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shared::ErrorResponse;
use tracing::debug;

/// プロシージャ名と入力JSONを受け取り、出力JSONを返す呼び出し口
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value, ClientError>;
}

/// `POST {base_url}/rpc/{procedure}` でゲートウェイを呼ぶトランスポート
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SuccessEnvelope {
    data: Value,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn endpoint(&self, procedure: &str) -> String {
        format!("{}/rpc/{}", self.base_url, procedure)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value, ClientError> {
        let url = self.endpoint(procedure);
        debug!(url = %url, "RPC送信");

        let response = self.client.post(&url).json(&input).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_response(status, &body)
    }
}

/// ゲートウェイのレスポンスを成功データか構造化エラーに振り分ける
pub fn parse_response(status: u16, body: &str) -> Result<Value, ClientError> {
    if (200..300).contains(&status) {
        let envelope: SuccessEnvelope = serde_json::from_str(body)?;
        return Ok(envelope.data);
    }

    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
            status,
        }),
        Err(_) => Err(ClientError::Transport(format!(
            "予期しないレスポンス (status {status}): {body}"
        ))),
    }
}
