use crate::gateway::RpcGateway;
use crate::procedure::Procedure;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use domain::TodoRepository;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{AppError, ErrorResponse};
use std::collections::HashMap;
use tracing::info;

const RPC_PATH_PREFIX: &str = "/rpc/";

/// API Gateway プロキシリクエスト構造体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

/// リクエストコンテキスト構造体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub request_id: Option<String>,
}

/// API Gateway プロキシレスポンス構造体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiGatewayProxyRequest {
    /// API Gateway が付けたリクエストID
    pub fn request_id(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.request_id.as_deref())
    }
}

/// リクエストを処理して必ずレスポンスを返す（エラーも構造化レスポンスになる）
pub async fn handle_request<R: TodoRepository>(
    gateway: &RpcGateway<R>,
    request: &ApiGatewayProxyRequest,
    request_id: &str,
    include_details: bool,
) -> ApiGatewayProxyResponse {
    info!(
        method = %request.http_method,
        path = %request.path,
        "RPCリクエスト受信"
    );

    if request.http_method.eq_ignore_ascii_case("OPTIONS") {
        return create_response(204, String::new());
    }

    let procedure = resolve_procedure(request).ok();

    match route(gateway, request).await {
        Ok(data) => {
            info!(status = 200, "RPCリクエスト完了");
            create_success_response(json!({ "data": data }))
        }
        Err(error) => {
            error.log(procedure.as_ref().map(Procedure::name));
            create_error_response(&error, request_id, include_details)
        }
    }
}

async fn route<R: TodoRepository>(
    gateway: &RpcGateway<R>,
    request: &ApiGatewayProxyRequest,
) -> Result<Value, AppError> {
    let procedure = resolve_procedure(request)?;

    let input = match request.http_method.to_ascii_uppercase().as_str() {
        "POST" => parse_body(decode_body(request)?.as_deref())?,
        "GET" if procedure.is_query() => parse_query_input(request)?,
        "GET" => {
            return Err(AppError::MethodNotAllowed(format!(
                "'{procedure}' は POST でのみ呼び出せます"
            )))
        }
        other => {
            return Err(AppError::MethodNotAllowed(format!(
                "サポートされていないメソッドです: {other}"
            )))
        }
    };

    gateway.call(procedure, input).await
}

/// `{procedure}` パスパラメータ、無ければ `/rpc/{procedure}` からプロシージャを取り出す
fn resolve_procedure(request: &ApiGatewayProxyRequest) -> Result<Procedure, AppError> {
    if let Some(name) = request
        .path_parameters
        .as_ref()
        .and_then(|params| params.get("procedure"))
    {
        return name.parse();
    }

    let name = request
        .path
        .strip_prefix(RPC_PATH_PREFIX)
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .ok_or_else(|| AppError::UnknownProcedure(request.path.clone()))?;

    name.parse()
}

/// バイナリメディアタイプ設定時は本文が Base64 で届く
fn decode_body(request: &ApiGatewayProxyRequest) -> Result<Option<String>, AppError> {
    match &request.body {
        Some(body) if request.is_base64_encoded => {
            let bytes = STANDARD
                .decode(body.trim())
                .map_err(|e| AppError::Validation(format!("Base64 本文のデコードエラー: {e}")))?;
            String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| AppError::Validation(format!("本文が UTF-8 ではありません: {e}")))
        }
        body => Ok(body.clone()),
    }
}

fn parse_body(body: Option<&str>) -> Result<Value, AppError> {
    match body.map(str::trim) {
        None | Some("") => Ok(json!({})),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("リクエストボディのパースエラー: {e}"))),
    }
}

fn parse_query_input(request: &ApiGatewayProxyRequest) -> Result<Value, AppError> {
    match request
        .query_string_parameters
        .as_ref()
        .and_then(|params| params.get("input"))
    {
        None => Ok(json!({})),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("input パラメータのパースエラー: {e}"))),
    }
}

fn create_success_response(body: Value) -> ApiGatewayProxyResponse {
    create_response(200, body.to_string())
}

fn create_error_response(
    error: &AppError,
    request_id: &str,
    include_details: bool,
) -> ApiGatewayProxyResponse {
    let error_response =
        ErrorResponse::from_app_error(error, request_id.to_string(), include_details);
    let body = error_response.to_json().unwrap_or_else(|_| {
        r#"{"code":"SERIALIZATION_ERROR","message":"エラーレスポンスの生成に失敗しました"}"#
            .to_string()
    });

    let mut response = create_response(error.http_status_code(), body);
    response
        .headers
        .insert("X-Request-ID".to_string(), request_id.to_string());
    response
}

fn create_response(status_code: u16, body: String) -> ApiGatewayProxyResponse {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        "GET,POST,OPTIONS".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        "Content-Type,Authorization".to_string(),
    );

    ApiGatewayProxyResponse {
        status_code,
        headers,
        body,
    }
}
