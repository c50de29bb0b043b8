use anyhow::Context as _;
use domain::TodoService;
use infrastructure::{Database, SqliteTodoRepository};
use lambda_runtime::{run, service_fn, Context, Error, LambdaEvent};
use rpc_gateway::{handle_request, ApiGatewayProxyRequest, ApiGatewayProxyResponse, RpcGateway};
use shared::{trace_lambda_handler, tracing::init_tracing, Config};
use tracing::info;

type Gateway = RpcGateway<SqliteTodoRepository>;

/// RPC ゲートウェイのメイン関数
async fn function_handler(
    gateway: &Gateway,
    include_details: bool,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (payload, context) = event.into_parts();

    trace_lambda_handler!(
        "todo-rpc",
        payload,
        context,
        |payload: ApiGatewayProxyRequest, context: Context| async move {
            // API Gateway のリクエストIDを優先し、無ければ Lambda のものを使う
            let request_id = payload
                .request_id()
                .map(str::to_string)
                .or_else(|| Some(context.request_id.clone()).filter(|id| !id.is_empty()))
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let response = handle_request(gateway, &payload, &request_id, include_details).await;
            Ok::<_, Error>(response)
        }
    )
}

/// 起動時に一度だけ接続とスキーマ作成を行う
async fn bootstrap(config: &Config) -> anyhow::Result<Gateway> {
    let database = Database::connect(config)
        .await
        .with_context(|| format!("データベースに接続できません: {}", config.database_url))?;

    let repository = SqliteTodoRepository::from_database(&database);
    Ok(RpcGateway::new(TodoService::new(repository)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    if let Err(e) = init_tracing(&config) {
        eprintln!("トレーシング初期化エラー: {e}");
        // トレーシング初期化に失敗してもアプリケーションは継続
    }

    let gateway = bootstrap(&config).await?;
    let include_details = config.include_error_details;

    info!(environment = %config.environment, "todo-rpc 起動");

    run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| {
        let gateway = gateway.clone();
        async move { function_handler(&gateway, include_details, event).await }
    }))
    .await
}
