use crate::procedure::Procedure;
use domain::{
    CreateTodoInput, DeleteTodoInput, DomainError, GetTodoInput, ListTodosInput, TodoRepository,
    TodoService, UpdateTodoInput,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::AppError;
use tracing::{debug, instrument};

/// リモートプロシージャ呼び出しをサービスに橋渡しするゲートウェイ
///
/// 業務ロジックは持たない。入力をスキーマで検証してからサービスを呼び、
/// 結果とエラーをそのまま構造化して返す。
pub struct RpcGateway<R: TodoRepository> {
    service: TodoService<R>,
}

impl<R: TodoRepository> Clone for RpcGateway<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<R: TodoRepository> RpcGateway<R> {
    pub fn new(service: TodoService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TodoService<R> {
        &self.service
    }

    /// 名前でプロシージャを解決して呼び出す
    pub async fn dispatch(&self, procedure_name: &str, input: Value) -> Result<Value, AppError> {
        let procedure: Procedure = procedure_name.parse()?;
        self.call(procedure, input).await
    }

    #[instrument(skip(self, input), fields(procedure = %procedure))]
    pub async fn call(&self, procedure: Procedure, input: Value) -> Result<Value, AppError> {
        debug!("プロシージャ呼び出し");

        match procedure {
            Procedure::Create => {
                let input: CreateTodoInput = decode_input(procedure, input)?;
                input.validate()?;
                encode_output(&self.service.create(input).await?)
            }
            Procedure::Get => {
                let input: GetTodoInput = decode_input(procedure, input)?;
                encode_output(&self.service.get(input).await?)
            }
            Procedure::List => {
                let _: ListTodosInput = decode_input(procedure, input)?;
                encode_output(&self.service.list().await?)
            }
            Procedure::Update => {
                let input: UpdateTodoInput = decode_input(procedure, input)?;
                input.validate()?;
                encode_output(&self.service.update(input).await?)
            }
            Procedure::Delete => {
                let input: DeleteTodoInput = decode_input(procedure, input)?;
                encode_output(&self.service.delete(input).await?)
            }
        }
    }
}

/// ワイヤー上の入力を型付きの入力に変換する（型違い・必須フィールド欠落はここで弾く）
fn decode_input<T: DeserializeOwned>(procedure: Procedure, input: Value) -> Result<T, AppError> {
    if !input.is_object() {
        return Err(DomainError::invalid_input(procedure.name(), "expected an object").into());
    }

    serde_json::from_value(input)
        .map_err(|e| DomainError::invalid_input(procedure.name(), e.to_string()).into())
}

fn encode_output<T: Serialize>(output: &T) -> Result<Value, AppError> {
    serde_json::to_value(output).map_err(|e| AppError::Serialization(e.to_string()))
}
