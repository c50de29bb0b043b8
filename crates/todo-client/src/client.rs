use crate::error::ClientError;
use crate::transport::RpcTransport;
use domain::{
    CreateTodoInput, DeleteOutcome, DeleteTodoInput, GetTodoInput, ListTodosInput, Todo, TodoId,
    UpdateTodoInput,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 5つのプロシージャを型付きで呼び出すクライアント
#[derive(Debug, Clone)]
pub struct TodoClient<T: RpcTransport> {
    transport: T,
}

impl<T: RpcTransport> TodoClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn create(&self, text: impl Into<String>) -> Result<Todo, ClientError> {
        self.invoke("create", &CreateTodoInput::new(text)).await
    }

    pub async fn get(&self, id: TodoId) -> Result<Option<Todo>, ClientError> {
        self.invoke("get", &GetTodoInput { id }).await
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        self.invoke("list", &ListTodosInput {}).await
    }

    pub async fn update(&self, input: UpdateTodoInput) -> Result<Todo, ClientError> {
        self.invoke("update", &input).await
    }

    pub async fn delete(&self, id: TodoId) -> Result<DeleteOutcome, ClientError> {
        self.invoke("delete", &DeleteTodoInput { id }).await
    }

    async fn invoke<I, O>(&self, procedure: &str, input: &I) -> Result<O, ClientError>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input)?;
        let output = self.transport.call(procedure, input).await?;
        Ok(serde_json::from_value(output)?)
    }
}
