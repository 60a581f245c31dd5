use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;
use crate::graphql::{GraphQlRequest, GraphQlResponse};

/// GraphQLエンドポイントへリクエストを送る層
/// テストではインメモリのフェイクに差し替える
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, ClientError>;
}

/// 単一のエンドポイントURLを持つ長寿命のHTTPトランスポート
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, ClientError> {
        tracing::debug!(operation = request.operation_name, "Sending GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let body: GraphQlResponse = response.json().await?;
        body.into_data()
    }
}
