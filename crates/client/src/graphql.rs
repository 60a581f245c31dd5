use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// GraphQL over HTTP のリクエストボディ
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    pub variables: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// レスポンスボディ。HTTP 200でもerrorsが入ることがある
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// errors配列が空でなければGraphQLレベルのエラーとして扱う
    /// dataもerrorsも無いレスポンスは不正
    pub fn into_data(self) -> Result<Value, ClientError> {
        if !self.errors.is_empty() {
            let joined = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ClientError::GraphQl(joined));
        }

        match self.data {
            Some(Value::Null) | None => Err(ClientError::MissingData),
            Some(data) => Ok(data),
        }
    }
}
