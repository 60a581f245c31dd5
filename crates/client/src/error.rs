use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Response contained no data")]
    MissingData,

    #[error("Validation error: {0}")]
    Domain(#[from] domain::DomainError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}
