use shared::domain::ActionError;
use thiserror::Error;
use tokio::task::JoinError;

/// Failures talking to the registry, as seen by controllers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Request could not be sent or no response arrived.
    #[error("registry unreachable: {0}")]
    Network(String),
    /// Response arrived with a non-success status.
    #[error("registry rejected request with status {status}")]
    Server { status: u16, detail: Option<String> },
    /// Response body was not the JSON we expected.
    #[error("malformed registry response: {0}")]
    Decode(String),
}

impl RegistryError {
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Server-provided detail, only present on rejected requests.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryConfigError {
    #[error("registry url cannot be used as a base: {0}")]
    NotABase(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Dispatch(#[from] ActionError),
    #[error("refresh task did not complete: {0}")]
    RefreshTask(#[from] JoinError),
}
