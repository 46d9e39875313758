use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    error::ErrorBody,
    protocol::{CatalogResponse, MessageResponse},
};
use tracing::debug;
use url::Url;

use crate::error::{RegistryConfigError, RegistryError};

// Characters left as-is by JavaScript's encodeURIComponent.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The remote service that owns activity and roster data.
#[async_trait]
pub trait ActivityRegistry: Send + Sync {
    async fn list_activities(&self) -> Result<CatalogResponse, RegistryError>;
    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse, RegistryError>;
    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MessageResponse, RegistryError>;
}

/// Registry reached over its JSON HTTP API.
pub struct HttpRegistry {
    http: Client,
    base_url: Url,
}

impl HttpRegistry {
    pub fn new(base_url: Url) -> Result<Self, RegistryConfigError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(
        base_url: Url,
        timeout: Option<Duration>,
    ) -> Result<Self, RegistryConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(RegistryConfigError::NotABase(base_url.to_string()));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_timeout` rejects cannot-be-a-base urls, so this never fails.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Participant endpoints take the identifier as `?email=`, with spaces
    /// sent as `%20` rather than `+`.
    fn participant_endpoint(&self, segments: &[&str], email: &str) -> Url {
        let mut url = self.endpoint(segments);
        url.set_query(Some(&format!(
            "email={}",
            utf8_percent_encode(email, QUERY_VALUE)
        )));
        url
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RegistryError> {
        let response = request.send().await.map_err(RegistryError::network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(RegistryError::network)?;

        if !status.is_success() {
            return Err(RegistryError::Server {
                status: status.as_u16(),
                detail: ErrorBody::detail_from_bytes(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|err| RegistryError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ActivityRegistry for HttpRegistry {
    async fn list_activities(&self) -> Result<CatalogResponse, RegistryError> {
        let url = self.endpoint(&["activities"]);
        debug!("registry: GET {url}");
        self.execute(self.http.get(url)).await
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse, RegistryError> {
        let url = self.participant_endpoint(&["activities", activity, "signup"], email);
        debug!("registry: POST {url}");
        self.execute(self.http.post(url)).await
    }

    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MessageResponse, RegistryError> {
        let url = self.participant_endpoint(&["activities", activity, "participants"], email);
        debug!("registry: DELETE {url}");
        self.execute(self.http.delete(url)).await
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
