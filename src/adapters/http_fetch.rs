//! Timed JSON requests shared by both provider adapters.

use crate::domain::error::{BondExportError, FetchError};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Total time allowed for one request, connect to last byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT_VALUE: &str = concat!("bondexport/", env!("CARGO_PKG_VERSION"));

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// One pooled client with fixed headers and timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, BondExportError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, BondExportError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BondExportError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// GET `url` with `query` and parse the body as JSON.
    pub async fn try_get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let response = self.client.get(url).query(query).send().await?;
        Self::read_json(response).await
    }

    /// Like [`HttpFetcher::try_get_json`], but every failure is `None`.
    /// The cause goes to the debug log.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Option<Value> {
        match self.try_get_json(url, query).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(url, kind = e.kind(), error = %e, "request yielded no data");
                None
            }
        }
    }

    /// POST a JSON body with a bearer token and parse the JSON reply.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        token: &str,
        body: &B,
    ) -> Result<Value, FetchError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, FetchError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
