//! Shared HTTP plumbing for the typed sub-clients.

use reqwest::{Method, RequestBuilder};
use url::Url;

use crate::config::ConfigError;
use crate::error::ApiError;
use crate::retry::{with_retry, RetryPolicy};

/// Path segment under which every endpoint lives.
const API_PREFIX: &str = "api";

/// An authenticated `reqwest` client bound to one backend.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, max_retries: u32) -> Self {
        Self {
            http,
            base_url,
            retry: RetryPolicy::new(max_retries),
        }
    }

    /// `{base_url}api/{segments...}`, each segment percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::Config(ConfigError::InvalidUrl(
                    "base_url".to_string(),
                    "URL cannot be a base".to_string(),
                ))
            })?;
            path.pop_if_empty().push(API_PREFIX).extend(segments);
        }
        Ok(url)
    }

    /// Send `method url` and return `(status, body)`.
    ///
    /// `body` decorates each attempt's request, e.g. with a JSON payload.
    /// Transport errors are retried per method; see [`RetryPolicy::for_method`].
    pub(crate) async fn execute<F>(
        &self,
        endpoint: &str,
        method: Method,
        url: &Url,
        body: F,
    ) -> Result<(u16, String), ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let policy = self.retry.for_method(&method);
        let resp = with_retry(policy, endpoint, || {
            body(self.http.request(method.clone(), url.clone())).send()
        })
        .await
        .map_err(|e| ApiError::Network {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| ApiError::Network {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        tracing::debug!(endpoint, status, bytes = body.len(), "response received");
        Ok((status, body))
    }
}
