//! HTTP client implementation for the Strava v3 API.
//!
//! This module provides a reqwest-based implementation of the [`StravaClient`](crate::StravaClient) trait.

use crate::config::Config;
use crate::{Activity, ActivityQuery, AthleteProfile, RateLimit, StravaClient, StravaError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Per-request timeout; there is no retry on expiry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Strava API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestStravaClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestStravaClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API root (e.g., "https://www.strava.com/api/v3")
    /// * `access_token` - OAuth bearer token obtained out of band
    pub fn new(base_url: &str, access_token: SecretString) -> Result<Self, StravaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, StravaError> {
        Self::new(&config.base_url, config.access_token.clone())
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute a request and decode the JSON body.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StravaError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Read body as text first so a shape mismatch reports what came back.
        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(256).collect();
            StravaError::Api {
                status: status.as_u16(),
                body: format!("unexpected response body ({e}): {body_snippet}"),
            }
        })
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> StravaError {
        let status = resp.status().as_u16();
        if status == 429 {
            let header = |name: &str| {
                resp.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let rate_limit = RateLimit {
                limit: header("x-ratelimit-limit"),
                usage: header("x-ratelimit-usage"),
            };
            tracing::warn!("strava rate limit hit: {}", rate_limit);
            return StravaError::RateLimited(rate_limit);
        }

        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        tracing::debug!("strava returned HTTP {}: {}", status, body_snippet);
        StravaError::from_status(status, body_snippet)
    }
}

#[async_trait]
impl StravaClient for ReqwestStravaClient {
    async fn get_athlete(&self) -> Result<AthleteProfile, StravaError> {
        let url = format!("{}/athlete", self.base_url);
        self.execute_json(self.get_request(&url)).await
    }

    async fn list_activities(&self, query: &ActivityQuery) -> Result<Vec<Activity>, StravaError> {
        let url = format!("{}/athlete/activities", self.base_url);
        let pairs = query.to_pairs();
        tracing::debug!("GET {} {:?}", url, pairs);
        self.execute_json(self.get_request(&url).query(&pairs)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_trims_trailing_slash() {
        let client =
            ReqwestStravaClient::new("http://localhost/api/v3/", SecretString::new("tok".into()))
                .expect("client");
        assert_eq!(client.base_url, "http://localhost/api/v3");
    }

    #[test]
    fn debug_output_hides_token() {
        let client =
            ReqwestStravaClient::new("http://localhost", SecretString::new("hunter2".into()))
                .expect("client");
        assert!(!format!("{client:?}").contains("hunter2"));
    }
}
