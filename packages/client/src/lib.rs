#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the dispatch API.
//!
//! [`DispatchClient`] issues one `POST` per call to the endpoint matching
//! the requested [`DataType`] and validates the body into a
//! [`DispatchResponse`]. Callers decide how calls map to agencies; the
//! pipeline depends only on the [`DispatchSource`] trait so that it can be
//! driven by a fake in tests.
//!
//! Failed calls are never retried here.

pub mod validate;

use std::time::Duration;

use async_trait::async_trait;
use dispatch_map_config::DispatchConfig;
use dispatch_map_dispatch_models::{DataType, DispatchResponse, JurisdictionRequest};
use reqwest::header::CONTENT_TYPE;

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Maximum length of the response body preview included in errors and logs.
pub const BODY_PREVIEW_LEN: usize = 500;

/// Errors from a single dispatch API call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, timeout,
    /// DNS failure, body read failure).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("HTTP {status} {reason}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, or `"Unknown"`.
        reason: String,
        /// Leading part of the response body.
        body: String,
    },

    /// The body did not match the expected response shape.
    #[error("Schema validation failed: {message}")]
    Schema {
        /// Description of the first mismatch.
        message: String,
    },
}

/// Something that can answer dispatch queries.
#[async_trait]
pub trait DispatchSource: Send + Sync {
    /// Fetches active records of `data_type` for the given jurisdiction codes.
    ///
    /// A response with `Success: false` is still `Ok`; interpreting it is up
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, a non-2xx status, or a
    /// body that fails validation.
    async fn fetch(
        &self,
        data_type: DataType,
        jurisdiction_codes: &[String],
    ) -> Result<DispatchResponse, FetchError>;
}

/// HTTP client for the dispatch API.
#[derive(Debug, Clone)]
pub struct DispatchClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    debug: bool,
}

impl DispatchClient {
    /// Creates a client for `base_url` (a trailing `/` is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_token: impl Into<String>,
        timeout: Option<Duration>,
        debug: bool,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            debug,
        })
    }

    /// Creates a client from validated run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &DispatchConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.api_url,
            config.api_token.clone(),
            config.timeout,
            config.debug,
        )
    }

    /// Full URL of the endpoint for `data_type`.
    #[must_use]
    pub fn endpoint_url(&self, data_type: DataType) -> String {
        format!("{}{}", self.base_url, data_type.endpoint())
    }
}

#[async_trait]
impl DispatchSource for DispatchClient {
    async fn fetch(
        &self,
        data_type: DataType,
        jurisdiction_codes: &[String],
    ) -> Result<DispatchResponse, FetchError> {
        let url = self.endpoint_url(data_type);
        let request = JurisdictionRequest {
            jurisdiction_codes: jurisdiction_codes.to_vec(),
        };

        log::debug!(
            "POST {url} for jurisdiction(s): {}",
            jurisdiction_codes.join(", ")
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview = body_preview(&body);
            log::error!("Error fetching {data_type} from {url}: HTTP {status}: {preview}");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body: preview,
            });
        }

        let body = response.text().await?;
        if self.debug {
            log::info!(
                "{data_type} response for {}: {}",
                jurisdiction_codes.join(", "),
                body_preview(&body)
            );
        }

        validate::validate(data_type, &body, self.debug)
    }
}

/// Truncates `body` to at most [`BODY_PREVIEW_LEN`] bytes on a character
/// boundary, appending `...` when anything was cut.
#[must_use]
pub fn body_preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW_LEN {
        return body.to_string();
    }
    let end = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= BODY_PREVIEW_LEN)
        .last()
        .unwrap_or(0);
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let client = DispatchClient::new("https://x.test/Production/", "t", None, false).unwrap();
        assert_eq!(
            client.endpoint_url(DataType::Incidents),
            "https://x.test/Production/v1/GetActiveIncidentsByJurisdiction"
        );
        assert_eq!(
            client.endpoint_url(DataType::Units),
            "https://x.test/Production/v1/GetActiveUnitsByJurisdiction"
        );
    }

    #[test]
    fn short_body_preview_is_unchanged() {
        assert_eq!(body_preview("oops"), "oops");
    }

    #[test]
    fn long_body_preview_is_truncated_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_LEN);
        let preview = body_preview(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LEN + 3);
    }
}
