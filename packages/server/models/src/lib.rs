#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP response types for the dispatch map webhook server.

use serde::{Deserialize, Serialize};

/// Message returned for every accepted webhook delivery.
pub const WEBHOOK_RECEIVED: &str = "Received";

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Acknowledgement body for a webhook delivery. `status` mirrors the HTTP
/// status of the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub status: u16,
    pub message: String,
}

impl WebhookAck {
    /// The acknowledgement sent for every delivery: `200 Received`.
    #[must_use]
    pub fn received() -> Self {
        Self {
            status: 200,
            message: WEBHOOK_RECEIVED.to_string(),
        }
    }
}
