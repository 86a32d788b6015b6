//! HTTP handler functions for the webhook server.

use actix_web::{HttpResponse, web};
use dispatch_map_server_models::{ApiHealth, WebhookAck};

use crate::AppState;

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /{webhook_id}`
///
/// Acknowledges any delivery. The body is logged when debug is enabled and
/// otherwise discarded.
pub async fn webhook(
    state: web::Data<AppState>,
    webhook_id: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let webhook_id = webhook_id.into_inner();

    if state.debug {
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(payload) => log::info!("Webhook {webhook_id} received payload: {payload}"),
            Err(e) => log::warn!(
                "Webhook {webhook_id} received non-JSON payload ({} bytes): {e}",
                body.len()
            ),
        }
    } else {
        log::debug!("Webhook {webhook_id} received {} bytes", body.len());
    }

    HttpResponse::Ok().json(WebhookAck::received())
}
