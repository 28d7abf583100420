//! HTTP handlers for the WhatsApp webhook and bot tasks

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::{EmbeddingClient, WhatsAppClient};
use crate::services::bot::{BotService, WhatsAppWebhookPayload};
use crate::services::MessageService;
use crate::AppState;
use shared::models::{BotTask, BotTaskStatus};

/// Response for webhook processing
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
}

/// Handle inbound WhatsApp gateway events
/// POST /api/whatsapp/webhook
///
/// Verifies the gateway signature over the raw body before touching it, then
/// parses the form payload and hands it to the bot service.
pub async fn handle_whatsapp_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, (StatusCode, Json<WebhookResponse>)> {
    if let Err(e) = verify_gateway_signature(&state.config.whatsapp.auth_token, &headers, &body) {
        tracing::warn!("WhatsApp webhook signature verification failed: {}", e);
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(WebhookResponse {
                success: false,
                message: "Invalid signature".to_string(),
            }),
        ));
    }

    let payload: WhatsAppWebhookPayload = match serde_urlencoded::from_bytes(&body) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to parse WhatsApp webhook: {}", e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(WebhookResponse {
                    success: false,
                    message: format!("Invalid request body: {}", e),
                }),
            ));
        }
    };

    let service = bot_service(&state);

    if let Err(e) = service.process_webhook(payload).await {
        tracing::error!("Failed to process WhatsApp webhook: {}", e);
        // Still return 200 to the gateway to prevent retries
        return Ok(Json(WebhookResponse {
            success: false,
            message: format!("Processing error: {}", e),
        }));
    }

    Ok(Json(WebhookResponse {
        success: true,
        message: "Webhook processed successfully".to_string(),
    }))
}

/// Query parameters for listing bot tasks
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub assignee: Option<String>,
    pub status: Option<BotTaskStatus>,
}

/// List bot tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> AppResult<Json<Vec<BotTask>>> {
    let service = bot_service(&state);
    let tasks = service.get_tasks(query.assignee, query.status).await?;
    Ok(Json(tasks))
}

/// Mark a task as completed
pub async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<BotTask>> {
    let service = bot_service(&state);
    let task = service.complete_task(task_id).await?;
    Ok(Json(task))
}

/// Cancel a task
pub async fn cancel_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<BotTask>> {
    let service = bot_service(&state);
    let task = service.cancel_task(task_id).await?;
    Ok(Json(task))
}

fn bot_service(state: &AppState) -> BotService {
    let whatsapp_client = WhatsAppClient::new(&state.config.whatsapp);
    let embedding_client = EmbeddingClient::new(&state.config.embedding);
    let messages = MessageService::new(state.db.clone(), embedding_client);
    BotService::new(state.db.clone(), whatsapp_client, messages)
}

/// Verify the gateway webhook signature
fn verify_gateway_signature(
    auth_token: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), String> {
    let signature = headers
        .get("x-gateway-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or("Missing x-gateway-signature header")?;

    type HmacSha256 = Hmac<Sha256>;
    let mut mac =
        HmacSha256::new_from_slice(auth_token.as_bytes()).map_err(|_| "Failed to create HMAC")?;
    mac.update(body);
    let expected = BASE64.encode(mac.finalize().into_bytes());

    if signature != expected {
        return Err("Signature mismatch".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn signed_headers(token: &str, body: &[u8]) -> HeaderMap {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(token.as_bytes()).unwrap();
        mac.update(body);
        let signature = BASE64.encode(mac.finalize().into_bytes());

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-gateway-signature",
            HeaderValue::from_str(&signature).unwrap(),
        );
        headers
    }

    #[test]
    fn test_verify_gateway_signature_accepts_valid() {
        let body = b"From=whatsapp%3A%2B31612345678&Body=hello";
        let headers = signed_headers("secret-token", body);
        assert!(verify_gateway_signature("secret-token", &headers, body).is_ok());
    }

    #[test]
    fn test_verify_gateway_signature_rejects_wrong_key() {
        let body = b"From=whatsapp%3A%2B31612345678&Body=hello";
        let headers = signed_headers("other-token", body);
        assert!(verify_gateway_signature("secret-token", &headers, body).is_err());
    }

    #[test]
    fn test_verify_gateway_signature_rejects_tampered_body() {
        let body = b"From=whatsapp%3A%2B31612345678&Body=hello";
        let headers = signed_headers("secret-token", body);
        let tampered = b"From=whatsapp%3A%2B31612345678&Body=bye";
        assert!(verify_gateway_signature("secret-token", &headers, tampered).is_err());
    }

    #[test]
    fn test_verify_gateway_signature_requires_header() {
        let headers = HeaderMap::new();
        assert!(verify_gateway_signature("secret-token", &headers, b"x").is_err());
    }
}
