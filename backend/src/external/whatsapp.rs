//! WhatsApp Gateway Client
//!
//! Outbound messaging through the hosted WhatsApp gateway. Webhook signature
//! verification for the inbound side lives with the webhook handler.

use reqwest::Client;
use serde::Deserialize;

use crate::config::WhatsAppConfig;
use crate::error::{AppError, AppResult};

/// Client for the WhatsApp messaging gateway
#[derive(Clone)]
pub struct WhatsAppClient {
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_endpoint: String,
    http_client: Client,
}

/// Gateway acknowledgement for a sent message
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub sid: String,
    pub status: String,
}

impl WhatsAppClient {
    /// Create a new gateway client
    pub fn new(config: &WhatsAppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            api_endpoint: config.api_endpoint.clone(),
            http_client,
        }
    }

    /// Send a text message to a WhatsApp number
    pub async fn send_message(&self, to: &str, body: &str) -> AppResult<SendMessageResponse> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.api_endpoint, self.account_sid
        );

        let params = [
            ("From", whatsapp_addr(&self.from_number)),
            ("To", whatsapp_addr(to)),
            ("Body", body.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::WhatsAppApiError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::WhatsAppApiError(format!(
                "Gateway returned {}: {}",
                status, body
            )));
        }

        let result: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| AppError::WhatsAppApiError(format!("Failed to parse response: {}", e)))?;

        Ok(result)
    }
}

/// Prefix a number with the gateway's address scheme if not already present
fn whatsapp_addr(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_addr_adds_prefix() {
        assert_eq!(whatsapp_addr("+31612345678"), "whatsapp:+31612345678");
    }

    #[test]
    fn test_whatsapp_addr_keeps_existing_prefix() {
        assert_eq!(
            whatsapp_addr("whatsapp:+31612345678"),
            "whatsapp:+31612345678"
        );
    }
}
