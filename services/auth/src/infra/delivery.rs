use anyhow::Context as _;
use reqwest::Client;

use ancora_domain::contract::DeliveryChannel;

use crate::domain::repository::CodeDeliveryPort;
use crate::error::AuthServiceError;

/// SMS / email delivery provider over HTTP.
///
/// One endpoint for both channels; the provider routes on `channel`.
#[derive(Clone)]
pub struct HttpCodeDelivery {
    pub http: Client,
    pub base_url: String,
    pub api_key: String,
}

impl CodeDeliveryPort for HttpCodeDelivery {
    async fn send_code(
        &self,
        channel: DeliveryChannel,
        recipient: &str,
        code: &str,
    ) -> Result<(), AuthServiceError> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "channel": channel.as_str(),
                "to": recipient,
                "code": code,
            }))
            .send()
            .await
            .map_err(|e| AuthServiceError::DeliveryFailed(e.to_string()))?;

        if !response.status().is_success() {
            // Provider messages surface verbatim; there is no retry and no
            // cross-channel fallback.
            let body = response
                .text()
                .await
                .context("delivery provider error body")?;
            return Err(AuthServiceError::DeliveryFailed(body));
        }
        Ok(())
    }
}
