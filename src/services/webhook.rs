use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::DispatchError;
use crate::message::OutboundPayload;
use crate::services::normalizer::extract_reply;

/// One POST per message to the configured automation endpoint.
#[derive(Clone, Debug)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post `payload` and return the webhook's body as JSON.
    ///
    /// Any non-2xx status is a failure whatever the body says. A body that
    /// is not JSON is reported as [`DispatchError::UnparsableBody`].
    pub async fn post(&self, payload: &OutboundPayload) -> Result<Value, DispatchError> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, bytes = body.len(), "webhook body did not parse");
            DispatchError::UnparsableBody
        })
    }

    /// Post `payload` and normalize the reply to display text.
    pub async fn fetch_reply(&self, payload: &OutboundPayload) -> Result<String, DispatchError> {
        let body = self.post(payload).await?;
        extract_reply(&body)
            .filter(|reply| !reply.trim().is_empty())
            .ok_or_else(|| {
                debug!(body = %body, "webhook reply shape not recognized");
                DispatchError::UnrecognizedShape
            })
    }
}
