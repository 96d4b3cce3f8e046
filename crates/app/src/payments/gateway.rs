//! Payment provider client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for connecting to the payment provider.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Provider API base URL, e.g. `"https://api.payments.example"`.
    pub api_url: String,

    /// Secret API key.
    pub secret_key: String,
}

/// Request to reserve a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentRequest {
    /// Amount in minor units.
    pub amount: u64,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Free-form metadata echoed back by the provider.
    pub metadata: FxHashMap<String, String>,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Secret handed to the client-side payment widget.
    pub client_secret: String,

    /// Provider reference, later used as the order idempotency token.
    pub payment_reference: String,
}

/// Errors that can occur when communicating with the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-2xx response or unexpected body.
    #[error("unexpected response from payment provider: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount.
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// HTTP client for the payment provider's intent API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    config: PaymentsConfig,
    http: Client,
}

impl HttpPaymentGateway {
    #[must_use]
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[tracing::instrument(
        name = "payments.gateway.create_payment_intent",
        skip(self, request),
        fields(amount = request.amount, currency = %request.currency),
        err
    )]
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!(
            "{}/v1/payment_intents",
            self.config.api_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PaymentError::UnexpectedResponse(format!(
                "payment intent request failed with status {status}: {text}"
            )));
        }

        let parsed: PaymentIntentResponse = response.json().await?;

        if parsed.client_secret.is_empty() || parsed.id.is_empty() {
            return Err(PaymentError::UnexpectedResponse(
                "payment intent response is missing its id or client secret".to_string(),
            ));
        }

        Ok(PaymentIntent {
            client_secret: parsed.client_secret,
            payment_reference: parsed.id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_request_serializes_metadata() -> testresult::TestResult {
        let request = PaymentIntentRequest {
            amount: 425_00,
            currency: "eur".to_string(),
            metadata: FxHashMap::from_iter([("user".to_string(), "u-1".to_string())]),
        };

        let json = serde_json::to_value(&request)?;

        assert_eq!(json["amount"], 42_500);
        assert_eq!(json["metadata"]["user"], "u-1");

        Ok(())
    }
}
