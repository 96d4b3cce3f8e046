//! Payment confirmation webhooks.

use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Event type sent when a payment completes.
pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// Shared secret the provider sends with every webhook call.
#[derive(Clone)]
pub struct WebhookSecret {
    digest: [u8; 32],
}

impl WebhookSecret {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Whether `provided` equals the configured secret.
    ///
    /// Both sides are hashed to fixed-length digests before comparing.
    #[must_use]
    pub fn matches(&self, provided: &str) -> bool {
        let provided: [u8; 32] = Sha256::digest(provided.as_bytes()).into();

        provided
            .iter()
            .zip(self.digest.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(**redacted**)")
    }
}

/// Webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    /// Event type, e.g. [`PAYMENT_SUCCEEDED`].
    #[serde(rename = "type")]
    pub kind: String,

    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventData {
    pub object: PaymentEventObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventObject {
    /// Payment reference.
    pub id: String,
}

impl PaymentEvent {
    /// The payment reference when this event confirms a payment.
    #[must_use]
    pub fn confirmed_reference(&self) -> Option<&str> {
        (self.kind == PAYMENT_SUCCEEDED).then_some(self.data.object.id.as_str())
    }
}
