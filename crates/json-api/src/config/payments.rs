//! Payments Config

use clap::Args;

/// Payment provider settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment provider API base URL
    #[arg(
        long,
        env = "PAYMENTS_API_URL",
        default_value = "https://api.stripe.com"
    )]
    pub payments_api_url: String,

    /// Payment provider secret API key
    #[arg(long, env = "PAYMENTS_SECRET_KEY", hide_env_values = true)]
    pub payments_secret_key: String,

    /// Shared secret expected in the `X-Webhook-Secret` header
    #[arg(long, env = "PAYMENTS_WEBHOOK_SECRET", hide_env_values = true)]
    pub payments_webhook_secret: String,
}
