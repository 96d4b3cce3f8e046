//! Commerce Config

use clap::Args;
use driftworks::vouchers::DEFAULT_VALIDITY_DAYS;

/// Currency and voucher settings.
#[derive(Debug, Args)]
pub struct CommerceConfig {
    /// ISO currency code every price is charged in
    #[arg(long, env = "CURRENCY", default_value = "EUR")]
    pub currency: String,

    /// Days a voucher stays valid after its experience date
    #[arg(long, env = "VOUCHER_VALIDITY_DAYS", default_value_t = DEFAULT_VALIDITY_DAYS)]
    pub voucher_validity_days: u16,
}
