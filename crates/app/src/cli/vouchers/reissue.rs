use clap::Args;
use driftworks::vouchers::{DEFAULT_VALIDITY_DAYS, ValidityWindow};
use driftworks_app::{
    database::Db,
    domain::{
        orders::records::OrderUuid,
        vouchers::{PgVouchersService, VouchersService},
    },
};
use uuid::Uuid;

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct ReissueArgs {
    #[command(flatten)]
    connection: Connection,

    /// Order whose dated experience items should have vouchers
    #[arg(long)]
    order: Uuid,

    /// Days a voucher stays valid after its experience date
    #[arg(long, env = "VOUCHER_VALIDITY_DAYS", default_value_t = DEFAULT_VALIDITY_DAYS)]
    validity_days: u16,
}

pub(crate) async fn run(args: ReissueArgs) -> Result<(), String> {
    let pool = args.connection.open().await?;

    let service = PgVouchersService::new(Db::new(pool), ValidityWindow::days(args.validity_days));

    let issued = service
        .issue_missing(OrderUuid::from_uuid(args.order))
        .await
        .map_err(|error| format!("failed to issue vouchers: {error}"))?;

    if issued.is_empty() {
        println!("order {} has no missing vouchers", args.order);
        return Ok(());
    }

    for voucher in issued {
        println!("voucher_uuid: {}", voucher.voucher.uuid);
        println!("order_item_uuid: {}", voucher.voucher.order_item);
        println!(
            "expiry_date: {}",
            voucher
                .voucher
                .expiry_date
                .map_or_else(|| "none".to_string(), |date| date.to_string())
        );
        println!();
    }

    Ok(())
}
