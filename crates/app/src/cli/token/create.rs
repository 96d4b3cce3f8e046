use clap::Args;
use driftworks_app::auth::{PgAuthService, UserUuid};
use uuid::Uuid;

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    connection: Connection,

    /// Owner of the new token
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let issued = PgAuthService::new(args.connection.open().await?)
        .issue_api_token(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    super::print_metadata(&issued.metadata);
    println!("api_token: {}", issued.token);
    println!("the token is not stored in plain text and cannot be shown again");

    Ok(())
}
