use clap::Args;
use driftworks_app::auth::PgAuthService;
use uuid::Uuid;

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    #[command(flatten)]
    connection: Connection,

    /// Token to revoke
    #[arg(long)]
    token_uuid: Uuid,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let service = PgAuthService::new(args.connection.open().await?);

    let outcome = match service.revoke_api_token(args.token_uuid).await {
        Ok(true) => "revoked",
        Ok(false) => "already revoked or unknown",
        Err(error) => return Err(format!("failed to revoke token: {error}")),
    };

    println!("token {}: {outcome}", args.token_uuid);

    Ok(())
}
