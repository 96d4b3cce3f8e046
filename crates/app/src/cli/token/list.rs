use clap::Args;
use driftworks_app::auth::{PgAuthService, UserUuid};
use uuid::Uuid;

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    #[command(flatten)]
    connection: Connection,

    /// Owner whose tokens are listed, newest first
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let tokens = PgAuthService::new(args.connection.open().await?)
        .list_api_tokens(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    let mut tokens = tokens.iter().peekable();

    if tokens.peek().is_none() {
        println!("user {} holds no tokens", args.user_uuid);
    }

    while let Some(token) = tokens.next() {
        super::print_metadata(token);

        if tokens.peek().is_some() {
            println!("---");
        }
    }

    Ok(())
}
