use clap::Args;
use driftworks_app::database;

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    #[command(flatten)]
    connection: Connection,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let pool = args.connection.open().await?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    println!("database is up to date");

    Ok(())
}
