use clap::Args;
use driftworks_app::database;
use sqlx::PgPool;

/// Database flags shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct Connection {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl Connection {
    pub(crate) async fn open(&self) -> Result<PgPool, String> {
        database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}
