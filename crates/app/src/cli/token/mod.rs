use clap::{Args, Subcommand};
use driftworks_app::auth::ApiTokenMetadata;
use jiff::Timestamp;

mod create;
mod list;
mod revoke;

/// Issue, inspect and revoke bearer tokens.
#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    action: TokenAction,
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Issue a new token for a user
    Create(create::CreateTokenArgs),

    /// Show every token a user holds
    List(list::ListTokensArgs),

    /// Stop a token from authenticating
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.action {
        TokenAction::Create(args) => create::run(args).await,
        TokenAction::List(args) => list::run(args).await,
        TokenAction::Revoke(args) => revoke::run(args).await,
    }
}

fn or_label(at: Option<Timestamp>, label: &str) -> String {
    at.map_or_else(|| label.to_owned(), |at| at.to_string())
}

/// Print the fields an operator needs to tell tokens apart.
fn print_metadata(token: &ApiTokenMetadata) {
    println!("token_uuid: {}", token.uuid);
    println!("user_uuid: {}", token.user_uuid);
    println!("version: {}", token.version.as_i16());
    println!("created_at: {}", token.created_at);
    println!("last_used_at: {}", or_label(token.last_used_at, "never"));
    println!("revoked_at: {}", or_label(token.revoked_at, "active"));
}
