use clap::{Parser, Subcommand};

mod catalog;
mod connection;
mod db;
mod token;
mod user;
mod vouchers;

#[derive(Debug, Parser)]
#[command(name = "driftworks-app", about = "Driftworks admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Catalog(catalog::CatalogCommand),
    Vouchers(vouchers::VouchersCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::Vouchers(command) => vouchers::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
