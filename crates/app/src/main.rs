//! Driftworks Admin CLI

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; flags and the environment still apply.
    _ = dotenvy::dotenv();

    match cli::Cli::parse().run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("driftworks-app: {error}");
            ExitCode::FAILURE
        }
    }
}
