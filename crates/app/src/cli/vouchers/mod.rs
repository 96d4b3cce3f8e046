use clap::{Args, Subcommand};

mod reissue;

#[derive(Debug, Args)]
pub(crate) struct VouchersCommand {
    #[command(subcommand)]
    command: VouchersSubcommand,
}

#[derive(Debug, Subcommand)]
enum VouchersSubcommand {
    Reissue(reissue::ReissueArgs),
}

pub(crate) async fn run(command: VouchersCommand) -> Result<(), String> {
    match command.command {
        VouchersSubcommand::Reissue(args) => reissue::run(args).await,
    }
}
