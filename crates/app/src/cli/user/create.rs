use clap::Args;
use driftworks_app::auth::{NewUser, PgAuthService, Role, UserUuid};

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    #[command(flatten)]
    connection: Connection,

    /// Login e-mail address
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// `customer` or `staff`
    #[arg(long, default_value = "customer")]
    role: Role,

    /// Also issue an API token for the new user
    #[arg(long)]
    with_token: bool,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.email.trim().is_empty() {
        return Err("email cannot be empty".to_string());
    }

    let pool = args.connection.open().await?;

    let service = PgAuthService::new(pool);

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            name: args.name,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    if args.with_token {
        let issued = service
            .issue_api_token(user.uuid)
            .await
            .map_err(|error| format!("failed to create token: {error}"))?;

        println!("token_uuid: {}", issued.metadata.uuid);
        println!("api_token: {}", issued.token);
        println!("store this token now; it is only shown once");
    }

    Ok(())
}
