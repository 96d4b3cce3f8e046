//! Driftworks JSON API Server

use std::process::ExitCode;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use thiserror::Error;
use tracing::{error, info};

use driftworks::money::MoneyError;
use driftworks_app::{
    context::{AppContext, AppInitError},
    payments::WebhookSecret,
};

use crate::{
    config::ServerConfig,
    observability::{Observability, metrics_handler, request_logging},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod cart;
mod checkout;
mod config;
mod details;
mod extensions;
mod healthcheck;
mod money;
mod observability;
mod orders;
mod products;
mod profile;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod vouchers;

#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid commerce settings: {0}")]
    Commerce(#[from] MoneyError),

    #[error("failed to initialize app context: {0}")]
    App(#[from] AppInitError),
}

/// Driftworks JSON API Server entry point
#[tokio::main]
pub async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging not initialized yet, must use eprintln for config errors"
            )]
            {
                eprintln!("Configuration error: {error}");
            }

            return ExitCode::FAILURE;
        }
    };

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging failed to initialize, eprintln is all that is left"
            )]
            {
                eprintln!("Observability error: {error}");
            }

            return ExitCode::FAILURE;
        }
    };

    let code = match serve(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");

            ExitCode::FAILURE
        }
    };

    observability.shutdown();

    code
}

async fn serve(config: &ServerConfig) -> Result<(), StartupError> {
    let app = AppContext::from_config(&config.app_config()?).await?;

    let state = State::shared(
        app,
        WebhookSecret::new(&config.payments.payments_webhook_secret),
    );

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(request_logging)
        .hoop(inject(state))
        .push(router::app_router());

    let doc = OpenApi::new("Driftworks API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    Ok(())
}
