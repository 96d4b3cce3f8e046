//! App Context

use std::sync::Arc;

use driftworks::vouchers::ValidityWindow;
use rusty_money::iso::Currency;
use sqlx::PgPool;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    checkout::{CheckoutCoordinator, CheckoutService},
    database::{self, Db},
    domain::{
        catalog::{CatalogService, PgCatalogService},
        checkouts::PgPendingCheckoutsService,
        orders::{OrdersService, PgOrdersService},
        profiles::{PgProfilesService, ProfilesService},
        vouchers::{PgVouchersService, VouchersService},
    },
    payments::{HttpPaymentGateway, PaymentsConfig},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Settings the services are built from.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub payments: PaymentsConfig,
    pub validity: ValidityWindow,
    pub currency: &'static Currency,

    /// Apply pending migrations on startup.
    pub migrate: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrdersService>,
    pub vouchers: Arc<dyn VouchersService>,
    pub profiles: Arc<dyn ProfilesService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub auth: Arc<dyn AuthService>,
    pub currency: &'static Currency,
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if config.migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        Ok(Self::from_pool(pool, config))
    }

    /// Build every service on top of an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, config: &AppConfig) -> Self {
        let db = Db::new(pool.clone());

        let catalog: Arc<dyn CatalogService> = Arc::new(PgCatalogService::new(db.clone()));
        let orders: Arc<dyn OrdersService> =
            Arc::new(PgOrdersService::new(db.clone(), config.validity));

        let checkout = CheckoutCoordinator::new(
            Arc::clone(&catalog),
            Arc::clone(&orders),
            Arc::new(PgPendingCheckoutsService::new(db.clone())),
            Arc::new(HttpPaymentGateway::new(config.payments.clone())),
            config.currency,
        );

        Self {
            catalog,
            orders,
            vouchers: Arc::new(PgVouchersService::new(db.clone(), config.validity)),
            profiles: Arc::new(PgProfilesService::new(db)),
            checkout: Arc::new(checkout),
            auth: Arc::new(PgAuthService::new(pool)),
            currency: config.currency,
        }
    }
}
