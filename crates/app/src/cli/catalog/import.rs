use std::{fs, path::PathBuf};

use clap::Args;
use driftworks::fixtures::Fixture;
use driftworks_app::{
    database::Db,
    domain::catalog::{CatalogService, CatalogServiceError, PgCatalogService},
};

use crate::cli::connection::Connection;

#[derive(Debug, Args)]
pub(crate) struct ImportCatalogArgs {
    #[command(flatten)]
    connection: Connection,

    /// YAML catalog file
    #[arg(long)]
    file: PathBuf,

    /// Skip products whose slug already exists instead of failing
    #[arg(long)]
    skip_existing: bool,
}

pub(crate) async fn run(args: ImportCatalogArgs) -> Result<(), String> {
    let contents = fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let mut fixture = Fixture::new();

    fixture
        .load_catalog_str(&contents)
        .map_err(|error| format!("invalid catalog: {error}"))?;

    let pool = args.connection.open().await?;

    let service = PgCatalogService::new(Db::new(pool));

    let mut imported = 0_usize;
    let mut skipped = 0_usize;

    for product in fixture.products_sorted() {
        match service.import_product(product.clone()).await {
            Ok(product) => {
                imported += 1;
                println!("imported {} ({})", product.slug, product.uuid);
            }
            Err(CatalogServiceError::AlreadyExists) if args.skip_existing => {
                skipped += 1;
                println!("skipped {}: slug already exists", product.slug);
            }
            Err(error) => return Err(format!("failed to import {}: {error}", product.slug)),
        }
    }

    println!("imported: {imported}, skipped: {skipped}");

    Ok(())
}
