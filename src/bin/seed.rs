use inventory_ledger::{
    config::AppConfig,
    db::connect_store,
    dto::{categories::SaveCategoryRequest, products::SaveProductRequest},
    services::{category_service::CategoryRegistry, product_service::ProductRegistry},
};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_ledger=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    config.require_database_url()?;
    let store = connect_store(&config).await?;

    let categories = CategoryRegistry::new(&store);
    let products = ProductRegistry::new(&store);

    if !products.list().await?.is_empty() {
        tracing::info!("products already present, nothing to seed");
        return Ok(());
    }

    let seed = [
        (
            "Hardware",
            "Fasteners and fittings",
            vec![
                ("Hex Bolt M8", "HB-M8", 240, 50, Decimal::new(35, 2)),
                ("Wood Screw 4x40", "WS-440", 30, 100, Decimal::new(8, 2)),
            ],
        ),
        (
            "Tools",
            "Hand tools",
            vec![
                ("Claw Hammer", "CH-16", 12, 5, Decimal::new(1899, 2)),
                ("Tape Measure 5m", "TM-5", 3, 8, Decimal::new(799, 2)),
            ],
        ),
    ];

    for (category, description, items) in seed {
        let category_id = categories
            .upsert(
                None,
                SaveCategoryRequest {
                    name: category.into(),
                    description: Some(description.into()),
                },
            )
            .await?;

        for (name, sku, quantity, min_quantity, unit_price) in items {
            products
                .upsert(
                    None,
                    SaveProductRequest {
                        name: name.into(),
                        description: None,
                        category_id: category_id.to_string(),
                        sku: sku.into(),
                        quantity,
                        min_quantity,
                        unit_price,
                    },
                )
                .await?;
        }
        tracing::info!(category, "seeded category");
    }

    tracing::info!("seed completed");
    Ok(())
}
