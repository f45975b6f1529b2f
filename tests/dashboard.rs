mod common;

use chrono::{Duration, Utc};
use inventory_ledger::{
    models::TransactionType,
    services::dashboard_service::{self, DashboardAggregator},
    store::memory::MemoryStore,
};

#[tokio::test]
async fn counts_products_low_stock_and_recent_movements() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let now = Utc::now();

    let mut products = Vec::new();
    for i in 0..12 {
        // Three fall under their minimum; one sits exactly on it.
        let (quantity, min_quantity) = match i {
            0..=2 => (1, 5),
            3 => (5, 5),
            _ => (20, 5),
        };
        let name = format!("Item {i:02}");
        let sku = format!("I-{i}");
        products.push(common::product(&memory, &name, &sku, quantity, min_quantity).await);
    }

    let movements = [
        (TransactionType::In, Duration::hours(1)),
        (TransactionType::Out, Duration::hours(23)),
        (TransactionType::In, Duration::hours(25)),
        (TransactionType::In, Duration::days(7)),
    ];
    for (product, (kind, age)) in products.iter().zip(movements) {
        common::transaction(&memory, product, kind, 1, now - age).await;
    }

    let stats = DashboardAggregator::new(&memory.handle()).stats_at(now).await?;

    assert_eq!(stats.total_products, 12);
    assert_eq!(stats.low_stock_items, 3);
    assert_eq!(stats.recent_transactions, 2);
    assert_eq!(memory.products.calls().count, 2);
    assert_eq!(memory.transactions.calls().count, 1);
    Ok(())
}

#[tokio::test]
async fn empty_store_reports_zeroes() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let stats = DashboardAggregator::new(&memory.handle())
        .stats_at(Utc::now())
        .await?;

    assert_eq!(
        (stats.total_products, stats.low_stock_items, stats.recent_transactions),
        (0, 0, 0)
    );
    Ok(())
}

#[tokio::test]
async fn failed_count_shows_the_banner() {
    let memory = MemoryStore::new();
    memory.transactions.fail_next("timeout").await;
    let state = common::state(&memory);

    let err = dashboard_service::dashboard(&state).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load dashboard");
}

#[test]
fn stats_serialize_in_camel_case() {
    let stats = inventory_ledger::dto::dashboard::DashboardStats {
        total_products: 12,
        low_stock_items: 3,
        recent_transactions: 2,
    };
    assert_eq!(
        serde_json::to_value(stats).unwrap(),
        serde_json::json!({
            "totalProducts": 12,
            "lowStockItems": 3,
            "recentTransactions": 2,
        })
    );
}
