#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use inventory_ledger::{
    models::{Category, Product, Transaction, TransactionType},
    services::auth_service::SessionSettings,
    state::AppState,
    store::memory::MemoryStore,
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn settings() -> SessionSettings {
    SessionSettings {
        jwt_secret: JWT_SECRET.into(),
        ttl: Duration::hours(24),
    }
}

pub fn state(memory: &MemoryStore) -> AppState {
    AppState::new(memory.handle(), settings())
}

pub async fn category(memory: &MemoryStore, name: &str) -> Category {
    let row = Category {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        created_at: Utc::now(),
    };
    memory.categories.seed(row.clone()).await;
    row
}

pub async fn product(
    memory: &MemoryStore,
    name: &str,
    sku: &str,
    quantity: i32,
    min_quantity: i32,
) -> Product {
    let row = Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        category_id: Uuid::new_v4(),
        sku: sku.into(),
        quantity,
        min_quantity,
        unit_price: Decimal::new(1250, 2),
    };
    memory.products.seed(row.clone()).await;
    row
}

pub async fn transaction(
    memory: &MemoryStore,
    product: &Product,
    kind: TransactionType,
    quantity: i32,
    created_at: DateTime<Utc>,
) -> Transaction {
    let row = Transaction {
        id: Uuid::new_v4(),
        product_id: product.id,
        kind,
        quantity,
        notes: None,
        created_at,
    };
    memory.transactions.seed(row.clone()).await;
    row
}
