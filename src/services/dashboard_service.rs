use chrono::{DateTime, Duration, Utc};

use crate::{
    dto::dashboard::DashboardStats,
    entity::{inventory_transactions, products},
    error::{AppError, AppResult},
    models::{Product, Transaction},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{DynRepository, Filter, Store, StoreResult},
};

#[derive(Clone)]
pub struct DashboardAggregator {
    products: DynRepository<Product>,
    transactions: DynRepository<Transaction>,
}

impl DashboardAggregator {
    pub fn new(store: &Store) -> Self {
        Self {
            products: store.products.clone(),
            transactions: store.transactions.clone(),
        }
    }

    /// Runs the three counts concurrently; the result does not depend on
    /// which one the store answers first.
    pub async fn stats_at(&self, now: DateTime<Utc>) -> StoreResult<DashboardStats> {
        let since = now - Duration::hours(24);
        let low_stock = [Filter::ColumnLt(products::Column::Quantity, products::Column::MinQuantity)];
        let recent = [Filter::Gte(inventory_transactions::Column::CreatedAt, since.into())];

        let (total_products, low_stock_items, recent_transactions) = tokio::try_join!(
            self.products.count(&[]),
            self.products.count(&low_stock),
            self.transactions.count(&recent),
        )?;

        Ok(DashboardStats {
            total_products,
            low_stock_items,
            recent_transactions,
        })
    }
}

pub async fn dashboard(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = DashboardAggregator::new(&state.store)
        .stats_at(Utc::now())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "error fetching dashboard stats");
            AppError::Load {
                banner: "Failed to load dashboard",
                source: err,
            }
        })?;
    Ok(ApiResponse::success("Dashboard", stats, Some(Meta::empty())))
}
