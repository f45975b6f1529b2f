//! Inventory transaction ledger.
//!
//! Entries are append-only rows in `inventory_transactions`. The single
//! business rule lives in [`validate_entry`]: an outbound movement may not
//! exceed the stock of the product as last fetched. The check runs against
//! that snapshot, not atomically with the insert, and appending never writes
//! back to `products.quantity`; deleting an entry does not reverse it either.

use axum::http::StatusCode;
use uuid::Uuid;

use crate::{
    dto::transactions::{CreateTransactionRequest, TransactionList, TransactionRecorded},
    entity::{inventory_transactions, products},
    error::{AppError, AppResult},
    models::{Product, ProductSummary, Transaction, TransactionDraft, TransactionType, TransactionView},
    response::{ApiResponse, Meta},
    services::product_service::ProductRegistry,
    state::AppState,
    store::{Direction, DynRepository, Filter, Select, Store, StoreError, StoreResult, Value},
    validation::{ValidationError, optional_text},
};

pub const DEFAULT_LEDGER_LIMIT: u64 = 50;
pub const MAX_LEDGER_LIMIT: u64 = 100;

/// Outcome of the human acknowledgment step before a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<Option<bool>> for Confirmation {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Confirmation::Confirmed,
            _ => Confirmation::Declined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Cancelled,
}

/// A stock movement as submitted by the new-transaction form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub product_id: Option<Uuid>,
    pub kind: TransactionType,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Checks an entry against the products the form has loaded and returns the
/// selected product.
pub fn validate_entry<'a>(
    entry: &NewEntry,
    snapshot: &'a [Product],
) -> Result<&'a Product, ValidationError> {
    let product = entry
        .product_id
        .and_then(|id| snapshot.iter().find(|p| p.id == id))
        .ok_or(ValidationError::MissingProduct)?;

    if entry.quantity < 1 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    if entry.kind == TransactionType::Out && entry.quantity > product.quantity {
        return Err(ValidationError::InsufficientStock);
    }
    Ok(product)
}

#[derive(Clone)]
pub struct TransactionLedger {
    transactions: DynRepository<Transaction>,
    products: DynRepository<Product>,
}

impl TransactionLedger {
    pub fn new(store: &Store) -> Self {
        Self {
            transactions: store.transactions.clone(),
            products: store.products.clone(),
        }
    }

    /// Products the new-transaction form offers, ordered by name.
    pub async fn stock_snapshot(&self) -> StoreResult<Vec<Product>> {
        self.products
            .select(&Select::all().order_by(products::Column::Name, Direction::Asc))
            .await
    }

    /// Validates `entry` against `snapshot`, then issues a single insert.
    pub async fn append(&self, entry: NewEntry, snapshot: &[Product]) -> AppResult<Uuid> {
        let product = validate_entry(&entry, snapshot)?;

        let draft = TransactionDraft {
            product_id: product.id,
            kind: entry.kind,
            quantity: entry.quantity,
            notes: optional_text(entry.notes),
        };
        let row = self.transactions.insert(&draft).await?;

        tracing::info!(
            transaction_id = %row.id,
            product_id = %row.product_id,
            kind = %row.kind,
            quantity = row.quantity,
            "transaction recorded"
        );
        Ok(row.id)
    }

    /// Most recent entries first, each joined with its product's name and sku.
    pub async fn list(&self, limit: u64) -> StoreResult<Vec<TransactionView>> {
        let rows = self
            .transactions
            .select(
                &Select::all()
                    .order_by(inventory_transactions::Column::CreatedAt, Direction::Desc)
                    .limit(limit),
            )
            .await?;

        let mut product_ids: Vec<Uuid> = rows.iter().map(|t| t.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let products = if product_ids.is_empty() {
            Vec::new()
        } else {
            let ids = product_ids.into_iter().map(Value::Uuid).collect();
            self.products
                .select(&Select::all().filter(Filter::In(products::Column::Id, ids)))
                .await?
        };

        Ok(rows
            .into_iter()
            .map(|t| {
                let product = products
                    .iter()
                    .find(|p| p.id == t.product_id)
                    .map(|p| ProductSummary {
                        name: p.name.clone(),
                        sku: p.sku.clone(),
                    });
                TransactionView {
                    id: t.id,
                    product_id: t.product_id,
                    kind: t.kind,
                    quantity: t.quantity,
                    notes: t.notes,
                    created_at: t.created_at,
                    product,
                }
            })
            .collect())
    }

    /// Deletes one entry. Nothing is sent to the store unless confirmed.
    pub async fn remove(&self, id: Uuid, confirmation: Confirmation) -> StoreResult<Removal> {
        if confirmation == Confirmation::Declined {
            return Ok(Removal::Cancelled);
        }
        self.transactions.delete(id).await?;
        tracing::info!(transaction_id = %id, "transaction deleted");
        Ok(Removal::Removed)
    }
}

pub fn clamp_limit(limit: Option<u64>) -> u64 {
    limit
        .unwrap_or(DEFAULT_LEDGER_LIMIT)
        .clamp(1, MAX_LEDGER_LIMIT)
}

async fn load_ledger(ledger: &TransactionLedger, limit: u64) -> AppResult<Vec<TransactionView>> {
    ledger.list(limit).await.map_err(|err| {
        tracing::error!(error = %err, "error fetching transactions");
        AppError::Load {
            banner: "Failed to load transactions",
            source: err,
        }
    })
}

pub async fn list_transactions(
    state: &AppState,
    limit: Option<u64>,
) -> AppResult<ApiResponse<TransactionList>> {
    let limit = clamp_limit(limit);
    let ledger = TransactionLedger::new(&state.store);
    let items = load_ledger(&ledger, limit).await?;
    let meta = Meta::new(limit, items.len() as u64);
    Ok(ApiResponse::success(
        "Transactions",
        TransactionList { items },
        Some(meta),
    ))
}

pub async fn stock_options(state: &AppState) -> AppResult<ApiResponse<Vec<Product>>> {
    let ledger = TransactionLedger::new(&state.store);
    let products = ledger.stock_snapshot().await.map_err(|err| {
        tracing::error!(error = %err, "error fetching products");
        AppError::Load {
            banner: "Failed to load products",
            source: err,
        }
    })?;
    let meta = Meta::total(products.len());
    Ok(ApiResponse::success("Products", products, Some(meta)))
}

/// Form flow: load the stock snapshot, submit, then reload the ledger and
/// the product list once each.
pub async fn record_transaction(
    state: &AppState,
    payload: CreateTransactionRequest,
) -> AppResult<ApiResponse<TransactionRecorded>> {
    let ledger = TransactionLedger::new(&state.store);
    let snapshot = ledger.stock_snapshot().await.map_err(|err| {
        tracing::error!(error = %err, "error fetching products");
        AppError::Load {
            banner: "Failed to load products",
            source: err,
        }
    })?;

    let entry = NewEntry {
        product_id: Uuid::parse_str(payload.product_id.trim()).ok(),
        kind: payload.kind,
        quantity: payload.quantity,
        notes: payload.notes,
    };
    let id = ledger.append(entry, &snapshot).await?;

    // The entry is stored by now; a failed reload only empties that list.
    let mut banner = None;
    let transactions = match load_ledger(&ledger, DEFAULT_LEDGER_LIMIT).await {
        Ok(rows) => rows,
        Err(err) => {
            banner.get_or_insert(err.to_string());
            Vec::new()
        }
    };
    let products = match ProductRegistry::new(&state.store).load().await {
        Ok(rows) => rows,
        Err(err) => {
            banner.get_or_insert(err.to_string());
            Vec::new()
        }
    };

    Ok(ApiResponse::success(
        banner.unwrap_or_else(|| "Transaction recorded".into()),
        TransactionRecorded {
            id,
            transactions,
            products,
        },
        Some(Meta::empty()),
    ))
}

/// Deletes after confirmation, then re-lists whether or not the delete
/// went through.
pub async fn delete_transaction(
    state: &AppState,
    id: Uuid,
    confirmation: Confirmation,
) -> AppResult<(StatusCode, ApiResponse<TransactionList>)> {
    let ledger = TransactionLedger::new(&state.store);
    let outcome: Result<Removal, StoreError> = ledger.remove(id, confirmation).await;
    if let Ok(Removal::Cancelled) = outcome {
        return Err(AppError::ConfirmationRequired);
    }

    let items = load_ledger(&ledger, DEFAULT_LEDGER_LIMIT).await?;
    let meta = Some(Meta::new(DEFAULT_LEDGER_LIMIT, items.len() as u64));
    let data = TransactionList { items };
    match outcome {
        Ok(_) => Ok((
            StatusCode::OK,
            ApiResponse::success("Transaction deleted", data, meta),
        )),
        Err(err) => {
            let err = AppError::Store(err);
            let message = err.to_string();
            Ok((err.status(), ApiResponse::success(message, data, meta)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn widget(quantity: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Widget".into(),
            description: None,
            category_id: Uuid::new_v4(),
            sku: "W-100".into(),
            quantity,
            min_quantity: 2,
            unit_price: Decimal::new(999, 2),
        }
    }

    fn entry(product: &Product, kind: TransactionType, quantity: i32) -> NewEntry {
        NewEntry {
            product_id: Some(product.id),
            kind,
            quantity,
            notes: None,
        }
    }

    #[test]
    fn outbound_over_stock_is_rejected() {
        let p = widget(5);
        let snapshot = [p.clone()];
        assert_eq!(
            validate_entry(&entry(&p, TransactionType::Out, 10), &snapshot),
            Err(ValidationError::InsufficientStock)
        );
        assert!(validate_entry(&entry(&p, TransactionType::Out, 5), &snapshot).is_ok());
    }

    #[test]
    fn inbound_skips_the_stock_check() {
        let p = widget(0);
        let snapshot = [p.clone()];
        assert!(validate_entry(&entry(&p, TransactionType::In, 1_000), &snapshot).is_ok());
    }

    #[test]
    fn product_must_come_from_the_snapshot() {
        let p = widget(5);
        let unrelated = [widget(5)];
        assert_eq!(
            validate_entry(&entry(&p, TransactionType::In, 1), &unrelated),
            Err(ValidationError::MissingProduct)
        );
        let none = NewEntry {
            product_id: None,
            kind: TransactionType::In,
            quantity: 1,
            notes: None,
        };
        assert_eq!(
            validate_entry(&none, &[p]),
            Err(ValidationError::MissingProduct)
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let p = widget(5);
        let snapshot = [p.clone()];
        assert_eq!(
            validate_entry(&entry(&p, TransactionType::In, 0), &snapshot),
            Err(ValidationError::NonPositiveQuantity)
        );
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None), 50);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), 100);
    }
}
