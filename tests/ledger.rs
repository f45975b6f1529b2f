mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use inventory_ledger::{
    dto::transactions::CreateTransactionRequest,
    error::AppError,
    models::TransactionType,
    services::ledger_service::{self, Confirmation, NewEntry, Removal, TransactionLedger},
    store::{
        StoreError,
        memory::{MemoryStore, Operation},
    },
    validation::ValidationError,
};

fn out(product_id: uuid::Uuid, quantity: i32) -> NewEntry {
    NewEntry {
        product_id: Some(product_id),
        kind: TransactionType::Out,
        quantity,
        notes: None,
    }
}

#[tokio::test]
async fn outbound_over_stock_never_reaches_the_store() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let ledger = TransactionLedger::new(&memory.handle());

    let snapshot = ledger.stock_snapshot().await?;
    let err = ledger.append(out(widget.id, 10), &snapshot).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InsufficientStock)
    ));
    assert_eq!(err.to_string(), "Insufficient stock for this transaction");
    assert_eq!(memory.transactions.calls().total(), 0);
    assert!(memory.transactions.rows().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn outbound_within_stock_inserts_once_and_lists_first() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    common::transaction(
        &memory,
        &widget,
        TransactionType::In,
        5,
        Utc::now() - Duration::hours(2),
    )
    .await;
    let ledger = TransactionLedger::new(&memory.handle());

    let snapshot = ledger.stock_snapshot().await?;
    let id = ledger.append(out(widget.id, 3), &snapshot).await?;
    assert_eq!(memory.transactions.calls().insert, 1);

    let entries = ledger.list(50).await?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].kind, TransactionType::Out);
    assert_eq!(entries[0].quantity, 3);
    let summary = entries[0].product.as_ref().expect("joined product");
    assert_eq!(summary.name, "Widget");
    assert_eq!(summary.sku, "W-1");

    // Recording a movement leaves the product row alone.
    let stored = memory.products.rows().await;
    assert_eq!(stored[0].quantity, 5);
    assert_eq!(memory.products.calls().update, 0);
    Ok(())
}

#[tokio::test]
async fn inbound_is_accepted_regardless_of_stock() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let empty = common::product(&memory, "Gasket", "G-9", 0, 4).await;
    let ledger = TransactionLedger::new(&memory.handle());

    let snapshot = ledger.stock_snapshot().await?;
    let entry = NewEntry {
        product_id: Some(empty.id),
        kind: TransactionType::In,
        quantity: 40,
        notes: Some("  restock  ".into()),
    };
    ledger.append(entry, &snapshot).await?;

    let rows = memory.transactions.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, 40);
    assert_eq!(rows[0].notes.as_deref(), Some("restock"));
    Ok(())
}

#[tokio::test]
async fn rejected_insert_leaves_the_ledger_unchanged() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let ledger = TransactionLedger::new(&memory.handle());
    let snapshot = ledger.stock_snapshot().await?;

    memory
        .transactions
        .fail_next("new row violates row-level security policy")
        .await;
    let err = ledger.append(out(widget.id, 1), &snapshot).await.unwrap_err();

    assert!(matches!(err, AppError::Store(StoreError::Backend(_))));
    assert_eq!(err.to_string(), "new row violates row-level security policy");
    assert!(ledger.list(50).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn list_returns_newest_first_up_to_the_limit() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let now = Utc::now();
    let oldest =
        common::transaction(&memory, &widget, TransactionType::In, 1, now - Duration::hours(3))
            .await;
    let newest =
        common::transaction(&memory, &widget, TransactionType::In, 2, now - Duration::minutes(5))
            .await;
    let middle =
        common::transaction(&memory, &widget, TransactionType::Out, 1, now - Duration::hours(1))
            .await;

    let ledger = TransactionLedger::new(&memory.handle());
    let ids: Vec<_> = ledger.list(2).await?.into_iter().map(|t| t.id).collect();

    assert_eq!(ids, [newest.id, middle.id]);
    assert!(!ids.contains(&oldest.id));
    Ok(())
}

#[tokio::test]
async fn entries_without_a_product_row_list_without_a_summary() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let ghost = common::product(&memory, "Ghost", "X-0", 1, 0).await;
    common::transaction(&memory, &ghost, TransactionType::In, 1, Utc::now()).await;
    let earlier = Utc::now() - Duration::minutes(1);
    common::transaction(&memory, &widget, TransactionType::In, 1, earlier).await;

    let handle = memory.handle();
    handle.products.delete(ghost.id).await?;

    let entries = TransactionLedger::new(&handle).list(50).await?;
    assert_eq!(entries.len(), 2);
    assert!(entries[0].product.is_none());
    assert_eq!(entries[1].product.as_ref().map(|p| p.sku.as_str()), Some("W-1"));
    Ok(())
}

#[tokio::test]
async fn declined_removal_sends_nothing() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let entry = common::transaction(&memory, &widget, TransactionType::In, 5, Utc::now()).await;
    let ledger = TransactionLedger::new(&memory.handle());

    let outcome = ledger.remove(entry.id, Confirmation::Declined).await?;
    assert_eq!(outcome, Removal::Cancelled);
    assert_eq!(memory.transactions.calls().total(), 0);

    let outcome = ledger.remove(entry.id, Confirmation::Confirmed).await?;
    assert_eq!(outcome, Removal::Removed);
    assert_eq!(memory.transactions.calls().delete, 1);
    assert!(memory.transactions.rows().await.is_empty());
    assert_eq!(memory.products.rows().await[0].quantity, 5);
    Ok(())
}

#[tokio::test]
async fn form_submission_without_product_is_rejected() {
    let memory = MemoryStore::new();
    common::product(&memory, "Widget", "W-1", 5, 1).await;
    let state = common::state(&memory);

    let err = ledger_service::record_transaction(
        &state,
        CreateTransactionRequest {
            product_id: String::new(),
            kind: TransactionType::In,
            quantity: 3,
            notes: None,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Please select a product");
    assert_eq!(memory.transactions.calls().insert, 0);
}

#[tokio::test]
async fn form_submission_refreshes_both_lists_once() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    common::product(&memory, "Anchor", "A-2", 9, 1).await;
    let state = common::state(&memory);

    let resp = ledger_service::record_transaction(
        &state,
        CreateTransactionRequest {
            product_id: widget.id.to_string(),
            kind: TransactionType::Out,
            quantity: 2,
            notes: Some("bench".into()),
        },
    )
    .await?;
    let data = resp.data.expect("recorded");

    assert_eq!(data.transactions.len(), 1);
    assert_eq!(data.transactions[0].id, data.id);
    let names: Vec<_> = data.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Anchor", "Widget"]);

    assert_eq!(memory.transactions.calls().insert, 1);
    assert_eq!(memory.transactions.calls().select, 1);
    // Snapshot, ledger join, product reload.
    assert_eq!(memory.products.calls().select, 3);
    Ok(())
}

#[tokio::test]
async fn recorded_entry_survives_a_failed_ledger_reload() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let state = common::state(&memory);
    memory
        .transactions
        .fail_next_on(Operation::Select, "statement timeout")
        .await;

    let resp = ledger_service::record_transaction(
        &state,
        CreateTransactionRequest {
            product_id: widget.id.to_string(),
            kind: TransactionType::In,
            quantity: 4,
            notes: None,
        },
    )
    .await?;

    assert_eq!(resp.message, "Failed to load transactions");
    let data = resp.data.expect("recorded");
    assert!(data.transactions.is_empty());
    assert_eq!(data.products.len(), 1);
    let rows = memory.transactions.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, data.id);
    Ok(())
}

#[tokio::test]
async fn unconfirmed_delete_is_refused_without_store_calls() {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let entry = common::transaction(&memory, &widget, TransactionType::In, 5, Utc::now()).await;
    let state = common::state(&memory);

    let err = ledger_service::delete_transaction(&state, entry.id, Confirmation::Declined)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConfirmationRequired));
    assert_eq!(err.status(), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(memory.transactions.calls().total(), 0);
    assert_eq!(memory.products.calls().total(), 0);
}

#[tokio::test]
async fn failed_delete_still_relists() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let widget = common::product(&memory, "Widget", "W-1", 5, 1).await;
    let entry = common::transaction(&memory, &widget, TransactionType::In, 5, Utc::now()).await;
    let state = common::state(&memory);

    memory.transactions.fail_next("permission denied").await;
    let (status, resp) =
        ledger_service::delete_transaction(&state, entry.id, Confirmation::Confirmed).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.message, "permission denied");
    let items = resp.data.expect("refreshed ledger").items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, entry.id);
    assert_eq!(memory.transactions.calls().delete, 1);
    assert_eq!(memory.transactions.calls().select, 1);
    Ok(())
}
