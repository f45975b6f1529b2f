mod common;

use axum::http::StatusCode;
use inventory_ledger::{
    dto::{categories::SaveCategoryRequest, products::SaveProductRequest},
    error::AppError,
    services::{
        category_service::{self, CategoryRegistry},
        ledger_service::Confirmation,
        product_service::{self, ProductRegistry},
    },
    store::memory::{MemoryStore, Operation},
    validation::ValidationError,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn product_form(name: &str, category_id: &str) -> SaveProductRequest {
    SaveProductRequest {
        name: name.into(),
        description: None,
        category_id: category_id.into(),
        sku: format!("{}-1", &name[..1]),
        quantity: 10,
        min_quantity: 2,
        unit_price: Decimal::new(450, 2),
    }
}

#[tokio::test]
async fn product_without_category_is_rejected_before_any_call() {
    let memory = MemoryStore::new();
    let state = common::state(&memory);

    let err = product_service::save_product(&state, None, product_form("Widget", ""))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::MissingCategory)
    ));
    assert_eq!(err.to_string(), "Please select a category");
    assert_eq!(memory.products.calls().total(), 0);
}

#[tokio::test]
async fn product_category_must_be_a_stored_category() {
    let memory = MemoryStore::new();
    common::category(&memory, "Tools").await;
    let state = common::state(&memory);
    let unknown = Uuid::new_v4().to_string();

    let err = product_service::save_product(&state, None, product_form("Widget", &unknown))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::MissingCategory)
    ));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(memory.categories.calls().select, 1);
    assert_eq!(memory.products.calls().total(), 0);
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let memory = MemoryStore::new();
    let tools = common::category(&memory, "Tools").await;
    let mut form = product_form("Widget", &tools.id.to_string());
    form.quantity = -1;

    let err = ProductRegistry::new(&memory.handle())
        .upsert(None, form)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(memory.products.calls().insert, 0);
}

#[tokio::test]
async fn save_inserts_without_id_and_updates_with_one() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let tools = common::category(&memory, "Tools").await;
    let state = common::state(&memory);
    let category_id = tools.id.to_string();

    let created = product_service::save_product(&state, None, product_form("Widget", &category_id))
        .await?
        .data
        .expect("saved");
    assert_eq!(memory.products.calls().insert, 1);
    assert_eq!(memory.products.calls().select, 1);
    assert_eq!(created.items.len(), 1);

    let mut form = product_form("Widget Pro", &category_id);
    form.unit_price = Decimal::new(999, 2);
    let updated = product_service::save_product(&state, Some(created.id), form)
        .await?
        .data
        .expect("saved");

    assert_eq!(updated.id, created.id);
    assert_eq!(memory.products.calls().insert, 1);
    assert_eq!(memory.products.calls().update, 1);
    assert_eq!(memory.products.calls().select, 2);
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].name, "Widget Pro");
    assert_eq!(updated.items[0].unit_price, Decimal::new(999, 2));
    Ok(())
}

#[tokio::test]
async fn updating_a_missing_product_is_not_found() {
    let memory = MemoryStore::new();
    let tools = common::category(&memory, "Tools").await;
    let state = common::state(&memory);

    let err = product_service::save_product(
        &state,
        Some(Uuid::new_v4()),
        product_form("Widget", &tools.id.to_string()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn saved_product_survives_a_failed_reload() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let tools = common::category(&memory, "Tools").await;
    let state = common::state(&memory);
    memory
        .products
        .fail_next_on(Operation::Select, "connection reset")
        .await;

    let resp =
        product_service::save_product(&state, None, product_form("Widget", &tools.id.to_string()))
            .await?;

    assert_eq!(resp.message, "Failed to load products");
    let saved = resp.data.expect("saved product");
    assert!(saved.items.is_empty());
    let rows = memory.products.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, saved.id);
    Ok(())
}

#[tokio::test]
async fn products_are_listed_by_name() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    for name in ["Washer", "Anchor", "Magnet"] {
        common::product(&memory, name, name, 1, 0).await;
    }

    let names: Vec<_> = ProductRegistry::new(&memory.handle())
        .list()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Anchor", "Magnet", "Washer"]);
    Ok(())
}

#[tokio::test]
async fn failed_product_load_shows_the_banner() {
    let memory = MemoryStore::new();
    memory.products.fail_next("connection refused").await;
    let state = common::state(&memory);

    let err = product_service::list_products(&state).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.to_string(), "Failed to load products");
}

#[tokio::test]
async fn category_requires_a_name() {
    let memory = MemoryStore::new();
    let err = CategoryRegistry::new(&memory.handle())
        .upsert(
            None,
            SaveCategoryRequest {
                name: "   ".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Name is required");
    assert_eq!(memory.categories.calls().total(), 0);
}

#[tokio::test]
async fn saved_category_survives_a_failed_reload() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let state = common::state(&memory);
    memory
        .categories
        .fail_next_on(Operation::Select, "connection reset")
        .await;

    let resp = category_service::save_category(
        &state,
        None,
        SaveCategoryRequest {
            name: "Tools".into(),
            description: None,
        },
    )
    .await?;

    assert_eq!(resp.message, "Failed to load categories");
    let saved = resp.data.expect("saved category");
    assert!(saved.items.is_empty());
    assert_eq!(memory.categories.rows().await[0].id, saved.id);
    Ok(())
}

#[tokio::test]
async fn category_delete_needs_confirmation() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let tools = common::category(&memory, "Tools").await;
    common::category(&memory, "Fasteners").await;
    let state = common::state(&memory);

    let err = category_service::delete_category(&state, tools.id, Confirmation::Declined)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConfirmationRequired));
    assert_eq!(memory.categories.calls().total(), 0);

    let (status, resp) =
        category_service::delete_category(&state, tools.id, Confirmation::Confirmed).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = resp
        .data
        .expect("refreshed categories")
        .items
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Fasteners"]);
    assert_eq!(memory.categories.calls().delete, 1);
    Ok(())
}

#[tokio::test]
async fn rejected_category_delete_keeps_the_row() -> anyhow::Result<()> {
    let memory = MemoryStore::new();
    let tools = common::category(&memory, "Tools").await;
    let state = common::state(&memory);

    memory
        .categories
        .fail_next("update or delete on table \"categories\" violates foreign key constraint")
        .await;
    let (status, resp) =
        category_service::delete_category(&state, tools.id, Confirmation::Confirmed).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.message.contains("violates foreign key constraint"));
    assert_eq!(resp.data.expect("refreshed categories").items.len(), 1);
    Ok(())
}
