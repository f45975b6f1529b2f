use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::transactions::{CreateTransactionRequest, TransactionList, TransactionRecorded},
    error::AppResult,
    middleware::auth::CurrentSession,
    models::Product,
    response::ApiResponse,
    routes::params::{ConfirmQuery, LedgerQuery},
    services::ledger_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/products", get(stock_options))
        .route("/{id}", delete(delete_transaction))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(LedgerQuery),
    responses(
        (status = 200, description = "Most recent ledger entries, newest first", body = ApiResponse<TransactionList>),
        (status = 500, description = "Failed to load transactions"),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    _session: CurrentSession,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<ApiResponse<TransactionList>>> {
    let resp = ledger_service::list_transactions(&state, query.limit).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/transactions/products",
    responses(
        (status = 200, description = "Products with current stock for the transaction form", body = ApiResponse<Vec<Product>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn stock_options(
    State(state): State<AppState>,
    _session: CurrentSession,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let resp = ledger_service::stock_options(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 200, description = "Recorded; refreshed ledger and products", body = ApiResponse<TransactionRecorded>),
        (status = 400, description = "Missing product, bad quantity or insufficient stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(payload): Json<CreateTransactionRequest>,
) -> AppResult<Json<ApiResponse<TransactionRecorded>>> {
    let resp = ledger_service::record_transaction(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Deleted; refreshed ledger", body = ApiResponse<TransactionList>),
        (status = 428, description = "Delete not confirmed"),
        (status = 500, description = "Store rejected the delete; refreshed ledger", body = ApiResponse<TransactionList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<TransactionList>>)> {
    let (status, resp) =
        ledger_service::delete_transaction(&state, id, query.confirm.into()).await?;
    Ok((status, Json(resp)))
}
