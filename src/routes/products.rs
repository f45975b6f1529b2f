use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{ProductList, ProductSaved, SaveProductRequest},
    error::AppResult,
    middleware::auth::CurrentSession,
    models::Product,
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Products ordered by name", body = ApiResponse<ProductList>),
        (status = 500, description = "Failed to load products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _session: CurrentSession,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = SaveProductRequest,
    responses(
        (status = 200, description = "Created product and the refreshed list", body = ApiResponse<ProductSaved>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(payload): Json<SaveProductRequest>,
) -> AppResult<Json<ApiResponse<ProductSaved>>> {
    let resp = product_service::save_product(&state, None, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SaveProductRequest,
    responses(
        (status = 200, description = "Updated product and the refreshed list", body = ApiResponse<ProductSaved>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveProductRequest>,
) -> AppResult<Json<ApiResponse<ProductSaved>>> {
    let resp = product_service::save_product(&state, Some(id), payload).await?;
    Ok(Json(resp))
}
