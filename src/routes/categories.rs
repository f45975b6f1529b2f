use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CategorySaved, SaveCategoryRequest},
    error::AppResult,
    middleware::auth::CurrentSession,
    models::Category,
    response::ApiResponse,
    routes::params::ConfirmQuery,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = ApiResponse<CategoryList>),
        (status = 500, description = "Failed to load categories"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    _session: CurrentSession,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Get category", body = ApiResponse<Category>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::get_category(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = SaveCategoryRequest,
    responses(
        (status = 200, description = "Created category and the refreshed list", body = ApiResponse<CategorySaved>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(payload): Json<SaveCategoryRequest>,
) -> AppResult<Json<ApiResponse<CategorySaved>>> {
    let resp = category_service::save_category(&state, None, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = SaveCategoryRequest,
    responses(
        (status = 200, description = "Updated category and the refreshed list", body = ApiResponse<CategorySaved>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveCategoryRequest>,
) -> AppResult<Json<ApiResponse<CategorySaved>>> {
    let resp = category_service::save_category(&state, Some(id), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Deleted; refreshed list", body = ApiResponse<CategoryList>),
        (status = 428, description = "Delete not confirmed"),
        (status = 500, description = "Store rejected the delete; refreshed list", body = ApiResponse<CategoryList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<CategoryList>>)> {
    let (status, resp) =
        category_service::delete_category(&state, id, query.confirm.into()).await?;
    Ok((status, Json(resp)))
}
