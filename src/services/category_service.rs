use axum::http::StatusCode;
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CategorySaved, SaveCategoryRequest},
    entity::categories,
    error::{AppError, AppResult},
    models::{Category, CategoryDraft},
    response::{ApiResponse, Meta},
    services::ledger_service::{Confirmation, Removal},
    state::AppState,
    store::{Direction, DynRepository, Select, Store, StoreResult},
    validation::{self, ValidationError},
};

#[derive(Clone)]
pub struct CategoryRegistry {
    categories: DynRepository<Category>,
}

impl CategoryRegistry {
    pub fn new(store: &Store) -> Self {
        Self {
            categories: store.categories.clone(),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<Category>> {
        self.categories
            .select(&Select::all().order_by(categories::Column::Name, Direction::Asc))
            .await
    }

    pub async fn load(&self) -> AppResult<Vec<Category>> {
        self.list().await.map_err(|err| {
            tracing::error!(error = %err, "error fetching categories");
            AppError::Load {
                banner: "Failed to load categories",
                source: err,
            }
        })
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Category> {
        self.categories.find(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn upsert(&self, id: Option<Uuid>, form: SaveCategoryRequest) -> AppResult<Uuid> {
        let draft = category_draft(form)?;
        let saved = match id {
            Some(id) => self.categories.update(id, &draft).await?,
            None => self.categories.insert(&draft).await?,
        };
        tracing::info!(category_id = %saved.id, "category saved");
        Ok(saved.id)
    }

    /// Referencing products are not checked here; the store decides.
    pub async fn remove(&self, id: Uuid, confirmation: Confirmation) -> StoreResult<Removal> {
        if confirmation == Confirmation::Declined {
            return Ok(Removal::Cancelled);
        }
        self.categories.delete(id).await?;
        tracing::info!(category_id = %id, "category deleted");
        Ok(Removal::Removed)
    }
}

pub fn category_draft(form: SaveCategoryRequest) -> Result<CategoryDraft, ValidationError> {
    validation::required("Name", &form.name)?;
    Ok(CategoryDraft {
        name: form.name.trim().to_string(),
        description: validation::optional_text(form.description),
    })
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = CategoryRegistry::new(&state.store).load().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = CategoryRegistry::new(&state.store).get(id).await?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn save_category(
    state: &AppState,
    id: Option<Uuid>,
    payload: SaveCategoryRequest,
) -> AppResult<ApiResponse<CategorySaved>> {
    let registry = CategoryRegistry::new(&state.store);
    let id = registry.upsert(id, payload).await?;
    let (message, items) = match registry.load().await {
        Ok(items) => ("Category saved".to_string(), items),
        Err(err) => (err.to_string(), Vec::new()),
    };
    Ok(ApiResponse::success(
        message,
        CategorySaved { id, items },
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    id: Uuid,
    confirmation: Confirmation,
) -> AppResult<(StatusCode, ApiResponse<CategoryList>)> {
    let registry = CategoryRegistry::new(&state.store);
    let outcome = registry.remove(id, confirmation).await;
    if let Ok(Removal::Cancelled) = outcome {
        return Err(AppError::ConfirmationRequired);
    }

    let items = registry.load().await?;
    let meta = Some(Meta::total(items.len()));
    let data = CategoryList { items };
    match outcome {
        Ok(_) => Ok((
            StatusCode::OK,
            ApiResponse::success("Category deleted", data, meta),
        )),
        Err(err) => {
            let err = AppError::Store(err);
            let message = err.to_string();
            Ok((err.status(), ApiResponse::success(message, data, meta)))
        }
    }
}
