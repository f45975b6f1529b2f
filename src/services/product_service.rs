use uuid::Uuid;

use crate::{
    dto::products::{ProductList, ProductSaved, SaveProductRequest},
    entity::products,
    error::{AppError, AppResult},
    models::{Category, Product, ProductDraft},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{Direction, DynRepository, Select, Store, StoreResult},
    validation::{self, ValidationError},
};

#[derive(Clone)]
pub struct ProductRegistry {
    products: DynRepository<Product>,
    categories: DynRepository<Category>,
}

impl ProductRegistry {
    pub fn new(store: &Store) -> Self {
        Self {
            products: store.products.clone(),
            categories: store.categories.clone(),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        self.products
            .select(&Select::all().order_by(products::Column::Name, Direction::Asc))
            .await
    }

    /// [`list`](Self::list) for a view: failures are logged and turned into
    /// the page banner.
    pub async fn load(&self) -> AppResult<Vec<Product>> {
        self.list().await.map_err(|err| {
            tracing::error!(error = %err, "error fetching products");
            AppError::Load {
                banner: "Failed to load products",
                source: err,
            }
        })
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.products.find(id).await?.ok_or(AppError::NotFound)
    }

    /// Updates every field when `id` is given, inserts otherwise. The
    /// category must be one of the stored categories.
    pub async fn upsert(&self, id: Option<Uuid>, form: SaveProductRequest) -> AppResult<Uuid> {
        let draft = product_draft(form)?;
        if self.categories.find(draft.category_id).await?.is_none() {
            return Err(ValidationError::MissingCategory.into());
        }
        let saved = match id {
            Some(id) => self.products.update(id, &draft).await?,
            None => self.products.insert(&draft).await?,
        };
        tracing::info!(
            product_id = %saved.id,
            sku = %saved.sku,
            low_stock = saved.is_low_stock(),
            "product saved"
        );
        Ok(saved.id)
    }
}

/// Field checks the product form performs before submitting. The category
/// comes first: an empty selection is the common mistake.
pub fn product_draft(form: SaveProductRequest) -> Result<ProductDraft, ValidationError> {
    let category_id = Uuid::parse_str(form.category_id.trim())
        .map_err(|_| ValidationError::MissingCategory)?;

    validation::required("Name", &form.name)?;
    validation::required("SKU", &form.sku)?;
    validation::non_negative("Quantity", form.quantity)?;
    validation::non_negative("Min quantity", form.min_quantity)?;
    validation::non_negative_decimal("Unit price", form.unit_price)?;

    Ok(ProductDraft {
        name: form.name.trim().to_string(),
        description: validation::optional_text(form.description),
        category_id,
        sku: form.sku.trim().to_string(),
        quantity: form.quantity,
        min_quantity: form.min_quantity,
        unit_price: form.unit_price,
    })
}

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items = ProductRegistry::new(&state.store).load().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = ProductRegistry::new(&state.store).get(id).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn save_product(
    state: &AppState,
    id: Option<Uuid>,
    payload: SaveProductRequest,
) -> AppResult<ApiResponse<ProductSaved>> {
    let registry = ProductRegistry::new(&state.store);
    let id = registry.upsert(id, payload).await?;
    let (message, items) = match registry.load().await {
        Ok(items) => ("Product saved".to_string(), items),
        Err(err) => (err.to_string(), Vec::new()),
    };
    Ok(ApiResponse::success(
        message,
        ProductSaved { id, items },
        Some(Meta::empty()),
    ))
}
