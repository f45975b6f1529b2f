use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{ChangePasswordRequest, SessionInfo, SessionToken, SignInRequest, SignUpRequest},
        categories::{CategoryList, CategorySaved, SaveCategoryRequest},
        dashboard::DashboardStats,
        products::{ProductList, ProductSaved, SaveProductRequest},
        transactions::{CreateTransactionRequest, TransactionList, TransactionRecorded},
    },
    models::{Category, Product, ProductSummary, TransactionType, TransactionView, UserProfile},
    response::{ApiResponse, Meta},
    routes::{auth, categories, dashboard, health, params, products, transactions},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::sign_up,
        auth::sign_in,
        auth::sign_out,
        auth::session,
        auth::change_password,
        dashboard::dashboard,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        transactions::list_transactions,
        transactions::stock_options,
        transactions::create_transaction,
        transactions::delete_transaction
    ),
    components(
        schemas(
            UserProfile,
            Category,
            Product,
            ProductSummary,
            TransactionType,
            TransactionView,
            SignUpRequest,
            SignInRequest,
            ChangePasswordRequest,
            SessionToken,
            SessionInfo,
            DashboardStats,
            SaveProductRequest,
            ProductList,
            ProductSaved,
            SaveCategoryRequest,
            CategoryList,
            CategorySaved,
            CreateTransactionRequest,
            TransactionList,
            TransactionRecorded,
            params::LedgerQuery,
            params::ConfirmQuery,
            Meta,
            ApiResponse<DashboardStats>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CategoryList>,
            ApiResponse<TransactionList>,
            ApiResponse<TransactionRecorded>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Sign-up, sign-in and session endpoints"),
        (name = "Dashboard", description = "Aggregate counts"),
        (name = "Products", description = "Product registry"),
        (name = "Categories", description = "Category registry"),
        (name = "Transactions", description = "Stock movement ledger"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
