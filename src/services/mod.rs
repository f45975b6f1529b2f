pub mod auth_service;
pub mod category_service;
pub mod dashboard_service;
pub mod ledger_service;
pub mod product_service;
