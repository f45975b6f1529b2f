use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{accounts, categories, inventory_transactions, products, sessions, users};

pub type Category = categories::Model;
pub type Product = products::Model;
pub type Transaction = inventory_transactions::Model;
pub type UserProfile = users::Model;
pub type Account = accounts::Model;
pub type Session = sessions::Model;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub sku: String,
    pub quantity: i32,
    pub min_quantity: i32,
    pub unit_price: Decimal,
}

/// Direction of a stock movement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TransactionType {
    #[sea_orm(string_value = "IN")]
    #[serde(rename = "IN")]
    In,
    #[sea_orm(string_value = "OUT")]
    #[serde(rename = "OUT")]
    Out,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub product_id: Uuid,
    pub kind: TransactionType,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductSummary {
    pub name: String,
    pub sku: String,
}

/// Ledger entry joined with the display fields of its product.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TransactionView {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfileDraft {
    pub email: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    pub account_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
