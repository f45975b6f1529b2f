use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, TransactionType, TransactionView};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Selected product id; empty when nothing was selected.
    #[serde(default)]
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionList {
    #[schema(value_type = Vec<TransactionView>)]
    pub items: Vec<TransactionView>,
}

/// Result of a new transaction: its id plus both lists as re-fetched.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionRecorded {
    pub id: Uuid,
    pub transactions: Vec<TransactionView>,
    pub products: Vec<Product>,
}
