use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{TransactionDraft, TransactionType},
    store::{Record, Value, postgres::Persist},
};

/// Ledger entry. Never updated after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "inventory_transactions")]
#[schema(as = Transaction)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i32,
    pub notes: Option<String>,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    type Entity = Entity;
    type Draft = TransactionDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn column_value(&self, column: Column) -> Value {
        match column {
            Column::Id => self.id.into(),
            Column::ProductId => self.product_id.into(),
            Column::Kind => self.kind.as_str().into(),
            Column::Quantity => self.quantity.into(),
            Column::Notes => self.notes.clone().into(),
            Column::CreatedAt => self.created_at.into(),
        }
    }

    fn materialize(id: Uuid, created_at: DateTime<Utc>, draft: &TransactionDraft) -> Self {
        Self {
            id,
            product_id: draft.product_id,
            kind: draft.kind,
            quantity: draft.quantity,
            notes: draft.notes.clone(),
            created_at,
        }
    }
}

impl Persist for Model {
    fn active_model(id: Uuid, draft: &TransactionDraft) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            product_id: Set(draft.product_id),
            kind: Set(draft.kind),
            quantity: Set(draft.quantity),
            notes: Set(draft.notes.clone()),
            ..Default::default()
        }
    }
}
