use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::ProductDraft,
    store::{Record, Value, postgres::Persist},
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "products")]
#[schema(as = Product)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub sku: String,
    pub quantity: i32,
    pub min_quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    #[schema(value_type = String)]
    pub unit_price: Decimal,
}

impl Model {
    /// Same predicate the dashboard counts with.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_quantity
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::inventory_transactions::Entity")]
    InventoryTransactions,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::inventory_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    type Entity = Entity;
    type Draft = ProductDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn column_value(&self, column: Column) -> Value {
        match column {
            Column::Id => self.id.into(),
            Column::Name => self.name.clone().into(),
            Column::Description => self.description.clone().into(),
            Column::CategoryId => self.category_id.into(),
            Column::Sku => self.sku.clone().into(),
            Column::Quantity => self.quantity.into(),
            Column::MinQuantity => self.min_quantity.into(),
            Column::UnitPrice => self.unit_price.into(),
        }
    }

    fn materialize(id: Uuid, _created_at: DateTime<Utc>, draft: &ProductDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            category_id: draft.category_id,
            sku: draft.sku.clone(),
            quantity: draft.quantity,
            min_quantity: draft.min_quantity,
            unit_price: draft.unit_price,
        }
    }
}

impl Persist for Model {
    fn active_model(id: Uuid, draft: &ProductDraft) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            category_id: Set(draft.category_id),
            sku: Set(draft.sku.clone()),
            quantity: Set(draft.quantity),
            min_quantity: Set(draft.min_quantity),
            unit_price: Set(draft.unit_price),
        }
    }
}
