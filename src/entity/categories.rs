use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::CategoryDraft,
    store::{Record, Value, postgres::Persist},
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "categories")]
#[schema(as = Category)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
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
    type Draft = CategoryDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn column_value(&self, column: Column) -> Value {
        match column {
            Column::Id => self.id.into(),
            Column::Name => self.name.clone().into(),
            Column::Description => self.description.clone().into(),
            Column::CreatedAt => self.created_at.into(),
        }
    }

    fn materialize(id: Uuid, created_at: DateTime<Utc>, draft: &CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            created_at,
        }
    }
}

impl Persist for Model {
    fn active_model(id: Uuid, draft: &CategoryDraft) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            ..Default::default()
        }
    }
}
