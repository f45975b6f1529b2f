use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::UserProfileDraft,
    store::{Record, Value, postgres::Persist},
};

/// Application-level user row provisioned on sign-up.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "users")]
#[schema(as = UserProfile)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub user_id: Uuid,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::UserId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    type Entity = Entity;
    type Draft = UserProfileDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn column_value(&self, column: Column) -> Value {
        match column {
            Column::Id => self.id.into(),
            Column::Email => self.email.clone().into(),
            Column::UserId => self.user_id.into(),
            Column::CreatedAt => self.created_at.into(),
        }
    }

    fn materialize(id: Uuid, created_at: DateTime<Utc>, draft: &UserProfileDraft) -> Self {
        Self {
            id,
            email: draft.email.clone(),
            user_id: draft.user_id,
            created_at,
        }
    }
}

impl Persist for Model {
    fn active_model(id: Uuid, draft: &UserProfileDraft) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            email: Set(draft.email.clone()),
            user_id: Set(draft.user_id),
            ..Default::default()
        }
    }
}
