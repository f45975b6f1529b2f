use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};

use crate::{
    models::AccountDraft,
    store::{Record, Value, postgres::Persist},
};

/// Sign-in credentials held by the session service.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    type Entity = Entity;
    type Draft = AccountDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn column_value(&self, column: Column) -> Value {
        match column {
            Column::Id => self.id.into(),
            Column::Email => self.email.clone().into(),
            Column::PasswordHash => self.password_hash.clone().into(),
            Column::CreatedAt => self.created_at.into(),
        }
    }

    fn materialize(id: Uuid, created_at: DateTime<Utc>, draft: &AccountDraft) -> Self {
        Self {
            id,
            email: draft.email.clone(),
            password_hash: draft.password_hash.clone(),
            created_at,
        }
    }
}

impl Persist for Model {
    fn active_model(id: Uuid, draft: &AccountDraft) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            email: Set(draft.email.clone()),
            password_hash: Set(draft.password_hash.clone()),
            ..Default::default()
        }
    }
}
