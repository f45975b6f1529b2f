use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};

use crate::{
    models::SessionDraft,
    store::{Record, Value, postgres::Persist},
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub expires_at: DateTime<Utc>,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
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
    type Draft = SessionDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn column_value(&self, column: Column) -> Value {
        match column {
            Column::Id => self.id.into(),
            Column::AccountId => self.account_id.into(),
            Column::ExpiresAt => self.expires_at.into(),
            Column::CreatedAt => self.created_at.into(),
        }
    }

    fn materialize(id: Uuid, created_at: DateTime<Utc>, draft: &SessionDraft) -> Self {
        Self {
            id,
            account_id: draft.account_id,
            expires_at: draft.expires_at,
            created_at,
        }
    }
}

impl Persist for Model {
    fn active_model(id: Uuid, draft: &SessionDraft) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            account_id: Set(draft.account_id),
            expires_at: Set(draft.expires_at),
            ..Default::default()
        }
    }
}
