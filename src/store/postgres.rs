use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Order, PaginatorTrait,
    PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{SimpleExpr, Value as SqlValue},
};
use uuid::Uuid;

use super::{
    Column, Direction, Filter, Record, Repository, Select, StoreError, StoreResult, Value,
    table_name,
};

pub type ActiveModelOf<R> = <<R as Record>::Entity as EntityTrait>::ActiveModel;

/// Maps a draft onto the entity's active model for insert and update.
pub trait Persist: Record {
    /// Columns the draft does not carry stay `NotSet`, so database defaults
    /// such as `created_at` apply on insert and survive an update.
    fn active_model(id: Uuid, draft: &Self::Draft) -> ActiveModelOf<Self>;
}

/// PostgreSQL table reached through the sea-orm connection.
pub struct SeaTable<R> {
    conn: DatabaseConnection,
    _row: PhantomData<fn() -> R>,
}

impl<R> SeaTable<R> {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            _row: PhantomData,
        }
    }
}

fn bind(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::String(None),
        Value::Int(v) => SqlValue::from(*v),
        Value::Text(v) => SqlValue::from(v.clone()),
        Value::Uuid(v) => SqlValue::from(*v),
        Value::Decimal(v) => SqlValue::from(*v),
        Value::Timestamp(v) => SqlValue::from(*v),
    }
}

fn condition<C: ColumnTrait>(filter: &Filter<C>) -> SimpleExpr {
    match filter {
        Filter::Eq(col, v) => col.eq(bind(v)),
        Filter::Gte(col, v) => col.gte(bind(v)),
        Filter::Lt(col, v) => col.lt(bind(v)),
        Filter::In(col, values) => col.is_in(values.iter().map(bind)),
        Filter::ColumnLt(left, right) => left.into_expr().lt(right.into_expr()),
    }
}

#[async_trait]
impl<R> Repository<R> for SeaTable<R>
where
    R: Persist + IntoActiveModel<ActiveModelOf<R>> + sea_orm::FromQueryResult,
    ActiveModelOf<R>: Send + Sync,
    Uuid: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    async fn select(&self, query: &Select<Column<R>>) -> StoreResult<Vec<R>> {
        let mut finder = R::Entity::find();
        for filter in &query.filters {
            finder = finder.filter(condition(filter));
        }
        if let Some(order) = &query.order {
            let direction = match order.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            finder = finder.order_by(order.column, direction);
        }
        Ok(finder.limit(query.limit).all(&self.conn).await?)
    }

    async fn count(&self, filters: &[Filter<Column<R>>]) -> StoreResult<u64> {
        let mut finder = R::Entity::find();
        for filter in filters {
            finder = finder.filter(condition(filter));
        }
        Ok(finder.count(&self.conn).await?)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<R>> {
        Ok(R::Entity::find_by_id(id).one(&self.conn).await?)
    }

    async fn insert(&self, draft: &R::Draft) -> StoreResult<R> {
        let model = R::active_model(Uuid::new_v4(), draft);
        Ok(R::Entity::insert(model)
            .exec_with_returning(&self.conn)
            .await?)
    }

    async fn update(&self, id: Uuid, draft: &R::Draft) -> StoreResult<R> {
        match R::Entity::update(R::active_model(id, draft))
            .exec(&self.conn)
            .await
        {
            Ok(row) => Ok(row),
            Err(DbErr::RecordNotUpdated) => Err(StoreError::NotFound {
                table: table_name::<R>(),
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = R::Entity::delete_by_id(id).exec(&self.conn).await?;
        tracing::debug!(
            table = %table_name::<R>(),
            %id,
            rows = result.rows_affected,
            "delete"
        );
        Ok(())
    }
}
