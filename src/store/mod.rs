//! Table-level access to the backing store.
//!
//! Every table is reached through the same [`Repository`] interface,
//! parameterized by the row shape. [`Store`] bundles one repository per table
//! and is constructed once at start-up, then handed to each service.

use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, IdenStatic};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Account, Category, Product, Session, Transaction, UserProfile};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),

    #[error("{table} row {id} not found")]
    NotFound { table: String, id: Uuid },

    #[error("failed to decode row: {0}")]
    Decode(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Type(msg) => StoreError::Decode(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Scalar column value used by filters and drafts.
///
/// Nullable columns in this schema are all text, so `Null` is bound as a
/// text null.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i32),
    Text(String),
    Uuid(Uuid),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Ordering between two values of the same kind. Mixed kinds and nulls
    /// do not compare, which makes every comparison filter on them false.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        v.map(Value::Text).unwrap_or(Value::Null)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// Column of the table a record is stored in.
pub type Column<R> = <<R as Record>::Entity as EntityTrait>::Column;

pub(crate) fn table_name<R: Record>() -> String {
    R::Entity::default().as_str().to_owned()
}

#[derive(Debug, Clone)]
pub enum Filter<C> {
    Eq(C, Value),
    Gte(C, Value),
    Lt(C, Value),
    In(C, Vec<Value>),
    /// `left < right`, both sides being columns of the same row.
    ColumnLt(C, C),
}

impl<C: Copy> Filter<C> {
    /// Evaluates the predicate against a single row.
    pub fn matches<R>(&self, row: &R) -> bool
    where
        R: Record,
        R::Entity: EntityTrait<Column = C>,
    {
        let less = |a: Value, b: &Value| a.compare(b) == Some(Ordering::Less);
        match self {
            Filter::Eq(col, value) => {
                let v = row.column_value(*col);
                v != Value::Null && &v == value
            }
            Filter::Gte(col, value) => row
                .column_value(*col)
                .compare(value)
                .is_some_and(|ord| ord != Ordering::Less),
            Filter::Lt(col, value) => less(row.column_value(*col), value),
            Filter::In(col, values) => values.contains(&row.column_value(*col)),
            Filter::ColumnLt(left, right) => {
                less(row.column_value(*left), &row.column_value(*right))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy)]
pub struct OrderBy<C> {
    pub column: C,
    pub direction: Direction,
}

/// Read request: filters are ANDed, then ordered, then capped.
#[derive(Debug, Clone)]
pub struct Select<C> {
    pub filters: Vec<Filter<C>>,
    pub order: Option<OrderBy<C>>,
    pub limit: Option<u64>,
}

impl<C> Select<C> {
    pub fn all() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter<C>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: C, direction: Direction) -> Self {
        self.order = Some(OrderBy { column, direction });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A sea-orm model as the memory backend sees it.
pub trait Record: Clone + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self>;

    /// Writable columns; `id` and `created_at` are assigned by the store.
    type Draft: Clone + Send + Sync + 'static;

    fn id(&self) -> Uuid;

    fn column_value(&self, column: Column<Self>) -> Value;

    /// Builds the row a store would return after inserting `draft`.
    fn materialize(id: Uuid, created_at: DateTime<Utc>, draft: &Self::Draft) -> Self;
}

#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    async fn select(&self, query: &Select<Column<R>>) -> StoreResult<Vec<R>>;

    async fn count(&self, filters: &[Filter<Column<R>>]) -> StoreResult<u64>;

    async fn find(&self, id: Uuid) -> StoreResult<Option<R>>;

    async fn insert(&self, draft: &R::Draft) -> StoreResult<R>;

    async fn update(&self, id: Uuid, draft: &R::Draft) -> StoreResult<R>;

    /// Deleting an id that does not exist is not an error.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

pub type DynRepository<R> = Arc<dyn Repository<R>>;

/// Client handle for the whole store, one repository per table.
#[derive(Clone)]
pub struct Store {
    pub users: DynRepository<UserProfile>,
    pub categories: DynRepository<Category>,
    pub products: DynRepository<Product>,
    pub transactions: DynRepository<Transaction>,
    pub accounts: DynRepository<Account>,
    pub sessions: DynRepository<Session>,
}

impl Store {
    pub fn postgres(conn: DatabaseConnection) -> Self {
        use postgres::SeaTable;
        Self {
            users: Arc::new(SeaTable::<UserProfile>::new(conn.clone())),
            categories: Arc::new(SeaTable::<Category>::new(conn.clone())),
            products: Arc::new(SeaTable::<Product>::new(conn.clone())),
            transactions: Arc::new(SeaTable::<Transaction>::new(conn.clone())),
            accounts: Arc::new(SeaTable::<Account>::new(conn.clone())),
            sessions: Arc::new(SeaTable::<Session>::new(conn)),
        }
    }

    pub fn in_memory() -> Self {
        memory::MemoryStore::new().handle()
    }
}
