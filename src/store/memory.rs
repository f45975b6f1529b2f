//! In-process store backend.
//!
//! Serves the application when no database is configured and lets tests
//! observe exactly which table operations a flow issued.

use std::{
    cmp::Ordering,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    Column, Direction, Filter, Record, Repository, Select, Store, StoreError, StoreResult, Value,
    table_name,
};
use crate::models::{Account, Category, Product, Session, Transaction, UserProfile};

#[derive(Debug, Default)]
struct CallCounters {
    select: AtomicUsize,
    count: AtomicUsize,
    insert: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
}

/// Number of operations a table has received, failed ones included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub select: usize,
    pub count: usize,
    pub insert: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.select + self.count + self.insert + self.update + self.delete
    }
}

/// Kind of table operation, for targeting an injected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

struct Failure {
    on: Option<Operation>,
    message: String,
}

struct TableState<R> {
    rows: Vec<R>,
    failure: Option<Failure>,
}

pub struct MemoryTable<R> {
    state: Mutex<TableState<R>>,
    calls: CallCounters,
}

impl<R: Record> Default for MemoryTable<R> {
    fn default() -> Self {
        Self {
            state: Mutex::new(TableState {
                rows: Vec::new(),
                failure: None,
            }),
            calls: CallCounters::default(),
        }
    }
}

impl<R: Record> MemoryTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            select: self.calls.select.load(AtomicOrdering::SeqCst),
            count: self.calls.count.load(AtomicOrdering::SeqCst),
            insert: self.calls.insert.load(AtomicOrdering::SeqCst),
            update: self.calls.update.load(AtomicOrdering::SeqCst),
            delete: self.calls.delete.load(AtomicOrdering::SeqCst),
        }
    }

    /// Makes the next operation on this table fail with `message`.
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(Failure {
            on: None,
            message: message.into(),
        });
    }

    /// Like [`fail_next`](Self::fail_next), but only the next `operation`
    /// fails; other operations pass until then.
    pub async fn fail_next_on(&self, operation: Operation, message: impl Into<String>) {
        self.state.lock().await.failure = Some(Failure {
            on: Some(operation),
            message: message.into(),
        });
    }

    /// Inserts a fully formed row without counting a call.
    pub async fn seed(&self, row: R) {
        self.state.lock().await.rows.push(row);
    }

    pub async fn rows(&self) -> Vec<R> {
        self.state.lock().await.rows.clone()
    }

    fn check(state: &mut TableState<R>, operation: Operation) -> StoreResult<()> {
        let hit = state
            .failure
            .as_ref()
            .is_some_and(|f| f.on.is_none_or(|on| on == operation));
        match state.failure.take_if(|_| hit) {
            Some(failure) => Err(StoreError::Backend(failure.message)),
            None => Ok(()),
        }
    }
}

/// Creation time of a stored row, for tables that keep one.
fn created_at_of<R: Record>(row: &R) -> DateTime<Utc> {
    match Column::<R>::from_str("created_at").map(|col| row.column_value(col)) {
        Ok(Value::Timestamp(ts)) => ts,
        _ => Utc::now(),
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, AtomicOrdering::SeqCst);
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryTable<R> {
    async fn select(&self, query: &Select<Column<R>>) -> StoreResult<Vec<R>> {
        bump(&self.calls.select);
        let mut state = self.state.lock().await;
        Self::check(&mut state, Operation::Select)?;

        let mut rows: Vec<R> = state
            .rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| f.matches(*row)))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            // Stable sort, so ties keep insertion order.
            rows.sort_by(|a, b| {
                let ord = a
                    .column_value(order.column)
                    .compare(&b.column_value(order.column))
                    .unwrap_or(Ordering::Equal);
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn count(&self, filters: &[Filter<Column<R>>]) -> StoreResult<u64> {
        bump(&self.calls.count);
        let mut state = self.state.lock().await;
        Self::check(&mut state, Operation::Count)?;

        let n = state
            .rows
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(*row)))
            .count();
        Ok(n as u64)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<R>> {
        bump(&self.calls.select);
        let mut state = self.state.lock().await;
        Self::check(&mut state, Operation::Select)?;

        Ok(state.rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn insert(&self, draft: &R::Draft) -> StoreResult<R> {
        bump(&self.calls.insert);
        let mut state = self.state.lock().await;
        Self::check(&mut state, Operation::Insert)?;

        let row = R::materialize(Uuid::new_v4(), Utc::now(), draft);
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, draft: &R::Draft) -> StoreResult<R> {
        bump(&self.calls.update);
        let mut state = self.state.lock().await;
        Self::check(&mut state, Operation::Update)?;

        let slot = state
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                table: table_name::<R>(),
                id,
            })?;
        let created_at = created_at_of(slot);
        *slot = R::materialize(id, created_at, draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        bump(&self.calls.delete);
        let mut state = self.state.lock().await;
        Self::check(&mut state, Operation::Delete)?;

        state.rows.retain(|row| row.id() != id);
        Ok(())
    }
}

/// Typed handles on every in-memory table, kept so callers can inspect
/// rows and call counts after handing out the [`Store`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub users: Arc<MemoryTable<UserProfile>>,
    pub categories: Arc<MemoryTable<Category>>,
    pub products: Arc<MemoryTable<Product>>,
    pub transactions: Arc<MemoryTable<Transaction>>,
    pub accounts: Arc<MemoryTable<Account>>,
    pub sessions: Arc<MemoryTable<Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Store {
        Store {
            users: self.users.clone(),
            categories: self.categories.clone(),
            products: self.products.clone(),
            transactions: self.transactions.clone(),
            accounts: self.accounts.clone(),
            sessions: self.sessions.clone(),
        }
    }
}
