//! sea-orm entities, one per table. The models in [`crate::models`] are
//! aliases of these.

pub mod accounts;
pub mod categories;
pub mod inventory_transactions;
pub mod products;
pub mod sessions;
pub mod users;
