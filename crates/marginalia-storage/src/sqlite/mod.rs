//! SQLite-backed storage implementation.

mod comments;
mod domain;
mod queries;
mod readings;
pub mod schema;
mod select;
mod store;
mod subscriptions;
mod tags;
mod targets;
mod transaction;
mod updates;
mod users;
mod votes;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::DomainStore;
pub use store::SqliteStore;
