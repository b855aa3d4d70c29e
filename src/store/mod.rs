//! Device record store: name-keyed point reads and upserts.

pub mod memory;
pub mod postgres;

use std::future::Future;

use crate::db::models::{NeolightPatch, NeolightRecord};

pub use memory::InMemoryNeolightStore;
pub use postgres::PgNeolightStore;

/// Errors raised by a [`NeolightStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected the written values (bad data, constraint violation).
    #[error("{0}")]
    Validation(String),

    /// Any other backend failure: connectivity, pool timeout, internal fault.
    #[error("{0}")]
    Unavailable(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // SQLSTATE class 22 = data exception, 23 = integrity constraint violation.
        if let sqlx::Error::Database(db) = &err {
            if db
                .code()
                .is_some_and(|code| code.starts_with("22") || code.starts_with("23"))
            {
                return Self::Validation(db.message().to_owned());
            }
        }
        Self::Unavailable(err)
    }
}

/// Maps a device name to its latest record.
pub trait NeolightStore: Send + Sync + 'static {
    /// First record whose `name` equals `name`, if any.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<NeolightRecord>, StoreError>> + Send;

    /// Apply `patch` to the record named `name`, creating it if absent, and
    /// return the record as stored afterwards.
    fn upsert_by_name(
        &self,
        name: &str,
        patch: NeolightPatch,
    ) -> impl Future<Output = Result<NeolightRecord, StoreError>> + Send;
}
