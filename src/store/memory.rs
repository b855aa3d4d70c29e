use std::future::{self, Future};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use super::{NeolightStore, StoreError};
use crate::db::models::{NeolightPatch, NeolightRecord};

/// Process-local store. Records live in insertion order so lookups return the
/// first match, like the table-backed store.
#[derive(Debug, Default)]
pub struct InMemoryNeolightStore {
    records: Mutex<Vec<NeolightRecord>>,
}

impl InMemoryNeolightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NeolightStore for InMemoryNeolightStore {
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<NeolightRecord>, StoreError>> + Send {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let found = records.iter().find(|r| r.name == name).cloned();
        future::ready(Ok(found))
    }

    fn upsert_by_name(
        &self,
        name: &str,
        patch: NeolightPatch,
    ) -> impl Future<Output = Result<NeolightRecord, StoreError>> + Send {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        let record = match records.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                existing.apply(patch);
                existing.clone()
            }
            None => {
                let mut created = NeolightRecord::new(Uuid::new_v4(), name);
                created.apply(patch);
                records.push(created.clone());
                created
            }
        };

        future::ready(Ok(record))
    }
}
