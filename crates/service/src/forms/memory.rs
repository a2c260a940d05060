use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use models::form::{self, normalize_value, NewForm};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::forms::filter::FormFilter;
use crate::forms::repository::FormRepository;

/// Process-local store used by tests and `FORMS_STORE=memory`.
#[derive(Default)]
pub struct InMemoryFormRepository {
    entries: Mutex<HashMap<Uuid, form::Model>>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self { Self::default() }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<Uuid, form::Model>>, ServiceError> {
        self.entries.lock().map_err(|_| ServiceError::Db("in-memory form store poisoned".into()))
    }
}

fn to_usize(n: u64) -> usize { usize::try_from(n).unwrap_or(usize::MAX) }

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn create(&self, new: NewForm) -> Result<form::Model, ServiceError> {
        let entry = new.into_model(Uuid::new_v4(), Utc::now())?;
        self.entries()?.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_value(
        &self,
        id: Uuid,
        value: Value,
    ) -> Result<Option<form::Model>, ServiceError> {
        let mut entries = self.entries()?;
        let Some(entry) = entries.get_mut(&id) else { return Ok(None) };
        let value = normalize_value(Some(value));
        if let Some(v) = &value {
            entry.check_value(v)?;
        }
        entry.value = value;
        entry.updated_at = Utc::now().into();
        Ok(Some(entry.clone()))
    }

    async fn count(&self, filter: &FormFilter) -> Result<u64, ServiceError> {
        let entries = self.entries()?;
        Ok(entries.values().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn find(
        &self,
        filter: &FormFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<form::Model>, ServiceError> {
        let entries = self.entries()?;
        let mut matching: Vec<&form::Model> =
            entries.values().filter(|e| filter.matches(e)).collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matching.into_iter().skip(to_usize(skip)).take(to_usize(limit)).cloned().collect())
    }

    async fn delete_all(&self) -> Result<u64, ServiceError> {
        let mut entries = self.entries()?;
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}
