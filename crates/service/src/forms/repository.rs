use async_trait::async_trait;
use models::form::{self, NewForm};
use serde_json::Value;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::forms::filter::FormFilter;

/// Storage contract for form entries: create, find-by-id-and-update,
/// count and find by filter, delete everything.
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create(&self, new: NewForm) -> Result<form::Model, ServiceError>;
    /// Replace `value` after checking it against the entry's rules; `None` if `id` is unknown.
    async fn update_value(
        &self,
        id: Uuid,
        value: Value,
    ) -> Result<Option<form::Model>, ServiceError>;
    async fn count(&self, filter: &FormFilter) -> Result<u64, ServiceError>;
    /// Matching entries, newest `date` first.
    async fn find(
        &self,
        filter: &FormFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<form::Model>, ServiceError>;
    async fn delete_all(&self) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmFormRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmFormRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl FormRepository for SeaOrmFormRepository {
    async fn create(&self, new: NewForm) -> Result<form::Model, ServiceError> {
        crate::db::form_service::create_form(&self.db, new).await
    }

    async fn update_value(
        &self,
        id: Uuid,
        value: Value,
    ) -> Result<Option<form::Model>, ServiceError> {
        crate::db::form_service::update_form_value(&self.db, id, value).await
    }

    async fn count(&self, filter: &FormFilter) -> Result<u64, ServiceError> {
        crate::db::form_service::count_forms(&self.db, filter).await
    }

    async fn find(
        &self,
        filter: &FormFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<form::Model>, ServiceError> {
        crate::db::form_service::find_forms(&self.db, filter, skip, limit).await
    }

    async fn delete_all(&self) -> Result<u64, ServiceError> {
        crate::db::form_service::delete_all_forms(&self.db).await
    }
}
