use std::sync::Arc;

use models::form::{self, normalize_value, FormDisplay, NewForm};
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::forms::filter::FormFilter;
use crate::forms::repository::FormRepository;
use crate::pagination::{total_pages, Page, Pagination, MAX_LIMIT};

pub const VALUE_REQUIRED: &str = "Value is required";

/// Application service behind the forms endpoints.
/// Storage is abstracted by [`FormRepository`] so the same rules run over
/// Postgres and the in-memory store.
#[derive(Clone)]
pub struct FormService {
    repo: Arc<dyn FormRepository>,
    max_limit: i64,
}

impl FormService {
    pub fn new(repo: Arc<dyn FormRepository>) -> Self { Self { repo, max_limit: MAX_LIMIT } }

    pub fn with_max_limit(mut self, max_limit: i64) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    #[instrument(skip(self, new), fields(form_type = %new.form_type))]
    pub async fn create_form(&self, new: NewForm) -> Result<form::Model, ServiceError> {
        let created = self.repo.create(new).await?;
        info!(id = %created.id, pending = created.is_pending(), "created form entry");
        Ok(created)
    }

    /// Replace the value of one entry. A missing value is rejected before the id is looked at;
    /// an id that is not a UUID cannot match anything and reads as not found.
    #[instrument(skip(self, value))]
    pub async fn update_form(
        &self,
        id: &str,
        value: Option<Value>,
    ) -> Result<form::Model, ServiceError> {
        let value = normalize_value(value)
            .ok_or_else(|| ServiceError::Validation(VALUE_REQUIRED.into()))?;
        let id = Uuid::parse_str(id).map_err(|_| ServiceError::not_found("entry"))?;
        let updated = self
            .repo
            .update_value(id, value)
            .await?
            .ok_or_else(|| ServiceError::not_found("entry"))?;
        info!(id = %updated.id, "updated form entry");
        Ok(updated)
    }

    /// Count, then fetch one window sorted by date descending.
    pub async fn paginate(
        &self,
        filter: &FormFilter,
        pagination: Pagination,
    ) -> Result<Page<FormDisplay>, ServiceError> {
        let p = pagination.normalize(self.max_limit);
        let skip = p.skip();
        debug!(?filter, page = p.page, limit = p.limit, skip, "paginate forms");
        let total_entries = self.repo.count(filter).await?;
        let entries = self.repo.find(filter, skip, p.limit as u64).await?;
        Ok(Page {
            total_entries,
            total_pages: total_pages(total_entries, p.limit),
            current_page: p.page,
            entries: entries.iter().map(form::Model::to_display).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn todays_forms(
        &self,
        pagination: Pagination,
    ) -> Result<Page<FormDisplay>, ServiceError> {
        self.paginate(&FormFilter::today(), pagination).await
    }

    #[instrument(skip(self))]
    pub async fn pending_forms(
        &self,
        pagination: Pagination,
    ) -> Result<Page<FormDisplay>, ServiceError> {
        self.paginate(&FormFilter::Pending, pagination).await
    }

    #[instrument(skip(self))]
    pub async fn saved_forms(
        &self,
        pagination: Pagination,
    ) -> Result<Page<FormDisplay>, ServiceError> {
        self.paginate(&FormFilter::Saved, pagination).await
    }

    /// Irreversible; removes every entry.
    #[instrument(skip(self))]
    pub async fn delete_all_forms(&self) -> Result<u64, ServiceError> {
        let removed = self.repo.delete_all().await?;
        info!(removed, "deleted all form entries");
        Ok(removed)
    }
}
