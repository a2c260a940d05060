use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde_json::Value;
use uuid::Uuid;
use models::form::{self, Entity as FormEntity, NewForm};
use crate::errors::ServiceError;
use crate::forms::filter::FormFilter;

/// Create a form entry after model validation.
pub async fn create_form(
    db: &DatabaseConnection,
    new: NewForm,
) -> Result<form::Model, ServiceError> {
    // validations are in models::form
    let created = form::create(db, new).await?;
    Ok(created)
}

/// Replace the value of an entry; `None` when the id is unknown.
pub async fn update_form_value(
    db: &DatabaseConnection,
    id: Uuid,
    value: Value,
) -> Result<Option<form::Model>, ServiceError> {
    let updated = form::update_value(db, id, value).await?;
    Ok(updated)
}

/// Count entries matching a filter.
pub async fn count_forms(
    db: &DatabaseConnection,
    filter: &FormFilter,
) -> Result<u64, ServiceError> {
    FormEntity::find()
        .filter(filter.condition())
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Fetch matching entries, newest first, with offset/limit.
pub async fn find_forms(
    db: &DatabaseConnection,
    filter: &FormFilter,
    skip: u64,
    limit: u64,
) -> Result<Vec<form::Model>, ServiceError> {
    let rows = FormEntity::find()
        .filter(filter.condition())
        .order_by_desc(form::Column::Date)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Delete every entry; returns the number of rows removed.
pub async fn delete_all_forms(db: &DatabaseConnection) -> Result<u64, ServiceError> {
    let res = FormEntity::delete_many()
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
