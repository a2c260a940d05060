use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use common::types::Message;
use models::form::{DataType, FormDisplay, NewForm, Validations};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::{
    forms::service::VALUE_REQUIRED,
    pagination::{Page, Pagination},
};
use tracing::{error, info};

use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Entries per page (default 7)
    pub limit: Option<i64>,
}

impl PageQuery {
    fn pagination(&self, default_limit: i64) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
    }
}

pub const INVALID_PAGINATION: &str = "Invalid pagination parameters";

/// Resolve the query string, answering an unparseable `page`/`limit` with a JSON 400.
fn page_params(
    query: Result<Query<PageQuery>, QueryRejection>,
    default_limit: i64,
) -> Result<Pagination, JsonApiError> {
    let Query(q) = query.map_err(|e| {
        info!(err = %e, "pagination query rejected");
        JsonApiError::new(StatusCode::BAD_REQUEST, INVALID_PAGINATION, Some(e.to_string()))
    })?;
    Ok(q.pagination(default_limit))
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormInput {
    #[serde(rename = "type")]
    pub form_type: String,
    pub units: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub data_type: DataType,
    #[serde(default)]
    pub validations: Validations,
}

impl From<CreateFormInput> for NewForm {
    fn from(input: CreateFormInput) -> Self {
        NewForm {
            form_type: input.form_type,
            units: input.units,
            value: input.value,
            date: input.date,
            data_type: input.data_type,
            validations: input.validations,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateFormInput {
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormOutput {
    pub message: String,
    pub updated_entry: FormDisplay,
}

#[utoipa::path(
    post, path = "/api/forms", tag = "forms",
    request_body = crate::openapi::CreateFormRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MessageResponse),
        (status = 500, description = "Create Failed", body = crate::openapi::MessageResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    input: Result<Json<CreateFormInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), JsonApiError> {
    // A body the model cannot accept is reported like any other write failure
    let Json(input) = input.map_err(|e| {
        error!(err = %e, "Error creating entry");
        JsonApiError::internal(e)
    })?;
    state
        .forms
        .create_form(input.into())
        .await
        .map_err(|e| JsonApiError::from_service("Error creating entry", e))?;
    Ok((StatusCode::CREATED, Json(Message::new("Entry created successfully"))))
}

#[utoipa::path(
    put, path = "/api/forms/{id}", tag = "forms",
    params(("id" = String, Path, description = "Form entry ID")),
    request_body = crate::openapi::UpdateFormRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UpdateFormResponse),
        (status = 400, description = "Value is required", body = crate::openapi::MessageResponse),
        (status = 404, description = "Entry not found", body = crate::openapi::MessageResponse),
        (status = 500, description = "Update Failed", body = crate::openapi::MessageResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    input: Result<Json<UpdateFormInput>, JsonRejection>,
) -> Result<Json<UpdateFormOutput>, JsonApiError> {
    // An unreadable body carries no value
    let value = match input {
        Ok(Json(body)) => body.value,
        Err(e) => {
            info!(%id, err = %e, "update body rejected");
            let detail = Some(e.to_string());
            return Err(JsonApiError::new(StatusCode::BAD_REQUEST, VALUE_REQUIRED, detail));
        }
    };
    let updated = state
        .forms
        .update_form(&id, value)
        .await
        .map_err(|e| JsonApiError::from_service("Error updating entry", e))?;
    Ok(Json(UpdateFormOutput {
        message: "Entry updated successfully".into(),
        updated_entry: updated.to_display(),
    }))
}

#[utoipa::path(
    get, path = "/api/forms/today", tag = "forms",
    params(PageQuery),
    responses(
        (status = 200, description = "Entries dated today", body = crate::openapi::FormPage),
        (status = 400, description = "Invalid pagination", body = crate::openapi::MessageResponse),
        (status = 500, description = "List Failed", body = crate::openapi::MessageResponse)
    )
)]
pub async fn today(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<FormDisplay>>, JsonApiError> {
    let pagination = page_params(query, state.default_limit)?;
    let page = state
        .forms
        .todays_forms(pagination)
        .await
        .map_err(|e| JsonApiError::from_service("Error fetching today entries", e))?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/api/forms/pending", tag = "forms",
    params(PageQuery),
    responses(
        (status = 200, description = "Entries without a value", body = crate::openapi::FormPage),
        (status = 400, description = "Invalid pagination", body = crate::openapi::MessageResponse),
        (status = 500, description = "List Failed", body = crate::openapi::MessageResponse)
    )
)]
pub async fn pending(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<FormDisplay>>, JsonApiError> {
    let pagination = page_params(query, state.default_limit)?;
    let page = state
        .forms
        .pending_forms(pagination)
        .await
        .map_err(|e| JsonApiError::from_service("Error fetching pending entries", e))?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/api/forms/saved", tag = "forms",
    params(PageQuery),
    responses(
        (status = 200, description = "Entries with a value", body = crate::openapi::FormPage),
        (status = 400, description = "Invalid pagination", body = crate::openapi::MessageResponse),
        (status = 500, description = "List Failed", body = crate::openapi::MessageResponse)
    )
)]
pub async fn saved(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<FormDisplay>>, JsonApiError> {
    let pagination = page_params(query, state.default_limit)?;
    let page = state
        .forms
        .saved_forms(pagination)
        .await
        .map_err(|e| JsonApiError::from_service("Error fetching saved entries", e))?;
    Ok(Json(page))
}

#[utoipa::path(
    delete, path = "/api/forms", tag = "forms",
    responses(
        (status = 200, description = "All entries deleted", body = crate::openapi::MessageResponse),
        (status = 500, description = "Delete Failed", body = crate::openapi::MessageResponse)
    )
)]
pub async fn delete_all(State(state): State<AppState>) -> Result<Json<Message>, JsonApiError> {
    state
        .forms
        .delete_all_forms()
        .await
        .map_err(|e| JsonApiError::from_service("Error deleting all forms", e))?;
    Ok(Json(Message::new("All forms deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_query_defaults() {
        let q = PageQuery { page: None, limit: None };
        assert_eq!(q.pagination(7), Pagination::new(1, 7));
        let q = PageQuery { page: Some(3), limit: Some(2) };
        assert_eq!(q.pagination(7), Pagination::new(3, 2));
    }

    #[test]
    fn create_input_accepts_client_field_names() {
        let input: CreateFormInput = serde_json::from_value(json!({
            "type": "weight",
            "units": "kg",
            "dataType": "number",
            "validations": {"min": 1, "maxLength": 4}
        }))
        .unwrap();
        assert_eq!(input.form_type, "weight");
        assert_eq!(input.value, None);
        assert_eq!(input.date, None);
        assert_eq!(input.data_type, DataType::Number);
        assert_eq!(input.validations.min, Some(1.0));
        assert_eq!(input.validations.max_length, Some(4));

        let with_date: CreateFormInput = serde_json::from_value(json!({
            "type": "weight", "units": "kg", "dataType": "number",
            "value": 70, "date": "2024-06-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(with_date.value, Some(json!(70)));
        assert_eq!(with_date.date.unwrap().to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn update_input_value_is_optional() {
        let empty: UpdateFormInput = serde_json::from_value(json!({})).unwrap();
        assert!(empty.value.is_none());
        let null: UpdateFormInput = serde_json::from_value(json!({"value": null})).unwrap();
        assert!(null.value.is_none());
    }
}
