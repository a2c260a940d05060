use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationsDoc {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub options: Option<Vec<serde_json::Value>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    #[serde(rename = "type")]
    pub form_type: String,
    pub units: String,
    /// Omit or send null to create a pending entry
    #[schema(value_type = Option<Object>)]
    pub value: Option<serde_json::Value>,
    /// RFC 3339 timestamp; defaults to now
    pub date: Option<String>,
    /// `number`, `string` or `boolean`
    pub data_type: String,
    pub validations: Option<ValidationsDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateFormRequest {
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormEntryDoc {
    pub id: String,
    #[serde(rename = "type")]
    pub form_type: String,
    pub date: String,
    #[schema(value_type = Option<Object>)]
    pub value: Option<serde_json::Value>,
    pub units: String,
    pub data_type: String,
    pub validations: ValidationsDoc,
    /// `pending` or `saved`
    pub status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormResponse {
    pub message: String,
    pub updated_entry: FormEntryDoc,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormPage {
    pub total_entries: u64,
    pub total_pages: u64,
    pub current_page: i64,
    pub entries: Vec<FormEntryDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::forms::create,
        crate::routes::forms::update,
        crate::routes::forms::today,
        crate::routes::forms::pending,
        crate::routes::forms::saved,
        crate::routes::forms::delete_all,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            ValidationsDoc,
            CreateFormRequest,
            UpdateFormRequest,
            FormEntryDoc,
            UpdateFormResponse,
            FormPage,
        )
    ),
    tags(
        (name = "health"),
        (name = "forms")
    )
)]
pub struct ApiDoc;
