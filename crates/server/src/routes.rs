pub mod forms;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health, forms API and OpenAPI docs
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let forms_routes = Router::new()
        .route("/api/forms", post(forms::create).delete(forms::delete_all))
        .route("/api/forms/today", get(forms::today))
        .route("/api/forms/pending", get(forms::pending))
        .route("/api/forms/saved", get(forms::saved))
        .route("/api/forms/:id", put(forms::update));

    Router::new()
        .route("/health", get(health))
        .merge(forms_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        // 响应返回时打点，包含状态码与耗时
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        // 失败（5xx 等）时以 ERROR 记录
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors),
        )
}
