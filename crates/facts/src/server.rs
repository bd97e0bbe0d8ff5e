//! Fact HTTP server.
//!
//! Exposes [`FactService`] as a JSON API. Routes are registered explicitly
//! in [`build_router`]; query and path parameters are parsed and validated
//! by each handler rather than inferred, so a missing or malformed
//! parameter always produces the JSON error contract below.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/api/facts` | All facts |
//! | `POST`   | `/api/facts` | Create a fact (201) |
//! | `GET`    | `/api/facts/search?query=` | Title substring search |
//! | `GET`    | `/api/facts/autocomplete?partial=&page=&size=` | Title prefix suggestions |
//! | `GET`    | `/api/facts/random` | One random fact (404 when empty) |
//! | `GET`    | `/api/facts/title/{title}` | Exact title, ignoring case |
//! | `GET`    | `/api/facts/{id}` | Fact by id |
//! | `PUT`    | `/api/facts/{id}` | Replace a fact's fields |
//! | `DELETE` | `/api/facts/{id}` | Delete a fact (204) |
//! | `GET`    | `/health` | Health check (version and fact count) |
//! | `GET`    | `/openapi.json` | OpenAPI document (JSON) |
//! | `GET`    | `/openapi.yaml` | OpenAPI document (YAML) |
//!
//! The OpenAPI document is generated by `utoipa` from the handler
//! annotations in this module.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing required parameter: query" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).

use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use facts_core::{Fact, FactError, FactInput, FactService};

use crate::config::{Config, ServerConfig};
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteFactStore;

/// Default `page` for autocomplete.
const DEFAULT_PAGE: u32 = 0;
/// Default `size` for autocomplete.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    service: FactService,
    max_page_size: u32,
}

impl AppState {
    pub fn new(service: FactService, server: &ServerConfig) -> Self {
        Self {
            service,
            max_page_size: server.max_page_size,
        }
    }
}

/// Starts the fact server on `[server].bind` backed by the configured
/// SQLite database. The schema is applied before binding.
///
/// Runs until Ctrl-C, then drains in-flight requests and closes the pool.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;

    let service = FactService::new(Arc::new(SqliteFactStore::new(pool.clone())));
    let state = AppState::new(service, &config.server);
    let app = build_router(state).layer(cors_layer(&config.server)?);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(
        bind = %config.server.bind,
        db = %config.db.path.display(),
        "facts server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("facts server stopped");
    Ok(())
}

/// Registers every route against `state`. CORS is left to the caller.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/openapi.json", get(handle_openapi_json))
        .route("/openapi.yaml", get(handle_openapi_yaml))
        .route("/api/facts", get(handle_list).post(handle_create))
        .route("/api/facts/search", get(handle_search))
        .route("/api/facts/autocomplete", get(handle_autocomplete))
        .route("/api/facts/random", get(handle_random))
        .route("/api/facts/title/{title}", get(handle_by_title))
        .route(
            "/api/facts/{id}",
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer. An empty origin list allows any origin.
fn cors_layer(server: &ServerConfig) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.cors_allow_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = server
        .cors_allow_origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ============ OpenAPI ============

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Facts API",
        description = "Store, search, and serve short facts"
    ),
    paths(
        handle_health,
        handle_list,
        handle_create,
        handle_search,
        handle_autocomplete,
        handle_random,
        handle_by_title,
        handle_get,
        handle_update,
        handle_delete,
    ),
    components(schemas(Fact, FactInput, ErrorBody, ErrorDetail, HealthResponse)),
    tags(
        (name = "Facts", description = "Fact CRUD, title search, and suggestions"),
        (name = "System", description = "Health checks and API description")
    )
)]
struct ApiDoc;

async fn handle_openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn handle_openapi_yaml() -> Result<Response, AppError> {
    let doc = ApiDoc::openapi().to_yaml().map_err(|e| {
        error!(error = %e, "failed to render OpenAPI YAML");
        internal()
    })?;
    Ok(([(header::CONTENT_TYPE, "application/yaml")], doc).into_response())
}

// ============ Error response ============

#[derive(Serialize, ToSchema)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    #[schema(value_type = String, example = "not_found")]
    code: &'static str,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal() -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: "internal server error".to_string(),
    }
}

impl From<FactError> for AppError {
    fn from(err: FactError) -> Self {
        match err {
            FactError::NotFound(id) => {
                debug!(%id, "fact not found");
                not_found(FactError::NotFound(id).to_string())
            }
            FactError::Validation(message) => bad_request(message),
            FactError::Store(e) => {
                error!(error = ?e, "fact store failure");
                internal()
            }
        }
    }
}

// ============ Parameter parsing ============

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| bad_request(format!("invalid fact id: '{}'", raw)))
}

fn required(name: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| bad_request(format!("missing required parameter: {}", name)))
}

fn parse_count(name: &str, raw: Option<&str>, default: u32) -> Result<u32, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<u32>().map_err(|_| {
            bad_request(format!(
                "{} must be a non-negative integer, got '{}'",
                name, value
            ))
        }),
    }
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| bad_request(e.body_text()))
}

fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value)
        .map_err(|e| bad_request(e.body_text()))
}

fn json_body(payload: Result<Json<FactInput>, JsonRejection>) -> Result<FactInput, AppError> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| bad_request(e.body_text()))
}

// ============ GET /health ============

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    #[schema(value_type = String, example = "ok")]
    status: &'static str,
    #[schema(value_type = String)]
    version: &'static str,
    /// Number of stored facts.
    facts: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
        (status = 500, description = "Store unavailable", body = ErrorBody)
    )
)]
async fn handle_health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let facts = state.service.count_facts().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        facts,
    }))
}

// ============ /api/facts ============

#[utoipa::path(
    get,
    path = "/api/facts",
    tag = "Facts",
    responses((status = 200, description = "All facts in creation order", body = Vec<Fact>))
)]
async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Fact>>, AppError> {
    Ok(Json(state.service.get_all_facts().await?))
}

#[utoipa::path(
    post,
    path = "/api/facts",
    tag = "Facts",
    request_body = FactInput,
    responses(
        (status = 201, description = "Fact created", body = Fact),
        (status = 400, description = "Invalid fact", body = ErrorBody)
    )
)]
async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<FactInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Fact>), AppError> {
    let input = json_body(payload)?;
    let fact = state.service.create_fact(input).await?;
    info!(id = %fact.id, title = %fact.title, "created fact");
    Ok((StatusCode::CREATED, Json(fact)))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/facts/search",
    tag = "Facts",
    params(("query" = String, Query, description = "Substring to find in titles, ignoring case")),
    responses(
        (status = 200, description = "Facts whose title contains the query", body = Vec<Fact>),
        (status = 400, description = "Missing query", body = ErrorBody)
    )
)]
async fn handle_search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Fact>>, AppError> {
    let query = required("query", query_params(params)?.query)?;
    Ok(Json(state.service.search_facts_by_title(&query).await?))
}

#[derive(Debug, Deserialize)]
struct AutocompleteParams {
    partial: Option<String>,
    page: Option<String>,
    size: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/facts/autocomplete",
    tag = "Facts",
    params(
        ("partial" = String, Query, description = "Title prefix, ignoring case"),
        ("page" = Option<u32>, Query, description = "Zero-based page number (default 0)"),
        ("size" = Option<u32>, Query, description = "Titles per page (default 10)")
    ),
    responses(
        (status = 200, description = "Distinct matching titles", body = Vec<String>),
        (status = 400, description = "Missing or invalid parameter", body = ErrorBody)
    )
)]
async fn handle_autocomplete(
    State(state): State<AppState>,
    params: Result<Query<AutocompleteParams>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let params = query_params(params)?;
    let partial = required("partial", params.partial)?;
    let page = parse_count("page", params.page.as_deref(), DEFAULT_PAGE)?;
    let size = parse_count("size", params.size.as_deref(), DEFAULT_PAGE_SIZE)?;
    if size > state.max_page_size {
        return Err(bad_request(format!(
            "size must be at most {}",
            state.max_page_size
        )));
    }

    Ok(Json(
        state.service.autocomplete_titles(&partial, page, size).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/facts/random",
    tag = "Facts",
    responses(
        (status = 200, description = "A random fact", body = Fact),
        (status = 404, description = "No facts stored", body = ErrorBody)
    )
)]
async fn handle_random(State(state): State<AppState>) -> Result<Json<Fact>, AppError> {
    state
        .service
        .get_random_fact()
        .await?
        .map(Json)
        .ok_or_else(|| not_found("no facts available"))
}

#[utoipa::path(
    get,
    path = "/api/facts/title/{title}",
    tag = "Facts",
    params(("title" = String, Path, description = "Exact title, ignoring case")),
    responses(
        (status = 200, description = "Newest fact with this title", body = Fact),
        (status = 400, description = "Malformed path segment", body = ErrorBody),
        (status = 404, description = "No fact with this title", body = ErrorBody)
    )
)]
async fn handle_by_title(
    State(state): State<AppState>,
    title: Result<Path<String>, PathRejection>,
) -> Result<Json<Fact>, AppError> {
    let title = path_param(title)?;
    state
        .service
        .find_fact_by_title_ignore_case(&title)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(format!("no fact titled '{}'", title)))
}

#[utoipa::path(
    get,
    path = "/api/facts/{id}",
    tag = "Facts",
    params(("id" = Uuid, Path, description = "Fact id")),
    responses(
        (status = 200, description = "The fact", body = Fact),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such fact", body = ErrorBody)
    )
)]
async fn handle_get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Fact>, AppError> {
    let id = parse_id(&path_param(id)?)?;
    state
        .service
        .get_fact_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(format!("fact not found with id: {}", id)))
}

#[utoipa::path(
    put,
    path = "/api/facts/{id}",
    tag = "Facts",
    params(("id" = Uuid, Path, description = "Fact id")),
    request_body = FactInput,
    responses(
        (status = 200, description = "Updated fact", body = Fact),
        (status = 400, description = "Malformed id or invalid fact", body = ErrorBody),
        (status = 404, description = "No such fact", body = ErrorBody)
    )
)]
async fn handle_update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<FactInput>, JsonRejection>,
) -> Result<Json<Fact>, AppError> {
    let id = parse_id(&path_param(id)?)?;
    let input = json_body(payload)?;
    let fact = state.service.update_fact(id, input).await?;
    info!(%id, "updated fact");
    Ok(Json(fact))
}

#[utoipa::path(
    delete,
    path = "/api/facts/{id}",
    tag = "Facts",
    params(("id" = Uuid, Path, description = "Fact id")),
    responses(
        (status = 204, description = "Fact deleted"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such fact", body = ErrorBody)
    )
)]
async fn handle_delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&path_param(id)?)?;
    state.service.delete_fact(id).await?;
    info!(%id, "deleted fact");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use facts_core::store::memory::InMemoryFactStore;
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    fn test_app() -> Router {
        let service = FactService::new(Arc::new(InMemoryFactStore::new()));
        let server = ServerConfig {
            max_page_size: 50,
            ..ServerConfig::default()
        };
        build_router(AppState::new(service, &server))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, title: &str) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/facts",
            Some(json!({ "title": title, "body": "B", "tag": "trivia" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["facts"], 0);
    }

    #[tokio::test]
    async fn test_list_starts_empty() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/facts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_returns_full_fact_and_ignores_client_id() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/facts",
            Some(json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "title": "T1",
                "body": "B1",
                "tag": "trivia",
                "sourceUrl": "https://example.com"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(body["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(body["title"], "T1");
        assert_eq!(body["sourceUrl"], "https://example.com");
        assert!(body["createdAt"].is_string());
        assert_eq!(body["createdAt"], body["updatedAt"]);
    }

    #[tokio::test]
    async fn test_create_validation_errors_are_bad_request() {
        let app = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/facts",
            Some(json!({ "title": "", "body": "B", "tag": "t" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");

        let (status, body) = send(&app, "POST", "/api/facts", Some(json!({ "title": "T" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_title_lookup_is_case_insensitive() {
        let app = test_app();
        let created = create(&app, "T1").await;

        let (status, body) = send(&app, "GET", "/api/facts/title/t1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);

        let (status, body) = send(&app, "GET", "/api/facts/title/missing%20title", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let app = test_app();
        create(&app, "Octopus Facts").await;

        let (status, body) = send(&app, "GET", "/api/facts/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("query"));

        let (status, body) = send(&app, "GET", "/api/facts/search?query=octo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/api/facts/search?query=zebra", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_autocomplete_paging_and_validation() {
        let app = test_app();
        for title in ["Octopus Facts", "Ocean Trivia", "Oceanography"] {
            create(&app, title).await;
        }

        let (status, body) =
            send(&app, "GET", "/api/facts/autocomplete?partial=Oc&page=0&size=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Octopus Facts", "Ocean Trivia"]));

        let (status, body) =
            send(&app, "GET", "/api/facts/autocomplete?partial=Oc&page=1&size=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Oceanography"]));

        let (status, body) = send(&app, "GET", "/api/facts/autocomplete?partial=oc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        for bad in [
            "/api/facts/autocomplete",
            "/api/facts/autocomplete?partial=Oc&page=-1",
            "/api/facts/autocomplete?partial=Oc&size=abc",
            "/api/facts/autocomplete?partial=Oc&size=51",
            "/api/facts/autocomplete?partial=Oc&size=%2010",
            "/api/facts/autocomplete?partial=Oc&page=1%20",
        ] {
            let (status, body) = send(&app, "GET", bad, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be rejected", bad);
            assert_eq!(body["error"]["code"], "bad_request");
        }
    }

    #[tokio::test]
    async fn test_random_is_404_when_empty() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/facts/random", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");

        let created = create(&app, "Only").await;
        let (status, body) = send(&app, "GET", "/api/facts/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_update_get_delete_lifecycle() {
        let app = test_app();
        let created = create(&app, "Before").await;
        let uri = format!("/api/facts/{}", created["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({ "title": "After", "body": "B2", "tag": "science" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "After");
        assert_eq!(body["createdAt"], created["createdAt"]);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tag"], "science");

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mutating_missing_or_malformed_ids() {
        let app = test_app();
        let missing = format!("/api/facts/{}", Uuid::new_v4());
        let payload = json!({ "title": "T", "body": "B", "tag": "t" });

        let (status, body) = send(&app, "PUT", &missing, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("fact not found with id"));

        let (status, _) = send(&app, "DELETE", &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "GET", "/api/facts/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_undecodable_path_segment_uses_error_contract() {
        let app = test_app();
        for uri in ["/api/facts/title/%FF", "/api/facts/%FF%FE"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be rejected", uri);
            assert_eq!(body["error"]["code"], "bad_request");
            assert!(body["error"]["message"].is_string());
        }

        let (status, body) = send(&app, "DELETE", "/api/facts/%C3%28", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_openapi_document_describes_routes() {
        let app = test_app();
        let (status, doc) = send(&app, "GET", "/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["info"]["title"], "Facts API");

        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/health",
            "/api/facts",
            "/api/facts/search",
            "/api/facts/autocomplete",
            "/api/facts/random",
            "/api/facts/title/{title}",
            "/api/facts/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc["paths"]["/api/facts/{id}"]["delete"].is_object());

        let schema = &doc["components"]["schemas"]["Fact"]["properties"];
        assert!(schema["sourceUrl"].is_object());
        assert!(schema["createdAt"].is_object());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/openapi.yaml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/yaml"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let yaml = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(yaml.contains("/api/facts/autocomplete"));
    }
}
