//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{RouteDraft, now_local};
use crate::store::{AppData, RouteStore, StoreError, Theme, UploadError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Largest accepted schedule image upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the application router.
///
/// Uploaded images are served from the state's asset directory under `/static`.
pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(state.assets.root());

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/clock", get(clock))
        .route(
            "/schedule",
            post(upload_schedule).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/routes", post(add_route_form))
        .route("/routes/delete", post(delete_route_form))
        .route("/routes/next", get(next_departures))
        .route("/routes/compare", get(compare_routes))
        .route("/settings", post(save_settings_form))
        .route("/api/routes", get(list_routes).post(add_route_json))
        .route("/api/routes/:name", delete(delete_route_json))
        .route("/api/settings", put(save_settings_json))
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Current local time, polled by the page header.
async fn clock() -> String {
    format_clock(&now_local())
}

/// Index page.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let store = state.store.lock().await;
    render_index(store.data(), None)
}

/// Render the index page, optionally with a notice from the last action.
fn render_index(data: &AppData, notice: Option<Notice>) -> Result<Html<String>, AppError> {
    let html = IndexTemplate::new(data, notice, now_local()).render()?;
    Ok(Html(html))
}

/// Notice shown when the document couldn't be written.
///
/// The in-memory change stays applied.
fn save_failed(e: StoreError) -> Notice {
    error!(error = %e, "failed to save document");
    Notice::negative(format!("Save failed: {e}"))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

// ============================================================================
// Form handlers (re-render the index page with a notice)
// ============================================================================

/// Add or replace a route from the route form.
async fn add_route_form(
    State(state): State<AppState>,
    Form(draft): Form<RouteDraft>,
) -> Result<Html<String>, AppError> {
    let mut store = state.store.lock().await;

    let notice = match draft.validate() {
        Ok((name, route)) => match store.add_route(&name, route) {
            Ok(()) => Notice::positive(format!("Route \"{name}\" saved")),
            Err(e) => save_failed(e),
        },
        Err(e) => {
            warn!(error = %e, "rejected route");
            Notice::warning(format!(
                "Enter a route name and valid times (HH:MM): {e}"
            ))
        }
    };

    render_index(store.data(), Some(notice))
}

/// Delete a route from its card's delete button.
async fn delete_route_form(
    State(state): State<AppState>,
    Form(form): Form<DeleteRouteForm>,
) -> Result<Html<String>, AppError> {
    let mut store = state.store.lock().await;

    let (_, saved) = store.delete_route(&form.name);
    let notice = match saved {
        Ok(()) => Notice::warning(format!("Route \"{}\" deleted", form.name)),
        Err(e) => save_failed(e),
    };

    render_index(store.data(), Some(notice))
}

/// Save the theme from the settings form.
async fn save_settings_form(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<Html<String>, AppError> {
    let mut store = state.store.lock().await;

    let notice = match Theme::parse(&form.theme) {
        Some(theme) => match store.set_theme(theme) {
            Ok(()) => Notice::positive("Settings saved."),
            Err(e) => save_failed(e),
        },
        None => Notice::warning(format!("Unknown theme: {}", form.theme)),
    };

    render_index(store.data(), Some(notice))
}

/// Upload or replace the class schedule image.
///
/// Expects a multipart body with a `file` part. Browsers get the index page
/// back with a notice; other clients get JSON.
async fn upload_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::BadRequest {
        message: format!("Invalid upload: {e}"),
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| AppError::BadRequest {
            message: format!("Invalid upload: {e}"),
        })?;
        upload = Some((file_name, content_type, bytes));
        break;
    }

    let (file_name, content_type, bytes) = upload.ok_or_else(|| AppError::BadRequest {
        message: "missing \"file\" field".to_string(),
    })?;

    let stored = state
        .assets
        .store_image(&file_name, content_type.as_deref(), &bytes);

    let mut store = state.store.lock().await;

    if accepts_html(&headers) {
        let notice = match stored {
            Ok(safe) => match store.set_schedule_image(&safe) {
                Ok(()) => {
                    info!(file = %safe, "schedule image updated");
                    Notice::positive("Schedule updated!")
                }
                Err(e) => save_failed(e),
            },
            Err(e) => {
                warn!(error = %e, "rejected upload");
                Notice::negative(format!("Upload failed: {e}"))
            }
        };
        return Ok(render_index(store.data(), Some(notice))?.into_response());
    }

    let safe = stored?;
    let result = store.set_schedule_image(&safe);
    if let Err(e) = &result {
        error!(error = %e, "failed to save document");
    }
    info!(file = %safe, "schedule image updated");

    Ok(Json(UploadResponse {
        url: format!("/static/{safe}"),
        file_name: safe,
        result: MutationResponse::from_save(result),
    })
    .into_response())
}

// ============================================================================
// Departure queries (HTML fragment or JSON)
// ============================================================================

/// Look up a route and compute its next departures.
fn upcoming_for(
    store: &RouteStore,
    name: &str,
    n: usize,
) -> Result<(DeparturesView, NextDeparturesResponse), AppError> {
    let route = store.route(name).ok_or_else(|| AppError::NotFound {
        message: format!("Unknown route: {name}"),
    })?;
    let departures = route.upcoming(n, now_local());

    Ok((
        DeparturesView::from_route(name, route, &departures),
        NextDeparturesResponse::from_route(name, route, &departures),
    ))
}

/// Next departures for one route.
async fn next_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<NextDeparturesRequest>,
) -> Result<Response, AppError> {
    let n = upcoming_count(req.n);
    let (view, result) = {
        let store = state.store.lock().await;
        upcoming_for(&store, &req.name, n)?
    };

    if accepts_html(&headers) {
        let html = DeparturesTemplate { departures: view }.render()?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(result).into_response())
    }
}

/// Next departures for two routes, e.g. home → terminal and terminal → campus.
async fn compare_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<CompareRequest>,
) -> Result<Response, AppError> {
    if req.first.is_empty() || req.second.is_empty() {
        return Err(AppError::BadRequest {
            message: "Choose both routes.".to_string(),
        });
    }

    let n = upcoming_count(req.n);
    let ((first_view, first), (second_view, second)) = {
        let store = state.store.lock().await;
        (
            upcoming_for(&store, &req.first, n)?,
            upcoming_for(&store, &req.second, n)?,
        )
    };

    if accepts_html(&headers) {
        let html = CompareTemplate {
            sides: vec![first_view, second_view],
        }
        .render()?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(CompareResponse { first, second }).into_response())
    }
}

// ============================================================================
// JSON API
// ============================================================================

/// List all stored routes.
async fn list_routes(State(state): State<AppState>) -> Json<RouteListResponse> {
    let store = state.store.lock().await;
    let routes = store
        .data()
        .routes
        .iter()
        .map(|(name, route)| RouteResult::from_route(name, route))
        .collect();

    Json(RouteListResponse { routes })
}

/// Add or replace a route.
async fn add_route_json(
    State(state): State<AppState>,
    Json(draft): Json<RouteDraft>,
) -> Result<Json<MutationResponse>, AppError> {
    let (name, route) = draft.validate().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let mut store = state.store.lock().await;
    let result = store.add_route(name, route);
    if let Err(e) = &result {
        error!(error = %e, "failed to save document");
    }

    Ok(Json(MutationResponse::from_save(result)))
}

/// Delete a route; missing names are not an error.
async fn delete_route_json(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<DeleteRouteResponse> {
    let mut store = state.store.lock().await;

    let (removed, result) = store.delete_route(&name);
    if let Err(e) = &result {
        error!(error = %e, "failed to save document");
    }

    Json(DeleteRouteResponse {
        removed: removed.is_some(),
        result: MutationResponse::from_save(result),
    })
}

/// Update settings.
async fn save_settings_json(
    State(state): State<AppState>,
    Json(req): Json<SettingsRequest>,
) -> Json<MutationResponse> {
    let mut store = state.store.lock().await;
    let result = store.set_theme(req.theme);
    if let Err(e) = &result {
        error!(error = %e, "failed to save document");
    }

    Json(MutationResponse::from_save(result))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal {
            message: format!("Template error: {e}"),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Io(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
