//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::domain::{ClientTime, LocationKey, TokenSet};
use crate::error::HireError;
use crate::hire::USER_SET_LABEL;
use crate::strategy::StrategyOptions;
use crate::workflow::{WorkflowApi, WorkflowError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router<A: WorkflowApi + 'static>(state: AppState<A>, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page::<A>))
        .route("/health", get(health))
        .route("/stations/search", get(search_stations::<A>))
        .route(
            "/stations/:station_id/release-code",
            post(station_release_code::<A>),
        )
        .route(
            "/locations/:key/release-code",
            post(location_release_code::<A>),
        )
        .route(
            "/tokens",
            get(get_tokens::<A>)
                .put(set_tokens::<A>)
                .delete(clear_tokens::<A>),
        )
        .route("/tokens/prime/:key", post(prime_tokens::<A>))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form.
async fn index_page<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
) -> Result<Html<String>, AppError> {
    let hire = state.hire.lock().await;
    let template = IndexTemplate {
        locations: LocationView::from_locations(hire.locations()),
        tokens: hire.active_token_info().into(),
    };
    drop(hire);

    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn parse_location(key: &str) -> Result<LocationKey, AppError> {
    key.parse().map_err(|_| AppError::NotFound {
        message: format!("Unknown location: {key}"),
    })
}

/// Search for docking stations.
async fn search_stations<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
    headers: HeaderMap,
    Query(req): Query<StationSearchRequest>,
) -> Result<Response, AppError> {
    let mut options = StrategyOptions::default();
    if let Some(key) = state.config.prime_from {
        options = options.with_prime_from(key);
    }

    // Override tokens need both halves
    match (req.encoding.as_deref(), req.client_time.as_deref()) {
        (Some(encoding), Some(time)) if !encoding.is_empty() => {
            let time = ClientTime::parse(time).map_err(HireError::from)?;
            options = options.with_override(TokenSet::new(encoding, time, "search_request"));
        }
        (None, None) | (Some(""), _) => {}
        _ => {
            return Err(AppError::BadRequest {
                message: "encoding and client_time must be given together".to_string(),
            });
        }
    }

    let stations = state
        .hire
        .lock()
        .await
        .search_stations(&req.q, &options)
        .await?;
    state.results.insert_all(&stations).await;

    if accepts_html(&headers) {
        let template = StationListTemplate {
            query: req.q.trim().to_string(),
            stations: stations.iter().map(StationView::from_record).collect(),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(StationSearchResponse {
            query: req.q.trim().to_string(),
            stations: stations.iter().map(StationResult::from).collect(),
        })
        .into_response())
    }
}

/// Get a release code for a station from a recent search.
async fn station_release_code<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
    headers: HeaderMap,
    Path(station_id): Path<String>,
) -> Result<Response, AppError> {
    let record = state
        .results
        .get(&station_id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Station {station_id} not found or expired; search again"),
        })?;

    let code = state
        .hire
        .lock()
        .await
        .release_code_for_search_result(&record, &StrategyOptions::default())
        .await?;
    info!(station = %station_id, "release code issued");

    release_code_response(&headers, code, record.point_name.clone())
}

/// Get a release code for a known location.
async fn location_release_code<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let key = parse_location(&key)?;

    let mut hire = state.hire.lock().await;
    let point_name = hire
        .locations()
        .get(key)
        .map(|loc| loc.display_name.clone())
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown location: {key}"),
        })?;
    let code = hire
        .release_code_for_known_location(key, &StrategyOptions::default())
        .await?;
    drop(hire);
    info!(location = %key, "release code issued");

    release_code_response(&headers, code, point_name)
}

fn release_code_response(
    headers: &HeaderMap,
    code: String,
    point_name: String,
) -> Result<Response, AppError> {
    if accepts_html(headers) {
        let html = ReleaseCodeTemplate { code, point_name }
            .render()
            .map_err(|e| AppError::Internal {
                message: format!("Template error: {}", e),
            })?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(ReleaseCodeResponse { code, point_name }).into_response())
    }
}

/// Show the active tokens.
async fn get_tokens<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
) -> Json<TokenStatus> {
    Json(state.hire.lock().await.active_token_info().into())
}

/// Replace the active tokens.
async fn set_tokens<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
    Json(req): Json<SetTokensRequest>,
) -> Result<Json<TokenStatus>, AppError> {
    let time = ClientTime::parse(&req.client_time).map_err(HireError::from)?;
    let label = req.label.unwrap_or_else(|| USER_SET_LABEL.to_string());

    let mut hire = state.hire.lock().await;
    hire.set_active_tokens(req.encoding, time, label)?;
    Ok(Json(hire.active_token_info().into()))
}

/// Clear the active tokens.
async fn clear_tokens<A: WorkflowApi + 'static>(State(state): State<AppState<A>>) -> StatusCode {
    state.hire.lock().await.clear_active_tokens();
    StatusCode::NO_CONTENT
}

/// Make a known location's example tokens active.
async fn prime_tokens<A: WorkflowApi + 'static>(
    State(state): State<AppState<A>>,
    Path(key): Path<String>,
) -> Result<Json<PrimeResponse>, AppError> {
    let key = parse_location(&key)?;

    let mut hire = state.hire.lock().await;
    let primed = hire.prime_from_known_location(key);
    Ok(Json(PrimeResponse {
        primed,
        tokens: hire.active_token_info().into(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<HireError> for AppError {
    fn from(e: HireError) -> Self {
        match e {
            HireError::Config(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            HireError::NoStrategyAvailable(_) => AppError::Conflict {
                message: e.to_string(),
            },
            HireError::Transport(_) | HireError::Data(_) | HireError::ExhaustedStrategies { .. } => {
                // Remote bodies go to the log only
                warn!(error = %e, "remote failure");
                let message = match &e {
                    HireError::ExhaustedStrategies { last, .. } => {
                        format!("all token strategies failed: {}", remote_summary(last))
                    }
                    other => remote_summary(other).to_string(),
                };
                AppError::BadGateway { message }
            }
        }
    }
}

/// Fixed description of a remote failure, free of response content.
fn remote_summary(e: &HireError) -> &'static str {
    match e {
        HireError::ExhaustedStrategies { last, .. } => remote_summary(last),
        HireError::Transport(WorkflowError::Unauthorized { .. }) => {
            "the hire service rejected the session tokens"
        }
        HireError::Transport(WorkflowError::Json { .. }) => {
            "the hire service sent an unreadable response"
        }
        HireError::Transport(_) => "the hire service request failed",
        HireError::Data(_) => "the hire service response had no release code",
        HireError::Config(_) | HireError::NoStrategyAvailable(_) => "the request was not sent",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
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

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
