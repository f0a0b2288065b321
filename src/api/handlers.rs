use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{RequestId, Session},
    models::{CatalogEntry, HistoryEntry, Recommendation},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub total: usize,
    pub movies: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default)]
    pub k: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub k: usize,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "movies": state.engine.catalog().len()
    }))
}

/// Lists catalog titles, optionally filtered by a case-insensitive substring
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> Json<MoviesResponse> {
    let matches: Vec<&CatalogEntry> = state
        .engine
        .catalog()
        .search(params.q.as_deref().unwrap_or(""))
        .collect();

    let total = matches.len();
    let movies = matches
        .into_iter()
        .take(params.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    Json(MoviesResponse { total, movies })
}

/// Returns the movies most similar to the requested title
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    session: Result<Session, AppError>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    // Titles are matched exactly, surrounding whitespace included
    let title = params.title.as_str();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }

    // History is optional here, so a bad session header only skips recording
    let session = match session {
        Ok(Session(session)) => session,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Ignoring session header");
            None
        }
    };

    let k = params.k.unwrap_or(state.default_k);

    let recommendations = match state.engine.recommend(title, k) {
        Ok(recommendations) => recommendations,
        Err(AppError::NotFound(title)) => {
            tracing::warn!(request_id = %request_id, title = %title, "Movie not found");
            return Err(AppError::NotFound(title));
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        request_id = %request_id,
        title = %title,
        requested_k = k,
        returned = recommendations.len(),
        "Recommendations served"
    );

    if let Some(session) = session {
        let entry = HistoryEntry::new(
            title.to_string(),
            recommendations.len(),
            recommendations.iter().map(|r| r.title.clone()).collect(),
        );
        state.history.record(session, entry).await;
    }

    Ok(Json(RecommendationResponse {
        title: title.to_string(),
        k: recommendations.len(),
        recommendations,
    }))
}

/// Returns the caller's query history
pub async fn get_history(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<HistoryResponse>> {
    let session = require_session(session)?;
    let entries = state.history.list(session).await;
    Ok(Json(HistoryResponse { entries }))
}

/// Clears the caller's query history
pub async fn clear_history(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Value>> {
    let session = require_session(session)?;
    let cleared = state.history.clear(session).await;
    Ok(Json(json!({ "cleared": cleared })))
}

fn require_session(session: Session) -> AppResult<uuid::Uuid> {
    session.0.ok_or_else(|| {
        AppError::InvalidInput(format!(
            "{} header is required",
            crate::middleware::session::SESSION_ID_HEADER
        ))
    })
}
