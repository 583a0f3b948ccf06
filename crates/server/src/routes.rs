use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use enjoyrecord_core::MediaType;
use enjoyrecord_core::error::ApiError;
use enjoyrecord_search::{
    SearchItem, SearchMode, SearchOptions, SearchRequest, Source, basic_search,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::auth::AdminGate;
use crate::error::AppError;
use crate::state::AppState;

/// Results returned to the client per search.
pub const MAX_RESULTS: usize = 3;

const FAILED_WARNING: &str = "Search failed; using manual entry mode";
const EMPTY_WARNING: &str = "No results found; using manual entry mode";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/admin/check", get(admin_check))
        .route("/admin/verify", post(admin_verify))
        .route("/search", get(search))
        .route("/search/{source}", get(search_source))
        .route("/catalog/{media_type}/{id}", get(catalog_item))
}

// ---------------------------------------------------------------------------
// Health / admin
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct AdminCheckResponse {
    configured: bool,
}

async fn admin_check(State(state): State<AppState>) -> Json<AdminCheckResponse> {
    Json(AdminCheckResponse {
        configured: state.admin_configured(),
    })
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

async fn admin_verify(_gate: AdminGate) -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub token: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SearchResponse {
    fn results(mut items: Vec<SearchItem>) -> Self {
        items.truncate(MAX_RESULTS);
        Self {
            results: items,
            warning: None,
        }
    }

    /// Manual-entry placeholder when a type is known, otherwise nothing.
    fn fallback(media_type: Option<MediaType>, query: &str, warning: &str) -> Self {
        Self {
            results: media_type
                .map(|t| basic_search(t, query))
                .unwrap_or_default(),
            warning: Some(warning.to_string()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_query(params: &SearchParams) -> Result<&str, ApiError> {
    non_blank(params.q.as_deref()).ok_or_else(|| ApiError::BadRequest("Missing query".into()))
}

fn parse_media_type(raw: Option<&str>) -> Result<Option<MediaType>, ApiError> {
    non_blank(raw)
        .map(|t| t.parse::<MediaType>())
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid type".into()))
}

fn parse_mode(raw: Option<&str>) -> Result<SearchMode, ApiError> {
    match non_blank(raw) {
        None => Ok(SearchMode::Standard),
        Some(m) => m
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid mode".into())),
    }
}

/// Main search: catalog fan-out by type, or NeoDB when a token is given or
/// the type is open. Provider failures degrade to manual entry.
///
/// `q` is required in every mode, including `popular`, where RAWG ignores
/// it. `mode` only affects the catalog path; NeoDB searches never read it.
async fn search(
    _gate: AdminGate,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = required_query(&params)?;
    let media_type = parse_media_type(params.media_type.as_deref())?;
    let mode = parse_mode(params.mode.as_deref())?;
    let token = non_blank(params.token.as_deref());

    let outcome = match (media_type, token) {
        (Some(t), None) => {
            state
                .catalog
                .search_by_type(t, query, &SearchOptions { mode })
                .await
        }
        (t, token) => state.catalog.neodb().search(t, query, token).await,
    };

    match outcome {
        Ok(items) if !items.is_empty() => {
            info!(query, media_type = ?media_type, count = items.len(), "search complete");
            Ok(Json(SearchResponse::results(items)))
        }
        Ok(_) => match media_type {
            Some(_) => Ok(Json(SearchResponse::fallback(media_type, query, EMPTY_WARNING))),
            None => Ok(Json(SearchResponse::results(Vec::new()))),
        },
        Err(e) => {
            error!(
                query,
                media_type = ?media_type,
                has_token = token.is_some(),
                error = %e,
                "search failed"
            );
            if e.is_timeout() {
                return Err(ApiError::GatewayTimeout(e.to_string()).into());
            }
            if e.is_unauthorized() {
                return Err(ApiError::Unauthorized(e.to_string()).into());
            }
            Ok(Json(SearchResponse::fallback(media_type, query, FAILED_WARNING)))
        }
    }
}

/// Single-provider search. Errors surface as-is, without fallback.
async fn search_source(
    _gate: AdminGate,
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let source: Source = source.parse()?;
    let query = required_query(&params)?;
    let media_type = parse_media_type(params.media_type.as_deref())?
        .ok_or_else(|| ApiError::BadRequest("Missing type".into()))?;
    let mode = parse_mode(params.mode.as_deref())?;

    let request = SearchRequest::new(media_type, query).with_mode(mode);
    let items = state.catalog.search_source(source, &request).await?;
    Ok(Json(SearchResponse::results(items)))
}

// ---------------------------------------------------------------------------
// Catalog detail
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogParams {
    token: Option<String>,
}

async fn catalog_item(
    _gate: AdminGate,
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, String)>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<SearchItem>, AppError> {
    let media_type = parse_media_type(Some(&media_type))?
        .ok_or_else(|| ApiError::BadRequest("Invalid type".into()))?;

    state
        .catalog
        .neodb()
        .get_item(&id, media_type, non_blank(params.token.as_deref()))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("catalog item {id} not found")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_parameters_count_as_absent() {
        assert_eq!(parse_media_type(Some("  ")).unwrap(), None);
        assert_eq!(parse_mode(Some("")).unwrap(), SearchMode::Standard);
        let params = SearchParams {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(required_query(&params).unwrap_err().to_string(), "Missing query");
    }

    #[test]
    fn rejects_unknown_type_and_mode() {
        assert_eq!(parse_media_type(Some("music")).unwrap_err().to_string(), "Invalid type");
        assert_eq!(parse_mode(Some("trending")).unwrap_err().to_string(), "Invalid mode");
        assert_eq!(parse_mode(Some("popular")).unwrap(), SearchMode::Popular);
    }

    #[test]
    fn results_are_capped() {
        let items = (0..5)
            .map(|i| SearchItem::new(Source::Steam, i.to_string(), MediaType::Game, format!("g{i}")))
            .collect();
        assert_eq!(SearchResponse::results(items).results.len(), MAX_RESULTS);
    }

    #[test]
    fn fallback_without_type_is_empty() {
        let resp = SearchResponse::fallback(None, "三体", FAILED_WARNING);
        assert!(resp.results.is_empty());
        assert_eq!(resp.warning.as_deref(), Some(FAILED_WARNING));

        let resp = SearchResponse::fallback(Some(MediaType::Book), "三体", EMPTY_WARNING);
        assert_eq!(resp.results[0].sources, vec![Source::Manual]);
    }
}
