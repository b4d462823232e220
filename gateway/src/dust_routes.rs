//! Dust risk API routes
//!
//! Read-only views over the latest published snapshot, plus an on-demand
//! refresh. Until the first cycle has been published every data endpoint
//! answers 503.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use dust_feed::{Poller, Snapshot};
use dust_risk::{ScoredLocation, SeriesPoint};
use dust_sites::{Region, RegionFilter, SiteError, SiteRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Shared state for the dust routes
#[derive(Clone)]
pub struct DustState {
    pub poller: Arc<Poller>,
    pub registry: Arc<SiteRegistry>,
}

impl DustState {
    pub fn new(poller: Arc<Poller>, registry: Arc<SiteRegistry>) -> Self {
        Self { poller, registry }
    }

    async fn snapshot(&self) -> Result<Arc<Snapshot>, ApiError> {
        self.poller.store().latest().await.ok_or(ApiError::NotReady)
    }
}

/// Build dust routes with state
pub fn dust_router(state: DustState) -> Router {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/locations", get(get_locations))
        .route("/alerts", get(get_alerts))
        .route("/series/:id", get(get_series))
        .route("/regions", get(get_regions))
        .route("/refresh", post(refresh))
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No polling cycle has completed yet")]
    NotReady,
    #[error(transparent)]
    BadRegion(SiteError),
    #[error(transparent)]
    NotFound(SiteError),
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRegion(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegionQuery {
    /// Region display name or slug; "Global" or absent for every city
    pub region: Option<String>,
}

impl RegionQuery {
    fn filter(&self) -> Result<RegionFilter, ApiError> {
        match &self.region {
            Some(r) => r.parse().map_err(ApiError::BadRegion),
            None => Ok(RegionFilter::Global),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct LocationsResponse {
    pub cycle: u64,
    pub updated_at: DateTime<Utc>,
    pub region: String,
    pub count: usize,
    pub locations: Vec<ScoredLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SeriesResponse {
    pub id: String,
    pub name: String,
    pub cycle: u64,
    pub series: Vec<SeriesPoint>,
}

#[derive(Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub slug: String,
    pub sites: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RegionsResponse {
    pub regions: Vec<RegionSummary>,
}

#[derive(Serialize, Deserialize)]
pub struct RefreshResponse {
    pub cycle: u64,
    pub updated_at: DateTime<Utc>,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// Full snapshot, optionally narrowed to one region
pub async fn get_snapshot(
    State(state): State<DustState>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<Snapshot>, ApiError> {
    let filter = query.filter()?;
    let snapshot = state.snapshot().await?;

    let mut view = snapshot.as_ref().clone();
    view.report = snapshot.report.for_region(filter);
    Ok(Json(view))
}

/// Scored cities in a region
pub async fn get_locations(
    State(state): State<DustState>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<LocationsResponse>, ApiError> {
    let filter = query.filter()?;
    let snapshot = state.snapshot().await?;

    let locations = snapshot.report.for_region(filter).locations;
    Ok(Json(LocationsResponse {
        cycle: snapshot.cycle,
        updated_at: snapshot.updated_at,
        region: filter.to_string(),
        count: locations.len(),
        locations,
    }))
}

/// High-tier cities in a region
pub async fn get_alerts(
    State(state): State<DustState>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<LocationsResponse>, ApiError> {
    let filter = query.filter()?;
    let snapshot = state.snapshot().await?;

    let locations: Vec<ScoredLocation> =
        snapshot.report.alerts(filter).into_iter().cloned().collect();
    Ok(Json(LocationsResponse {
        cycle: snapshot.cycle,
        updated_at: snapshot.updated_at,
        region: filter.to_string(),
        count: locations.len(),
        locations,
    }))
}

/// Trailing series for one city. A known city that failed this cycle has an
/// empty series.
pub async fn get_series(
    State(state): State<DustState>,
    Path(id): Path<String>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let site = state.registry.get(&id).map_err(ApiError::NotFound)?;
    let snapshot = state.snapshot().await?;

    Ok(Json(SeriesResponse {
        id: site.id.clone(),
        name: site.name.clone(),
        cycle: snapshot.cycle,
        series: snapshot
            .report
            .series_for(&site.id)
            .map(<[SeriesPoint]>::to_vec)
            .unwrap_or_default(),
    }))
}

/// Regions and their cities, "Global" first
pub async fn get_regions(State(state): State<DustState>) -> Json<RegionsResponse> {
    let mut regions = vec![RegionSummary {
        name: RegionFilter::Global.to_string(),
        slug: "global".to_string(),
        sites: state.registry.iter().map(|s| s.id.clone()).collect(),
    }];
    regions.extend(Region::ALL.iter().map(|r| RegionSummary {
        name: r.as_str().to_string(),
        slug: r.slug(),
        sites: state.registry.in_region(*r).map(|s| s.id.clone()).collect(),
    }));

    Json(RegionsResponse { regions })
}

/// Run a cycle now
pub async fn refresh(State(state): State<DustState>) -> Json<RefreshResponse> {
    let snapshot = state.poller.refresh_now().await;

    Json(RefreshResponse {
        cycle: snapshot.cycle,
        updated_at: snapshot.updated_at,
        attempted: snapshot.attempted,
        succeeded: snapshot.succeeded,
        failed: snapshot.failed(),
    })
}
