//! HTTP handler functions for the engagement map API.

use actix_web::{HttpResponse, web};
use engagement_map_server_models::{
    ActivityQueryParams, ApiActivities, ApiActivity, ApiHealth, ApiOptions, ApiRegions, ApiReload,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/options`
///
/// Returns the dropdown and multiselect choices for the current dataset.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    let dataset = state.dashboard.snapshot();

    HttpResponse::Ok().json(ApiOptions {
        version: dataset.version(),
        loaded_at: dataset.loaded_at(),
        options: dataset
            .options()
            .iter()
            .map(|(field, values)| (field, values.to_vec()))
            .collect(),
        center: dataset.center(),
    })
}

/// `GET /api/activities`
///
/// Lists every activity matching the filter, with per-region counts.
pub async fn activities(
    state: web::Data<AppState>,
    params: web::Query<ActivityQueryParams>,
) -> HttpResponse {
    let dashboard = &state.dashboard;
    let evaluation = dashboard.evaluate(&params.to_selection());

    let activities: Vec<ApiActivity> = evaluation
        .listed
        .iter()
        .map(|listed| ApiActivity::new(&listed.record, listed.region.clone()))
        .collect();

    HttpResponse::Ok().json(ApiActivities {
        version: evaluation.version,
        total: activities.len(),
        activities,
        regions: evaluation.aggregate,
    })
}

/// `GET /api/activities.geojson`
///
/// Marker layer for the map: one point per located matching activity.
pub async fn activities_geojson(
    state: web::Data<AppState>,
    params: web::Query<ActivityQueryParams>,
) -> HttpResponse {
    let evaluation = state.dashboard.evaluate(&params.to_selection());

    HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(evaluation.to_feature_collection())
}

/// `GET /api/regions`
///
/// Per-region counts and percentages for choropleth colouring.
pub async fn regions(
    state: web::Data<AppState>,
    params: web::Query<ActivityQueryParams>,
) -> HttpResponse {
    let evaluation = state.dashboard.evaluate(&params.to_selection());

    HttpResponse::Ok().json(ApiRegions {
        version: evaluation.version,
        aggregate: evaluation.aggregate,
    })
}

/// `POST /api/reload`
///
/// Re-reads the activity table. On failure the previous dataset keeps
/// serving.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = state.dashboard.clone();

    match web::block(move || dashboard.reload_data()).await {
        Ok(Ok(dataset)) => HttpResponse::Ok().json(ApiReload {
            version: dataset.version(),
            records: dataset.len(),
            loaded_at: dataset.loaded_at(),
        }),
        Ok(Err(e)) => {
            log::error!("Failed to reload activity data: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to reload activity data: {e}")
            }))
        }
        Err(e) => {
            log::error!("Reload task failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Reload task failed"
            }))
        }
    }
}
