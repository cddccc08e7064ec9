use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{CommutePlanner, PlannerError};
use crate::models::{ErrorResponse, HealthResponse, RosterResponse, TripRequest};
use std::sync::Arc;

/// Message shown when geocoding fails for either place
pub const LOCATION_NOT_FOUND_MESSAGE: &str =
    "Could not locate one or both addresses. Please try more specific or well-known landmarks.";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<CommutePlanner>,
}

/// Configure all commute-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/commute/plan", web::post().to(plan_commute))
        .route("/roster", web::get().to(get_roster));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        roster_size: state.planner.roster().len(),
    })
}

/// Plan commute endpoint
///
/// POST /api/v1/commute/plan
///
/// Request body:
/// ```json
/// {
///   "homePlace": "string",
///   "workPlace": "string",
///   "prefersBiking": false,
///   "prefersWalking": false,
///   "prefersCarpool": true
/// }
/// ```
async fn plan_commute(
    state: web::Data<AppState>,
    req: web::Json<TripRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for plan request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    tracing::info!(
        "Planning commute from '{}' to '{}' (bike: {}, walk: {}, carpool: {})",
        req.home_place,
        req.work_place,
        req.prefers_biking,
        req.prefers_walking,
        req.prefers_carpool
    );

    match state.planner.plan(&req).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e),
    }
}

/// List the reference roster, for drawing commuter markers
async fn get_roster(state: web::Data<AppState>) -> impl Responder {
    let commuters = state.planner.roster().commuters().to_vec();
    HttpResponse::Ok().json(RosterResponse {
        total: commuters.len(),
        commuters,
    })
}

/// Map planner failures to a user-facing response without internal detail
fn error_response(err: &PlannerError) -> HttpResponse {
    match err {
        PlannerError::LocationNotFound { .. } => HttpResponse::NotFound().json(ErrorResponse {
            error: "Location not found".to_string(),
            message: LOCATION_NOT_FOUND_MESSAGE.to_string(),
            status_code: 404,
        }),
        PlannerError::UpstreamUnavailable(_) => HttpResponse::BadGateway().json(ErrorResponse {
            error: "Upstream unavailable".to_string(),
            message: "The location service is currently unavailable. Please try again later.".to_string(),
            status_code: 502,
        }),
        PlannerError::Matching(e) => {
            tracing::error!("Carpool matching failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: "Carpool matching is misconfigured.".to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchError;

    #[test]
    fn test_location_not_found_is_404() {
        let err = PlannerError::LocationNotFound {
            places: vec!["Atlantis".to_string()],
        };
        assert_eq!(error_response(&err).status(), 404);
    }

    #[test]
    fn test_matching_error_is_500() {
        let err = PlannerError::Matching(MatchError::IdCollision(5));
        assert_eq!(error_response(&err).status(), 500);
    }

    #[test]
    fn test_upstream_error_is_502() {
        let err = PlannerError::UpstreamUnavailable("timeout".to_string());
        assert_eq!(error_response(&err).status(), 502);
    }
}
