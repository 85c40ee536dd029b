use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{check_player_postcode_match, GuardianMatcher};
use crate::models::{
    ErrorResponse, FindGuardianMatchesRequest, FindGuardianMatchesResponse, GuardianMatchView,
    HealthResponse, PlayerPostcodeMatchRequest,
};
use crate::services::PostgresClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub matcher: GuardianMatcher,
    pub max_candidates: usize,
}

/// Configure all guardian matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/guardians/matches", web::post().to(find_guardian_matches))
        .route("/guardians/player-postcode-match", web::post().to(player_postcode_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn internal_error(error: &str, message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 500,
    })
}

/// Reject requests naming more candidates than `matching.max_candidates`
fn check_candidate_limit(count: usize, max_candidates: usize) -> Result<(), HttpResponse> {
    if count > max_candidates {
        return Err(bad_request(
            "Too many candidates",
            format!(
                "At most {} candidate guardian ids are accepted, got {}",
                max_candidates, count
            ),
        ));
    }
    Ok(())
}

/// Find guardian matches endpoint
///
/// POST /api/v1/guardians/matches
///
/// Request body:
/// ```json
/// {
///   "profile": {
///     "email": "string",
///     "altEmail": "string",
///     "firstName": "string",
///     "lastName": "string",
///     "phone": "string",
///     "postcode": "string",
///     "address": "string",
///     "town": "string"
///   },
///   "candidateGuardianIds": ["string"]
/// }
/// ```
async fn find_guardian_matches(
    state: web::Data<AppState>,
    req: web::Json<FindGuardianMatchesRequest>,
) -> impl Responder {
    if let Err(response) = check_candidate_limit(req.candidate_guardian_ids.len(), state.max_candidates) {
        tracing::info!(
            "Rejected find_guardian_matches request with {} candidates",
            req.candidate_guardian_ids.len()
        );
        return response;
    }

    tracing::info!(
        "Matching registering user against {} candidate guardians",
        req.candidate_guardian_ids.len()
    );

    let candidates = match state.postgres.get_guardians_by_ids(&req.candidate_guardian_ids).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidate guardians: {}", e);
            return internal_error("Failed to load candidate guardians", e.to_string());
        }
    };

    let results = match state
        .matcher
        .find_guardian_matches(state.postgres.as_ref(), &candidates, &req.profile)
        .await
    {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Failed to resolve linked players: {}", e);
            return internal_error("Failed to resolve linked players", e.to_string());
        }
    };

    let outcome = state.matcher.classify(&results);
    let weights = state.matcher.weights();

    let response = FindGuardianMatchesResponse {
        matches: results
            .iter()
            .map(|result| GuardianMatchView::render(result, weights))
            .collect(),
        outcome,
        total_candidates: candidates.len(),
    };

    tracing::info!(
        "Returning {} guardian matches (from {} candidates), outcome: {:?}",
        response.matches.len(),
        response.total_candidates,
        response.outcome
    );

    HttpResponse::Ok().json(response)
}

/// Linked-player postcode check endpoint
///
/// POST /api/v1/guardians/player-postcode-match
///
/// Request body:
/// ```json
/// { "guardianId": "string", "postcode": "string" }
/// ```
async fn player_postcode_match(
    state: web::Data<AppState>,
    req: web::Json<PlayerPostcodeMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    match check_player_postcode_match(state.postgres.as_ref(), &req.guardian_id, &req.postcode).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            tracing::error!("Failed to check linked players for {}: {}", req.guardian_id, e);
            internal_error("Failed to check linked players", e.to_string())
        }
    }
}
