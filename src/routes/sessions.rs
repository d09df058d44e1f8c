use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;
use crate::core::{CoreError, MatchController};
use crate::models::{
    CatalogOptionsResponse, CreateSessionRequest, EngagementRequest, EngagementResponse, ErrorResponse,
    HealthResponse, InstitutionTier, Level, MatchListResponse, MatchOutcome, MatchRequest, ProfileId,
    ProfileListResponse, ProfileQuery, Region, ScrollSignal, SessionResponse, Specialty, UpdateTierRequest,
};
use crate::services::{SessionError, SessionStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
}

/// Configure all session-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/catalog/options", web::get().to(catalog_options))
        .route("/sessions", web::post().to(create_session))
        .route("/sessions/{session_id}", web::get().to(get_session))
        .route("/sessions/{session_id}", web::delete().to(delete_session))
        .route("/sessions/{session_id}/profiles", web::get().to(list_profiles))
        .route("/sessions/{session_id}/profiles/{profile_id}", web::get().to(get_profile))
        .route("/sessions/{session_id}/matches", web::post().to(request_match))
        .route("/sessions/{session_id}/matches", web::get().to(list_matches))
        .route("/sessions/{session_id}/engagement", web::post().to(record_engagement))
        .route("/sessions/{session_id}/tier", web::put().to(update_tier))
        .route("/sessions/{session_id}/quota/reset", web::post().to(reset_quota));
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn session_error(err: SessionError) -> HttpResponse {
    match err {
        SessionError::NotFound(_) => {
            tracing::info!("{}", err);
            error_response(StatusCode::NOT_FOUND, "Session not found", err.to_string())
        }
        SessionError::CapacityExceeded(_) => {
            tracing::warn!("{}", err);
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Session limit reached", err.to_string())
        }
    }
}

fn core_error(err: CoreError) -> HttpResponse {
    match err {
        CoreError::InvalidFilterValue { .. } => {
            tracing::info!("Rejected filter: {}", err);
            error_response(StatusCode::BAD_REQUEST, "Invalid filter value", err.to_string())
        }
        CoreError::UnknownProfileId(_) => {
            tracing::info!("Rejected profile reference: {}", err);
            error_response(StatusCode::NOT_FOUND, "Unknown profile", err.to_string())
        }
        CoreError::DuplicateProfileId(_) => {
            tracing::error!("Catalog invariant violated: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Catalog error", err.to_string())
        }
    }
}

fn summarize(session_id: Uuid, controller: &MatchController) -> SessionResponse {
    let state = controller.state();
    SessionResponse {
        session_id,
        tier: state.quota.tier,
        remaining_free: controller.remaining_free(),
        free_requests_used: state.quota.free_requests_used,
        free_requests_limit: state.quota.free_requests_limit,
        matched_profile_ids: state.matches.keys().copied().collect(),
        conversion_shown: state.engagement.has_fired(),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        profiles: state.sessions.catalog().len(),
        live_sessions: state.sessions.stats().live_sessions,
        timestamp: chrono::Utc::now(),
    })
}

/// Enumerated filter values
///
/// GET /api/v1/catalog/options
async fn catalog_options(state: web::Data<AppState>) -> impl Responder {
    let quota = state.sessions.quota_policy();

    HttpResponse::Ok().json(CatalogOptionsResponse {
        levels: Level::ALL.iter().map(|v| v.label().to_string()).collect(),
        specialties: Specialty::ALL.iter().map(|v| v.label().to_string()).collect(),
        institution_tiers: InstitutionTier::ALL.iter().map(|v| v.label().to_string()).collect(),
        regions: Region::ALL.iter().map(|v| v.label().to_string()).collect(),
        free_requests_limit: quota.free_requests_limit,
        paid_match_fee_cents: quota.paid_match_fee_cents,
    })
}

/// Open a browsing session
///
/// POST /api/v1/sessions
///
/// Request body:
/// ```json
/// { "tier": "free|premium" }
/// ```
async fn create_session(
    state: web::Data<AppState>,
    req: web::Json<CreateSessionRequest>,
) -> impl Responder {
    let (session_id, controller) = match state.sessions.create(req.tier).await {
        Ok(session) => session,
        Err(e) => return session_error(e),
    };
    let guard = controller.lock().await;

    tracing::info!("Opened session {} on {:?} tier", session_id, req.tier);

    HttpResponse::Created().json(summarize(session_id, &guard))
}

/// GET /api/v1/sessions/{sessionId}
async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let guard = controller.lock().await;
    HttpResponse::Ok().json(summarize(session_id, &guard))
}

/// DELETE /api/v1/sessions/{sessionId}
async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    match state.sessions.remove(session_id).await {
        Ok(()) => {
            tracing::info!("Closed session {}", session_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => session_error(e),
    }
}

/// Filtered, disclosed profile list
///
/// GET /api/v1/sessions/{sessionId}/profiles?level=&specialty=&institutionTier=&region=&requirePublications=
async fn list_profiles(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ProfileQuery>,
) -> impl Responder {
    let session_id = path.into_inner();

    // Validate before touching the session
    let criteria = match query.to_criteria() {
        Ok(criteria) => criteria,
        Err(e) => return core_error(e),
    };

    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let profiles = controller.lock().await.browse(&criteria);

    tracing::debug!(
        "Session {} browsing {} of {} profiles",
        session_id,
        profiles.len(),
        state.sessions.catalog().len()
    );

    HttpResponse::Ok().json(ProfileListResponse {
        total_results: profiles.len(),
        profiles,
    })
}

/// GET /api/v1/sessions/{sessionId}/profiles/{profileId}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, ProfileId)>,
) -> impl Responder {
    let (session_id, profile_id) = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let view = controller.lock().await.view(profile_id);
    match view {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => core_error(e),
    }
}

/// Send a match request
///
/// POST /api/v1/sessions/{sessionId}/matches
///
/// Request body:
/// ```json
/// { "profileId": 12 }
/// ```
async fn request_match(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    let session_id = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    // Check and increment happen under one lock
    let receipt = controller.lock().await.submit_match(req.profile_id);

    match receipt {
        Ok(receipt) => {
            match receipt.outcome {
                MatchOutcome::ConfirmedPaid => tracing::info!(
                    "Session {} matched profile {} (paid, {} cents owed)",
                    session_id,
                    receipt.profile_id,
                    receipt.fee_cents.unwrap_or_default()
                ),
                MatchOutcome::ConfirmedFree => tracing::info!(
                    "Session {} matched profile {} (free)",
                    session_id,
                    receipt.profile_id
                ),
                MatchOutcome::AlreadyMatched => tracing::debug!(
                    "Session {} repeated match for profile {}",
                    session_id,
                    receipt.profile_id
                ),
            }
            HttpResponse::Ok().json(receipt)
        }
        Err(e) => core_error(e),
    }
}

/// GET /api/v1/sessions/{sessionId}/matches
async fn list_matches(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let matches = controller.lock().await.matches();
    HttpResponse::Ok().json(MatchListResponse { matches })
}

/// Deliver one scroll signal
///
/// POST /api/v1/sessions/{sessionId}/engagement
///
/// Request body:
/// ```json
/// { "offset": 3200, "viewportHeight": 800, "pageHeight": 4800 }
/// ```
async fn record_engagement(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<EngagementRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for engagement signal: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let session_id = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let signal = ScrollSignal::from(&*req);
    let show_conversion = controller.lock().await.observe_scroll(&signal);

    if show_conversion {
        tracing::info!("Session {} reached the conversion threshold", session_id);
    }

    HttpResponse::Ok().json(EngagementResponse { show_conversion })
}

/// Tier change from the account system
///
/// PUT /api/v1/sessions/{sessionId}/tier
async fn update_tier(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateTierRequest>,
) -> impl Responder {
    let session_id = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let mut guard = controller.lock().await;
    guard.set_tier(req.tier);

    tracing::info!("Session {} moved to {:?} tier", session_id, req.tier);

    HttpResponse::Ok().json(summarize(session_id, &guard))
}

/// Start a new billing period
///
/// POST /api/v1/sessions/{sessionId}/quota/reset
async fn reset_quota(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    let controller = match state.sessions.get(session_id).await {
        Ok(controller) => controller,
        Err(e) => return session_error(e),
    };

    let mut guard = controller.lock().await;
    guard.reset_quota_period();

    tracing::info!("Session {} quota period reset", session_id);

    HttpResponse::Ok().json(summarize(session_id, &guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use std::sync::Arc;
    use crate::core::{ProfileCatalog, QuotaPolicy, TriggerPolicy};
    use crate::models::{Profile, RemainingFree, Tier};

    fn create_state() -> AppState {
        create_state_with_limit(10)
    }

    fn create_state_with_limit(max_sessions: u64) -> AppState {
        let profiles = vec![Profile {
            id: 1,
            display_name: "Dr. L. W.".to_string(),
            full_name: "Dr. Lena Weiss".to_string(),
            level: Level::Resident,
            year: "PGY-1".to_string(),
            specialty: Specialty::Dermatology,
            institution_tier: InstitutionTier::EuropeanUniversity,
            institution: "Charité Berlin".to_string(),
            region: Region::Europe,
            publication_count: 3,
            verified: true,
            bio: String::new(),
            interests: vec![],
            skills: vec![],
            previous_projects: vec![],
        }];

        AppState {
            sessions: SessionStore::new(
                Arc::new(ProfileCatalog::new(profiles).unwrap()),
                QuotaPolicy::default(),
                TriggerPolicy::default(),
                max_sessions,
                60,
            ),
        }
    }

    #[actix_web::test]
    async fn test_health_check_reports_catalog_size() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.profiles, 1);
    }

    #[actix_web::test]
    async fn test_create_session_defaults_to_free() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/sessions")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: SessionResponse = test::read_body_json(resp).await;
        assert_eq!(body.tier, Tier::Free);
        assert_eq!(body.remaining_free, RemainingFree::Limited(3));
        assert!(body.matched_profile_ids.is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_session_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/sessions/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_session_at_capacity_is_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state_with_limit(1)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/sessions")
            .set_json(serde_json::json!({}))
            .to_request();
        let first: SessionResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/sessions")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["statusCode"], 503);

        // The live session is untouched
        let req = test::TestRequest::get()
            .uri(&format!("/sessions/{}", first.session_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
