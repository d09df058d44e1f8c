// Integration tests for Research Match

use actix_web::{http::StatusCode, test as actix_test, web, App};
use research_match::core::{
    disclosure::present, filters::filter, MatchController, ProfileCatalog, QuotaPolicy, TriggerPolicy,
};
use research_match::models::{
    FilterCriteria, InstitutionTier, Level, MatchOutcome, Profile, ProfileListResponse, Region,
    RemainingFree, SessionResponse, Specialty, Tier,
};
use research_match::routes::{configure_routes, sessions::AppState};
use research_match::services::{ProfileSource, SessionStore};
use research_match::MatchReceipt;
use serde_json::{json, Value};
use std::sync::Arc;

fn create_test_profile(id: u64, specialty: Specialty, publications: u32) -> Profile {
    Profile {
        id,
        display_name: format!("Dr. {}.", id),
        full_name: format!("Dr. Full Name {}", id),
        level: Level::Resident,
        year: "PGY-1".to_string(),
        specialty,
        institution_tier: InstitutionTier::Top50MedicalSchoolUs,
        institution: format!("Medical Center {}", id),
        region: Region::SouthwestUs,
        publication_count: publications,
        verified: true,
        bio: String::new(),
        interests: vec![],
        skills: vec![],
        previous_projects: vec![],
    }
}

#[test]
fn test_integration_end_to_end_scenario() {
    let catalog = Arc::new(
        ProfileCatalog::new(vec![
            create_test_profile(1, Specialty::Cardiology, 0),
            create_test_profile(2, Specialty::Oncology, 4),
        ])
        .unwrap(),
    );

    // Filter
    let criteria = FilterCriteria {
        specialty: Some(Specialty::Cardiology),
        ..Default::default()
    };
    let hits = filter(catalog.profiles(), &criteria);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);

    // Disclosure before matching hides the full name
    let mut controller = MatchController::new(
        catalog.clone(),
        Tier::Free,
        &QuotaPolicy::default(),
        TriggerPolicy::default(),
    );
    let before = present(hits[0], controller.is_matched(1));
    assert_eq!(before.name, "Dr. 1.");
    assert!(!serde_json::to_string(&before).unwrap().contains("Dr. Full Name 1"));

    // Match on the free tier
    assert_eq!(controller.request_match(1).unwrap(), MatchOutcome::ConfirmedFree);
    assert_eq!(controller.state().quota.free_requests_used, 1);

    // Disclosure after matching reveals it
    let after = present(hits[0], controller.is_matched(1));
    assert_eq!(after.name, "Dr. Full Name 1");
    assert_eq!(after.affiliation, "Medical Center 1");
}

#[test]
fn test_bundled_dataset_loads() {
    let catalog = ProfileSource::load("data/profiles.json").unwrap();

    assert_eq!(catalog.len(), 10);
    let cardiology = FilterCriteria {
        specialty: Some(Specialty::Cardiology),
        ..Default::default()
    };
    let ids: Vec<u64> = filter(catalog.profiles(), &cardiology).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 10]);
}

fn create_state() -> AppState {
    let catalog = (1..=5)
        .map(|id| {
            let specialty = if id <= 2 { Specialty::Cardiology } else { Specialty::Oncology };
            create_test_profile(id, specialty, (id - 1) as u32)
        })
        .collect();

    AppState {
        sessions: SessionStore::new(
            Arc::new(ProfileCatalog::new(catalog).unwrap()),
            QuotaPolicy::default(),
            TriggerPolicy::default(),
            100,
            300,
        ),
    }
}

macro_rules! init_app {
    () => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_api_match_flow() {
    let app = init_app!();

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({"tier": "free"}))
        .to_request();
    let session: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    let base = format!("/api/v1/sessions/{}", session.session_id);

    // Anonymous listing
    let req = actix_test::TestRequest::get()
        .uri(&format!("{}/profiles?specialty=Cardiology", base))
        .to_request();
    let list: ProfileListResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.total_results, 2);
    assert_eq!(list.profiles[0].name, "Dr. 1.");
    assert!(!list.profiles[0].matched);

    // Three free matches, then a paid one
    for id in 1..=3 {
        let req = actix_test::TestRequest::post()
            .uri(&format!("{}/matches", base))
            .set_json(json!({"profileId": id}))
            .to_request();
        let receipt: MatchReceipt = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(receipt.outcome, MatchOutcome::ConfirmedFree);
        assert_eq!(receipt.remaining_free, RemainingFree::Limited(3 - id as u32));
    }

    let req = actix_test::TestRequest::post()
        .uri(&format!("{}/matches", base))
        .set_json(json!({"profileId": 4}))
        .to_request();
    let receipt: MatchReceipt = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(receipt.outcome, MatchOutcome::ConfirmedPaid);
    assert_eq!(receipt.fee_cents, Some(500));

    // Repeat is free of charge
    let req = actix_test::TestRequest::post()
        .uri(&format!("{}/matches", base))
        .set_json(json!({"profileId": 4}))
        .to_request();
    let receipt: MatchReceipt = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(receipt.outcome, MatchOutcome::AlreadyMatched);
    assert_eq!(receipt.fee_cents, None);

    // Matched profile is now disclosed
    let req = actix_test::TestRequest::get()
        .uri(&format!("{}/profiles/1", base))
        .to_request();
    let profile: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["name"], "Dr. Full Name 1");
    assert_eq!(profile["affiliation"], "Medical Center 1");

    // Session summary
    let req = actix_test::TestRequest::get().uri(&base).to_request();
    let summary: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary.free_requests_used, 3);
    assert_eq!(summary.matched_profile_ids, vec![1, 2, 3, 4]);
}

#[actix_web::test]
async fn test_api_rejects_invalid_input_without_mutation() {
    let app = init_app!();

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({}))
        .to_request();
    let session: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    let base = format!("/api/v1/sessions/{}", session.session_id);

    let req = actix_test::TestRequest::get()
        .uri(&format!("{}/profiles?specialty=Astrology", base))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = actix_test::TestRequest::post()
        .uri(&format!("{}/matches", base))
        .set_json(json!({"profileId": 999}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = actix_test::TestRequest::get().uri(&base).to_request();
    let summary: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary.free_requests_used, 0);
    assert!(summary.matched_profile_ids.is_empty());
}

#[actix_web::test]
async fn test_api_engagement_fires_once() {
    let app = init_app!();

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({}))
        .to_request();
    let session: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/sessions/{}/engagement", session.session_id);

    let mut shown = 0;
    for offset in [100.0, 3500.0, 200.0, 3900.0] {
        let req = actix_test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({"offset": offset, "viewportHeight": 800.0, "pageHeight": 5000.0}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        if body["showConversion"] == true {
            shown += 1;
        }
    }
    assert_eq!(shown, 1);

    let req = actix_test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({"offset": -5.0, "pageHeight": 5000.0}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_api_tier_change_and_quota_reset() {
    let app = init_app!();

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({}))
        .to_request();
    let session: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    let base = format!("/api/v1/sessions/{}", session.session_id);

    for id in 1..=2 {
        let req = actix_test::TestRequest::post()
            .uri(&format!("{}/matches", base))
            .set_json(json!({"profileId": id}))
            .to_request();
        actix_test::call_service(&app, req).await;
    }

    let req = actix_test::TestRequest::put()
        .uri(&format!("{}/tier", base))
        .set_json(json!({"tier": "premium"}))
        .to_request();
    let summary: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary.tier, Tier::Premium);
    assert_eq!(summary.remaining_free, RemainingFree::Unlimited);

    let req = actix_test::TestRequest::put()
        .uri(&format!("{}/tier", base))
        .set_json(json!({"tier": "free"}))
        .to_request();
    actix_test::call_service(&app, req).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("{}/quota/reset", base))
        .to_request();
    let summary: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary.remaining_free, RemainingFree::Limited(3));
    assert_eq!(summary.matched_profile_ids, vec![1, 2]);
}

#[actix_web::test]
async fn test_api_session_lifecycle_and_options() {
    let app = init_app!();

    let req = actix_test::TestRequest::get().uri("/api/v1/catalog/options").to_request();
    let options: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(options["levels"].as_array().map(|v| v.len()), Some(4));
    assert_eq!(options["specialties"].as_array().map(|v| v.len()), Some(39));
    assert_eq!(options["freeRequestsLimit"], 3);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({"tier": "premium"}))
        .to_request();
    let session: SessionResponse = actix_test::call_and_read_body_json(&app, req).await;
    let base = format!("/api/v1/sessions/{}", session.session_id);

    let req = actix_test::TestRequest::delete().uri(&base).to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = actix_test::TestRequest::get().uri(&format!("{}/matches", base)).to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
