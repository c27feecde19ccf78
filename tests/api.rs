use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cruxplan::routes::AppState;
use cruxplan::server::create_router;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// In-memory app. A single 1-connection pool backs both pool handles so
/// reads and writes see the same database.
async fn test_app() -> Router {
    let pool = cruxplan::db::create_pool("sqlite::memory:", 1)
        .await
        .expect("pool");
    cruxplan::db::run_migrations(&pool).await.expect("migrations");
    create_router(AppState {
        read_pool: pool.clone(),
        write_pool: pool,
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn onboarding_body() -> Value {
    json!({
        "profile": { "name": "Test Climber", "weight_kg": 72.0, "body_fat_pct": 14.0 },
        "experience": { "climbing_years": 8 },
        "grades": { "lead_max_rp": "7b", "lead_max_os": "7a" },
        "goal": {
            "goal_type": "grade",
            "discipline": "lead",
            "target_grade": "7c+",
            "deadline": "2027-01-04"
        },
        "self_eval": { "primary_weakness": "pump_too_early" },
        "tests": { "max_hang_20mm_5s_total_kg": 100.0 },
        "equipment": {
            "home": ["hangboard", "pullup_bar", "band"],
            "gyms": [{ "gym_id": "gym_main", "name": "Main Gym", "priority": 1,
                       "equipment": ["gym_boulder", "gym_routes", "hangboard", "barbell"] }]
        },
        "availability": {},
        "planning_prefs": { "hard_day_cap_per_week": 3, "target_training_days_per_week": 4 },
        "trips": []
    })
}

async fn onboarded_app() -> Router {
    let app = test_app().await;
    let (status, _) = send(&app, "POST", "/api/onboarding/complete", Some(onboarding_body())).await;
    assert_eq!(status, StatusCode::OK);
    app
}

#[tokio::test]
async fn health_and_ready() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn onboarding_builds_profile_and_macrocycle() {
    let app = test_app().await;
    let (status, body) =
        send(&app, "POST", "/api/onboarding/complete", Some(onboarding_body())).await;
    assert_eq!(status, StatusCode::OK);

    let profile = &body["profile"];
    for axis in [
        "finger_strength",
        "pulling_strength",
        "power_endurance",
        "technique",
        "endurance",
        "body_composition",
    ] {
        let score = profile[axis].as_u64().unwrap();
        assert!(score <= 100, "{axis} out of range");
    }

    let phases = body["macrocycle"]["phases"].as_array().unwrap();
    let total: u64 = phases.iter().map(|p| p["duration_weeks"].as_u64().unwrap()).sum();
    assert_eq!(total, body["macrocycle"]["total_weeks"].as_u64().unwrap());
}

#[tokio::test]
async fn onboarding_without_goal_is_rejected() {
    let app = test_app().await;
    let mut body = onboarding_body();
    body["goal"] = json!({});
    let (status, _) = send(&app, "POST", "/api/onboarding/complete", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn week_requires_a_macrocycle() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/week/1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("macrocycle"));
}

#[tokio::test]
async fn week_fetch_is_stable_until_forced() {
    let app = onboarded_app().await;

    let (status, first) = send(&app, "GET", "/api/week/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["week_num"], 1);
    assert_eq!(first["week_plan"]["weeks"][0]["days"].as_array().unwrap().len(), 7);

    // Unforced re-fetch returns the cached document verbatim
    let (_, second) = send(&app, "GET", "/api/week/1", None).await;
    assert_eq!(first, second);

    // Forced regeneration still yields a structurally complete week
    let (status, forced) = send(&app, "GET", "/api/week/1?force=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(forced["week_plan"]["weeks"][0]["days"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn week_beyond_the_macrocycle_is_not_found() {
    let app = onboarded_app().await;
    let (status, _) = send(&app, "GET", "/api/week/40", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn events_round_trip_is_idempotent() {
    let app = onboarded_app().await;
    let (_, week) = send(&app, "GET", "/api/week/1", None).await;
    let plan = week["week_plan"].clone();

    // Find a day with a session
    let (date, session_ref) = plan["weeks"][0]["days"]
        .as_array()
        .unwrap()
        .iter()
        .find_map(|d| {
            d["sessions"].as_array().unwrap().first().map(|s| {
                (
                    d["date"].as_str().unwrap().to_string(),
                    s["session_id"].as_str().unwrap().to_string(),
                )
            })
        })
        .expect("a scheduled session");

    let event = json!({ "event_type": "mark_done", "date": date, "session_ref": session_ref });
    let (status, once) = send(
        &app,
        "POST",
        "/api/replanner/events",
        Some(json!({ "events": [event], "week_plan": plan })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, twice) = send(
        &app,
        "POST",
        "/api/replanner/events",
        Some(json!({ "events": [event], "week_plan": once["week_plan"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(once["week_plan"]["weeks"], twice["week_plan"]["weeks"]);

    // The done status survives the next unforced fetch
    let (_, fetched) = send(&app, "GET", "/api/week/1", None).await;
    let day = fetched["week_plan"]["weeks"][0]["days"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["date"] == date.as_str())
        .unwrap();
    let slot = day["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["session_id"] == session_ref.as_str())
        .unwrap();
    assert_eq!(slot["status"], "done");
}

#[tokio::test]
async fn override_rest_round_trips_through_the_cache() {
    let app = onboarded_app().await;
    let (_, week) = send(&app, "GET", "/api/week/1", None).await;
    let plan = week["week_plan"].clone();
    let target = plan["weeks"][0]["days"][2]["date"].as_str().unwrap().to_string();
    let reference = plan["weeks"][0]["days"][1]["date"].as_str().unwrap().to_string();

    let (status, overridden) = send(
        &app,
        "POST",
        "/api/replanner/override",
        Some(json!({
            "intent": "rest",
            "location": "home",
            "reference_date": reference,
            "target_date": target,
            "week_plan": plan
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let day = overridden["week_plan"]["weeks"][0]["days"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["date"] == target.as_str())
        .unwrap();
    assert!(day["sessions"].as_array().unwrap().is_empty());
    assert_eq!(day["status"], "planned");

    // Fetching the week again (no force) returns the same rest day
    let (_, fetched) = send(&app, "GET", "/api/week/1", None).await;
    let day = fetched["week_plan"]["weeks"][0]["days"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["date"] == target.as_str())
        .unwrap();
    assert!(day["sessions"].as_array().unwrap().is_empty());
    assert_eq!(day["status"], "planned");
}

#[tokio::test]
async fn quick_add_past_the_cap_warns_and_inserts() {
    let app = onboarded_app().await;

    // Tighten the cap so a couple of quick-adds exceed it
    let (status, _) = send(
        &app,
        "PUT",
        "/api/state",
        Some(json!({ "planning_prefs": { "hard_day_cap_per_week": 1 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, week) = send(&app, "GET", "/api/week/1", None).await;
    let mut plan = week["week_plan"].clone();
    let days: Vec<String> = plan["weeks"][0]["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["date"].as_str().unwrap().to_string())
        .collect();

    // Two hard additions on separate days at a free slot
    let mut warnings = Vec::new();
    for date in &days[..2] {
        let (status, response) = send(
            &app,
            "POST",
            "/api/replanner/quick-add",
            Some(json!({
                "session_id": "power_contact_gym",
                "target_date": date,
                "slot": "morning",
                "location": "gym",
                "week_plan": plan
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        warnings = response["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w.as_str().unwrap().to_string())
            .collect();
        plan = response["week_plan"].clone();
    }

    assert!(!warnings.is_empty(), "expected hard-cap warnings");
    let added: usize = plan["weeks"][0]["days"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|d| d["sessions"].as_array().unwrap())
        .filter(|s| s["session_id"] == "power_contact_gym")
        .count();
    assert_eq!(added, 2, "both sessions present despite warnings");
}

#[tokio::test]
async fn suggestions_endpoint_returns_candidates() {
    let app = onboarded_app().await;
    let (_, week) = send(&app, "GET", "/api/week/1", None).await;
    let plan = week["week_plan"].clone();
    let date = plan["weeks"][0]["days"][6]["date"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/replanner/suggest",
        Some(json!({ "target_date": date, "location": "gym", "week_plan": plan })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty() && suggestions.len() <= 3);
    assert!(suggestions[0]["session_id"].is_string());
    assert!(suggestions[0]["reason"].is_string());
}

#[tokio::test]
async fn session_resolution_uses_state_equipment() {
    let app = onboarded_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/session/resolve",
        Some(json!({ "session_id": "finger_strength_home", "context": { "location": "home" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resolved"]["resolution_status"], "success");
    assert!(
        body["resolved"]["exercise_instances"]
            .as_array()
            .unwrap()
            .iter()
            .any(|i| i["exercise_id"] == "max_hang_20mm")
    );

    let (status, _) = send(
        &app,
        "POST",
        "/api/session/resolve",
        Some(json!({ "session_id": "no_such_session" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_endpoints_list_content() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/catalog/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64().unwrap() as usize, body["sessions"].as_array().unwrap().len());

    let (status, body) = send(&app, "GET", "/api/catalog/exercises", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["count"].as_u64().unwrap() >= 20);
}

#[tokio::test]
async fn feedback_feeds_reports_and_working_loads() {
    let app = onboarded_app().await;
    let (_, week) = send(&app, "GET", "/api/week/1", None).await;
    let week_start = week["week_plan"]["start_date"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback",
        Some(json!({
            "log_entry": {
                "date": week_start,
                "session_id": "finger_strength_home",
                "duration_minutes": 60,
                "overall_feeling": "hard",
                "exercise_results": [
                    { "exercise_id": "max_hang_20mm", "sets_completed": 5, "top_load_kg": 104.0 }
                ]
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, state_doc) = send(&app, "GET", "/api/state", None).await;
    let loads = state_doc["working_loads"]["entries"].as_array().unwrap();
    assert_eq!(loads[0]["exercise_id"], "max_hang_20mm");
    assert_eq!(loads[0]["load_kg"], 104.0);

    let (status, report) = send(
        &app,
        "GET",
        &format!("/api/reports/weekly?week_start={week_start}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["completed_sessions"], 1);
    assert!(report["planned_sessions"].as_u64().unwrap() > 0);

    let month = &week_start[..7];
    let (status, report) = send(&app, "GET", &format!("/api/reports/monthly?month={month}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_indoor_sessions"], 1);
}

#[tokio::test]
async fn invalid_feedback_is_rejected() {
    let app = onboarded_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/feedback",
        Some(json!({
            "log_entry": { "date": "2026-03-02", "session_id": "", "overall_feeling": "brutal" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn outdoor_spots_and_sessions_flow() {
    let app = onboarded_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/outdoor/spots",
        Some(json!({ "id": "spot_ceuse", "name": "Céüse", "discipline": "lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spot"]["id"], "spot_ceuse");

    // Duplicate id conflicts
    let (status, _) = send(
        &app,
        "POST",
        "/api/outdoor/spots",
        Some(json!({ "id": "spot_ceuse", "name": "Céüse again", "discipline": "lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/outdoor/sessions",
        Some(json!({
            "log_version": "outdoor.v1",
            "date": "2026-04-04",
            "spot_name": "Céüse",
            "discipline": "lead",
            "duration_minutes": 240,
            "routes": [
                { "name": "Berlin", "grade": "7b", "style": "onsight", "attempts": [{ "result": "sent" }] }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = send(&app, "GET", "/api/outdoor/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["top_grade_sent"], "7b");

    let (status, _) = send(&app, "DELETE", "/api/outdoor/spots/spot_ceuse", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, spots) = send(&app, "GET", "/api/outdoor/spots", None).await;
    assert!(spots["spots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn state_reset_wipes_the_plan() {
    let app = onboarded_app().await;

    let (status, body) = send(&app, "DELETE", "/api/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "reset");
    assert!(body["state"]["macrocycle"].is_null());

    let (status, _) = send(&app, "GET", "/api/week/1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn macrocycle_regeneration_replaces_wholesale() {
    let app = onboarded_app().await;
    let (_, before) = send(&app, "GET", "/api/state", None).await;
    let old_start = before["macrocycle"]["start_date"].clone();

    let (status, body) = send(
        &app,
        "POST",
        "/api/macrocycle/generate",
        Some(json!({ "start_date": "2026-02-02", "total_weeks": 16 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["macrocycle"]["total_weeks"], 16);
    assert_ne!(body["macrocycle"]["start_date"], old_start);

    // Out-of-range total_weeks is a validation error
    let (status, _) = send(
        &app,
        "POST",
        "/api/macrocycle/generate",
        Some(json!({ "total_weeks": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
