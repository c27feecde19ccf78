use crate::Config;
use crate::routes::{
    AppState, assessment_routes, catalog_routes, feedback, health, macrocycle_routes, onboarding,
    outdoor, ready, replanner_routes, reports, session, state_routes, week,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        // State
        .route("/api/state", get(state_routes::get_state))
        .route("/api/state", put(state_routes::put_state))
        .route("/api/state", delete(state_routes::delete_state))
        // Onboarding
        .route("/api/onboarding/defaults", get(onboarding::defaults))
        .route("/api/onboarding/complete", post(onboarding::complete))
        // Assessment & macrocycle
        .route("/api/assessment/compute", post(assessment_routes::compute))
        .route("/api/macrocycle/generate", post(macrocycle_routes::generate))
        // Week materialization
        .route("/api/week/{week_num}", get(week::get_week))
        // Replanner
        .route("/api/replanner/events", post(replanner_routes::events))
        .route("/api/replanner/override", post(replanner_routes::override_day))
        .route(
            "/api/replanner/quick-add",
            post(replanner_routes::quick_add_session),
        )
        .route(
            "/api/replanner/suggest",
            post(replanner_routes::suggest_sessions),
        )
        // Session resolution & catalog
        .route("/api/session/resolve", post(session::resolve_session))
        .route("/api/catalog/sessions", get(catalog_routes::sessions))
        .route("/api/catalog/exercises", get(catalog_routes::exercises))
        // Collectors & reports
        .route("/api/feedback", post(feedback::post_feedback))
        .route("/api/outdoor/spots", get(outdoor::get_spots))
        .route("/api/outdoor/spots", post(outdoor::add_spot))
        .route("/api/outdoor/spots/{spot_id}", delete(outdoor::delete_spot))
        .route("/api/outdoor/sessions", get(outdoor::get_sessions))
        .route("/api/outdoor/sessions", post(outdoor::log_session))
        .route("/api/outdoor/stats", get(outdoor::get_stats))
        .route("/api/reports/weekly", get(reports::weekly))
        .route("/api/reports/monthly", get(reports::monthly))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Initializing database pools...");
    let read_pool =
        crate::db::create_read_pool(&config.database.url, config.database.max_connections).await?;
    let write_pool = crate::db::create_write_pool(&config.database.url).await?;

    let state = AppState {
        read_pool,
        write_pool,
    };
    let app = create_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
