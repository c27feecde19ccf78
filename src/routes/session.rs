use crate::AppError;
use crate::routes::AppState;
use crate::state::{self, UserState};
use axum::{Json, extract::State};
use catalog::{ResolveContext, ResolvedSession, load_exercises, load_session, resolve};
use serde::{Deserialize, Serialize};
use shared::Location;

/// Client-supplied context overrides; everything else comes from state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextPatch {
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub gym_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub session_id: String,
    #[serde(default)]
    pub context: Option<ContextPatch>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub resolved: ResolvedSession,
}

/// Build the resolution context for a location from the state document:
/// the equipment available there, load overrides and baselines.
fn build_context(user_state: &UserState, patch: &ContextPatch) -> ResolveContext {
    let location = patch.location.unwrap_or(Location::Home);

    let available_equipment = match location {
        Location::Home => user_state.equipment.home.clone(),
        Location::Gym => {
            let gym_id = patch
                .gym_id
                .clone()
                .or_else(|| user_state.planning_prefs.default_gym_id.clone());
            let gym = match &gym_id {
                Some(id) => user_state.equipment.gyms.iter().find(|g| &g.gym_id == id),
                None => user_state
                    .equipment
                    .gyms
                    .iter()
                    .min_by(|a, b| a.priority.cmp(&b.priority).then(a.gym_id.cmp(&b.gym_id))),
            };
            gym.map(|g| g.equipment.clone()).unwrap_or_default()
        }
        Location::Outdoor => Vec::new(),
    };

    ResolveContext {
        location: Some(location),
        gym_id: patch.gym_id.clone(),
        available_equipment,
        bodyweight_kg: user_state
            .bodyweight_kg
            .or(user_state.assessment.input.body.weight_kg),
        hangboard_baselines: user_state.baselines.hangboard.clone(),
        load_overrides: user_state.overrides.per_exercise.clone(),
    }
}

/// POST /api/session/resolve — expand a session into concrete exercises
/// for the current context. Pure per (session, context): the client may
/// cache the result until the context changes.
pub async fn resolve_session(
    State(app): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, AppError> {
    let session = load_session(&req.session_id)?;
    let exercises = load_exercises()?;

    let user_state = state::read(&app.read_pool).await?;
    let ctx = build_context(&user_state, &req.context.unwrap_or_default());

    Ok(Json(ResolveResponse {
        resolved: resolve(&session, &exercises, &ctx),
    }))
}
