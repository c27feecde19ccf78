use crate::AppError;
use crate::routes::AppState;
use crate::state::{self, AssessmentRecord, Equipment, LimitationDetail, Limitations, UserInfo, UserState};
use assessment::{
    AssessmentInput, AssessmentProfile, BodyMetrics, Discipline, Experience, GradeHistory, Goal,
    GRADE_ORDER, SelfEval, TestResults, compute_profile,
};
use axum::{Json, extract::State};
use chrono::Utc;
use macrocycle::{Macrocycle, Trip};
use planner::{Availability, PlanningPrefs};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::next_monday;

const BOULDER_GRADE_ORDER: [&str; 21] = [
    "5A", "5B", "5C", "6A", "6A+", "6B", "6B+", "6C", "6C+", "7A", "7A+", "7B", "7B+", "7C",
    "7C+", "8A", "8A+", "8B", "8B+", "8C", "8C+",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub body_fat_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingData {
    #[serde(default)]
    pub profile: OnboardingProfile,
    #[serde(default)]
    pub experience: Experience,
    #[serde(default)]
    pub grades: GradeHistory,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub self_eval: SelfEval,
    #[serde(default)]
    pub tests: TestResults,
    #[serde(default)]
    pub limitations: Vec<LimitationDetail>,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub planning_prefs: Option<PlanningPrefs>,
    #[serde(default)]
    pub trips: Vec<Trip>,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub profile: AssessmentProfile,
    pub macrocycle: Macrocycle,
}

/// GET /api/onboarding/defaults — option lists for the wizard.
pub async fn defaults() -> Json<serde_json::Value> {
    Json(json!({
        "grades": GRADE_ORDER,
        "boulder_grades": BOULDER_GRADE_ORDER,
        "disciplines": ["lead", "boulder"],
        "weakness_options": [
            { "id": "pump_too_early", "label": "I pump out too early" },
            { "id": "fingers_give_out", "label": "My fingers give out" },
            { "id": "cant_hold_hard_moves", "label": "Can't hold hard moves" },
            { "id": "technique_errors", "label": "Technique errors" },
            { "id": "cant_read_routes", "label": "Can't read routes" },
            { "id": "cant_manage_rests", "label": "Can't manage rests" },
            { "id": "lack_power", "label": "Lack explosive power" },
            { "id": "injury_prone", "label": "Frequent injuries" }
        ],
        "equipment_home": [
            "hangboard", "pullup_bar", "band", "dumbbell", "kettlebell", "ab_wheel",
            "rings", "foam_roller", "resistance_band", "pinch_block"
        ],
        "equipment_gym": [
            "gym_boulder", "gym_routes", "spraywall", "board_kilter", "board_moonboard",
            "campus_board", "hangboard", "dumbbell", "barbell", "bench", "cable_machine",
            "leg_press"
        ],
        "limitation_areas": ["elbow", "shoulder", "wrist", "knee", "back"],
        "slots": ["morning", "lunch", "evening"],
        "weekdays": ["mon", "tue", "wed", "thu", "fri", "sat", "sun"]
    }))
}

fn build_user_state(data: OnboardingData) -> UserState {
    let OnboardingData {
        profile,
        experience,
        grades,
        mut goal,
        self_eval,
        tests,
        limitations,
        equipment,
        availability,
        planning_prefs,
        trips,
    } = data;

    // Backfill the goal's current grade from reported grades
    if goal.current_grade.is_none() {
        goal.current_grade = match goal.discipline {
            Some(Discipline::Boulder) => grades.boulder_max_rp.clone(),
            _ => grades.lead_max_rp.clone(),
        };
    }

    let active_flags = limitations
        .iter()
        .map(|l| format!("{}_{}", l.area, l.side.as_deref().unwrap_or("both")))
        .collect();

    UserState {
        user: UserInfo {
            id: profile.name.to_lowercase().replace(' ', "_"),
            name: profile.name,
            preferred_name: profile.preferred_name,
            timezone: None,
        },
        bodyweight_kg: profile.weight_kg,
        assessment: AssessmentRecord {
            input: AssessmentInput {
                body: BodyMetrics {
                    weight_kg: profile.weight_kg,
                    height_cm: profile.height_cm,
                    body_fat_pct: profile.body_fat_pct,
                },
                experience,
                grades,
                tests,
                self_eval,
            },
            profile: None,
            last_assessed: None,
        },
        goal,
        availability,
        equipment,
        planning_prefs: planning_prefs.unwrap_or_default(),
        limitations: Limitations {
            active_flags,
            details: limitations,
        },
        trips,
        ..UserState::default()
    }
}

/// POST /api/onboarding/complete — atomic onboarding: build the state
/// document, compute the profile, generate the first macrocycle.
///
/// The client's wizard gates this call on a complete goal; an
/// incomplete one is rejected here as well rather than producing a
/// planless profile.
pub async fn complete(
    State(app): State<AppState>,
    Json(data): Json<OnboardingData>,
) -> Result<Json<OnboardingResponse>, AppError> {
    if data.goal.target_grade.is_none() || data.goal.deadline.is_none() {
        return Err(AppError::Validation(
            "Goal needs a target_grade and a deadline before a plan can be generated".to_string(),
        ));
    }

    let mut user_state = build_user_state(data);

    let today = Utc::now().date_naive();
    let profile = compute_profile(&user_state.assessment.input, &user_state.goal)?;
    user_state.assessment.profile = Some(profile);
    user_state.assessment.last_assessed = Some(today);

    let start = next_monday(today);
    let macrocycle = macrocycle::generate(
        &user_state.goal,
        &profile,
        &user_state.trips,
        start,
        12,
        Utc::now(),
    )?;
    user_state.macrocycle = Some(macrocycle.clone());

    let mut tx = app.write_pool.begin().await?;
    state::save(&mut tx, &user_state).await?;
    tx.commit().await?;

    Ok(Json(OnboardingResponse {
        profile,
        macrocycle,
    }))
}
