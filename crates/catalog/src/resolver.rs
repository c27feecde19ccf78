use crate::types::{
    BlockDef, Exercise, ExerciseInstance, MaxHangSuggestion, Prescription, ResolveContext,
    ResolvedBlock, ResolvedContext, ResolvedSession, SelectedExercise, SelectionTrace, SessionDef,
};
use shared::Location;
use std::collections::BTreeMap;

const RESOLVER_VERSION: &str = "0.2";

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

fn round_to_step(x: f64, step: f64) -> f64 {
    (x / step).round() * step
}

/// Normalize the available-equipment list: lowercase, deduplicated, with
/// weight subtypes exposing the canonical `weight` token.
fn normalize_equipment(raw: &[String]) -> Vec<String> {
    let mut equipment: Vec<String> = raw
        .iter()
        .map(|e| norm(e))
        .filter(|e| !e.is_empty() && e != "floor")
        .collect();
    equipment.sort();
    equipment.dedup();

    let has_weight_subtype = equipment
        .iter()
        .any(|e| matches!(e.as_str(), "dumbbell" | "kettlebell" | "barbell"));
    if has_weight_subtype && !equipment.iter().any(|e| e == "weight") {
        equipment.push("weight".to_string());
    }
    equipment
}

fn intersects(a: &[String], b: &[String]) -> bool {
    a.iter().any(|x| b.iter().any(|y| x == y))
}

fn subset_of(needles: &[String], haystack: &[String]) -> bool {
    needles.iter().all(|n| haystack.iter().any(|h| h == n))
}

/// Hard-filter exercise selection: location, equipment, role (any-match),
/// then domain — applied only when it leaves candidates. Deterministic
/// tie-break by exercise id.
fn pick_best_exercise<'a>(
    exercises: &'a [Exercise],
    location: Location,
    equipment: &[String],
    role_req: &[String],
    domain_req: &[String],
) -> (Option<&'a Exercise>, SelectionTrace) {
    let mut counts = BTreeMap::new();
    counts.insert("start".to_string(), exercises.len());

    let after_location: Vec<&Exercise> = exercises
        .iter()
        .filter(|e| e.location_allowed.contains(&location))
        .collect();
    counts.insert("after_location".to_string(), after_location.len());

    let after_equipment: Vec<&Exercise> = after_location
        .into_iter()
        .filter(|e| {
            let required: Vec<String> = e.equipment_required.iter().map(|s| norm(s)).collect();
            if !required.is_empty() && !subset_of(&required, equipment) {
                return false;
            }
            let any: Vec<String> = e.equipment_required_any.iter().map(|s| norm(s)).collect();
            any.is_empty() || intersects(&any, equipment)
        })
        .collect();
    counts.insert("after_equipment".to_string(), after_equipment.len());

    let role_req: Vec<String> = role_req.iter().map(|s| norm(s)).collect();
    let after_role: Vec<&Exercise> = if role_req.is_empty() {
        after_equipment
    } else {
        after_equipment
            .into_iter()
            .filter(|e| {
                let roles: Vec<String> = e.role.iter().map(|s| norm(s)).collect();
                intersects(&roles, &role_req)
            })
            .collect()
    };
    counts.insert("after_role".to_string(), after_role.len());

    if after_role.is_empty() {
        return (
            None,
            SelectionTrace {
                counts,
                domain_filter_applied: Some(false),
                note: None,
            },
        );
    }

    let domain_req: Vec<String> = domain_req.iter().map(|s| norm(s)).collect();
    let mut domain_applied = false;
    let mut candidates = after_role;
    if !domain_req.is_empty() {
        let after_domain: Vec<&Exercise> = candidates
            .iter()
            .copied()
            .filter(|e| {
                let domains: Vec<String> = e.domain.iter().map(|s| norm(s)).collect();
                intersects(&domains, &domain_req)
            })
            .collect();
        if !after_domain.is_empty() {
            domain_applied = true;
            candidates = after_domain;
        }
    }
    counts.insert("after_domain".to_string(), candidates.len());

    candidates.sort_by(|a, b| norm(&a.exercise_id).cmp(&norm(&b.exercise_id)));
    (
        candidates.first().copied(),
        SelectionTrace {
            counts,
            domain_filter_applied: Some(domain_applied),
            note: None,
        },
    )
}

fn merged_prescription(exercise: &Exercise, block: &BlockDef) -> Prescription {
    let mut merged = exercise.defaults.clone();
    for (key, value) in &block.prescription {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn apply_load_override(
    merged: &mut Prescription,
    ctx: &ResolveContext,
    exercise_id: &str,
) {
    let Some(current) = merged.get("load_kg").and_then(|v| v.as_f64()) else {
        return;
    };
    let Some(load_override) = ctx.load_overrides.get(exercise_id) else {
        return;
    };
    let adjusted = match load_override {
        crate::types::LoadOverride::AbsoluteLoadKg(v) => *v,
        crate::types::LoadOverride::DeltaKg(v) => current + v,
        crate::types::LoadOverride::Multiplier(v) => current * v,
    };
    if let Some(value) = serde_json::Number::from_f64(round_to_step(adjusted, 0.5)) {
        merged.insert("load_kg".to_string(), serde_json::Value::Number(value));
    }
}

/// Suggest a max-hang target load from the user's hangboard baselines and
/// the prescribed intensity percentage.
fn suggest_max_hang(ctx: &ResolveContext, prescription: &Prescription) -> Option<MaxHangSuggestion> {
    let bodyweight = ctx.bodyweight_kg?;
    let intensity = prescription
        .get("intensity_pct_of_total_load")
        .and_then(|v| v.as_f64())?;
    let hang_seconds = prescription
        .get("hang_seconds")
        .and_then(|v| v.as_u64())
        .unwrap_or(5) as u32;

    let baseline = ctx
        .hangboard_baselines
        .iter()
        .find(|b| b.edge_mm == 20 && norm(&b.grip) == "half_crimp" && b.hang_seconds == hang_seconds)
        .or_else(|| ctx.hangboard_baselines.first())?;
    let max_total = baseline.max_total_load_kg?;

    let target_total = intensity * max_total;
    let added = target_total - bodyweight;
    Some(MaxHangSuggestion {
        baseline_id: baseline.baseline_id.clone(),
        intensity_pct_of_total_load: intensity,
        target_total_load_kg: round_to_step(target_total, 0.5),
        added_weight_kg: if added >= 0.0 { round_to_step(added, 0.5) } else { 0.0 },
        assistance_kg: if added < 0.0 { round_to_step(-added, 0.5) } else { 0.0 },
        based_on_max_total_load_kg: max_total,
        based_on_bodyweight_kg: bodyweight,
    })
}

/// Expand a session definition into concrete exercises for a context.
/// Pure: the same (session, exercises, context) always yields the same
/// `ResolvedSession`.
pub fn resolve(
    session: &SessionDef,
    exercises: &[Exercise],
    ctx: &ResolveContext,
) -> ResolvedSession {
    let location = ctx.location.unwrap_or(Location::Home);
    let equipment = normalize_equipment(&ctx.available_equipment);

    let mut blocks = Vec::with_capacity(session.blocks.len());
    let mut instances = Vec::new();
    let mut instance_counter = 0usize;
    let mut main_block_unfilled = false;

    for block in &session.blocks {
        let block_uid = format!("{}.{}", session.session_id, block.block_id);

        if block.is_instruction_only() {
            blocks.push(ResolvedBlock {
                block_uid,
                block_id: block.block_id.clone(),
                block_type: block.block_type.clone(),
                status: "selected".to_string(),
                message: Some("Instruction-only block (no exercise selection).".to_string()),
                instructions: block.instructions.clone(),
                selected_exercises: Vec::new(),
                filter_trace: SelectionTrace {
                    counts: BTreeMap::new(),
                    domain_filter_applied: None,
                    note: Some("instruction_only: no selection performed".to_string()),
                },
            });
            continue;
        }

        let (selected, trace, picked_by) = if let Some(explicit_id) = &block.exercise_id {
            let found = exercises
                .iter()
                .find(|e| norm(&e.exercise_id) == norm(explicit_id));
            (
                found,
                SelectionTrace {
                    counts: BTreeMap::new(),
                    domain_filter_applied: None,
                    note: Some("explicit_exercise_id: bypassed hard filters".to_string()),
                },
                "explicit_exercise_id",
            )
        } else if block.role.is_empty() {
            (
                None,
                SelectionTrace {
                    counts: BTreeMap::new(),
                    domain_filter_applied: None,
                    note: Some("Missing block.role (required for selection).".to_string()),
                },
                "missing_role",
            )
        } else {
            let (found, trace) =
                pick_best_exercise(exercises, location, &equipment, &block.role, &block.domain);
            (found, trace, "hard_filters")
        };

        let mut selected_exercises = Vec::new();
        if let Some(exercise) = selected {
            instance_counter += 1;
            let mut merged = merged_prescription(exercise, block);
            apply_load_override(&mut merged, ctx, &exercise.exercise_id);

            let suggested = if exercise.exercise_id == "max_hang_20mm" {
                suggest_max_hang(ctx, &merged)
            } else {
                None
            };

            instances.push(ExerciseInstance {
                instance_id: format!("{}_{:02}", block.block_id, instance_counter),
                exercise_id: exercise.exercise_id.clone(),
                prescription: merged.clone(),
                block_uid: block_uid.clone(),
                picked_by: picked_by.to_string(),
                suggested,
            });
            selected_exercises.push(SelectedExercise {
                exercise_id: exercise.exercise_id.clone(),
                prescription: merged,
            });
        } else if block.block_type == "main" {
            main_block_unfilled = true;
        }

        let status = if selected_exercises.is_empty() { "skipped" } else { "selected" };
        let message = selected_exercises
            .is_empty()
            .then(|| "No candidates after hard filters.".to_string());
        blocks.push(ResolvedBlock {
            block_uid,
            block_id: block.block_id.clone(),
            block_type: block.block_type.clone(),
            status: status.to_string(),
            message,
            instructions: Prescription::new(),
            selected_exercises,
            filter_trace: trace,
        });
    }

    ResolvedSession {
        resolver_version: RESOLVER_VERSION.to_string(),
        session_id: session.session_id.clone(),
        session_version: session.version.clone(),
        context: ResolvedContext {
            location,
            gym_id: ctx.gym_id.clone(),
            available_equipment: equipment,
        },
        blocks,
        exercise_instances: instances,
        resolution_status: if main_block_unfilled { "failed" } else { "success" }.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_subtypes_imply_canonical_weight() {
        let eq = normalize_equipment(&["Kettlebell".to_string(), "floor".to_string()]);
        assert_eq!(eq, vec!["kettlebell".to_string(), "weight".to_string()]);
    }

    #[test]
    fn rounding_to_half_kilo() {
        assert_eq!(round_to_step(47.3, 0.5), 47.5);
        assert_eq!(round_to_step(47.2, 0.5), 47.0);
    }
}
