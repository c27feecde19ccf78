use crate::types::{DomainWeights, Macrocycle, PhaseId};
use crate::MacrocycleError;
use chrono::{Days, NaiveDate};
use shared::Intensity;

/// Everything the week materializer needs to know about one absolute week
/// of the macrocycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseContext {
    pub phase_id: PhaseId,
    pub domain_weights: DomainWeights,
    pub session_pool: Vec<String>,
    pub intensity_cap: Intensity,
    /// Monday of the materialized week.
    pub start_date: NaiveDate,
    /// 1-based absolute week number.
    pub week_num: u32,
    pub is_last_week_of_phase: bool,
}

/// Which (phase index, week-within-phase) `today` falls in, both 0-based.
/// Before the start resolves to the first week; past the end to the last.
pub fn current_phase_and_week(
    macrocycle: &Macrocycle,
    today: NaiveDate,
) -> Result<(usize, u32), MacrocycleError> {
    if macrocycle.phases.is_empty() {
        return Err(MacrocycleError::NoPhases);
    }

    let mut cumulative_weeks: u64 = 0;
    for (pi, phase) in macrocycle.phases.iter().enumerate() {
        let duration = phase.duration_weeks.max(1);
        let phase_start = macrocycle.start_date + Days::new(7 * cumulative_weeks);
        let phase_end = phase_start + Days::new(7 * duration as u64);
        if today < phase_end {
            let weeks_into = if today <= phase_start {
                0
            } else {
                ((today - phase_start).num_days() / 7) as u32
            };
            return Ok((pi, weeks_into.min(duration - 1)));
        }
        cumulative_weeks += duration as u64;
    }

    let last = macrocycle.phases.len() - 1;
    let duration = macrocycle.phases[last].duration_weeks.max(1);
    Ok((last, duration - 1))
}

/// Resolve a 1-based absolute `week_num` (0 = the week containing `today`)
/// into the phase context the materializer consumes.
pub fn week_context(
    macrocycle: &Macrocycle,
    week_num: u32,
    today: NaiveDate,
) -> Result<PhaseContext, MacrocycleError> {
    if macrocycle.phases.is_empty() {
        return Err(MacrocycleError::NoPhases);
    }

    let week_num = if week_num == 0 {
        let (pi, wi) = current_phase_and_week(macrocycle, today)?;
        let cumulative: u32 = macrocycle.phases[..pi].iter().map(|p| p.duration_weeks).sum();
        cumulative + wi + 1
    } else {
        week_num
    };

    let mut cumulative: u32 = 0;
    for phase in &macrocycle.phases {
        let duration = phase.duration_weeks;
        if week_num <= cumulative + duration {
            let week_in_phase = week_num - cumulative - 1;
            let week_start =
                macrocycle.start_date + Days::new(7 * (cumulative + week_in_phase) as u64);
            return Ok(PhaseContext {
                phase_id: phase.phase_id,
                domain_weights: phase.domain_weights.clone(),
                session_pool: phase.session_pool.clone(),
                intensity_cap: phase.intensity_cap,
                start_date: week_start,
                week_num,
                is_last_week_of_phase: week_in_phase == duration - 1,
            });
        }
        cumulative += duration;
    }

    Err(MacrocycleError::WeekOutOfRange {
        week_num,
        total_weeks: cumulative,
    })
}
