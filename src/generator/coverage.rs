use super::{Demand, ScheduleError, Shortfall};
use crate::model::{ScheduleTemplate, ShiftKind};
use tracing::warn;

/// Parcourt chaque (jour, garde) et garde les écarts retenus par `keep`.
fn gaps(
    template: &ScheduleTemplate,
    demand: &Demand,
    keep: impl Fn(usize, usize) -> bool,
) -> Vec<Shortfall> {
    let mut out = Vec::new();

    for day in 0..demand.days() {
        for kind in ShiftKind::ALL {
            let needed = demand.needed(kind, day);
            let assigned = template.count(day, kind.code());
            if keep(needed, assigned) {
                out.push(Shortfall {
                    day: day + 1,
                    kind,
                    needed,
                    assigned,
                });
            }
        }
    }

    out
}

/// Recompte chaque (jour, garde) et liste toutes les sous-dotations.
pub fn shortfalls(template: &ScheduleTemplate, demand: &Demand) -> Vec<Shortfall> {
    gaps(template, demand, |needed, assigned| assigned < needed)
}

/// Gardes dotées au-delà du besoin (planning retouché à la main).
pub fn surpluses(template: &ScheduleTemplate, demand: &Demand) -> Vec<Shortfall> {
    gaps(template, demand, |needed, assigned| assigned > needed)
}

pub fn validate_coverage(template: &ScheduleTemplate, demand: &Demand) -> Result<(), ScheduleError> {
    let missing = shortfalls(template, demand);
    if missing.is_empty() {
        return Ok(());
    }
    warn!(count = missing.len(), "uncovered shifts");
    Err(ScheduleError::UncoveredShifts(missing))
}

/// Couverture exacte : ni sous-dotation ni sur-dotation. Les manques
/// passent en premier.
pub fn validate_exact_coverage(
    template: &ScheduleTemplate,
    demand: &Demand,
) -> Result<(), ScheduleError> {
    validate_coverage(template, demand)?;
    let extra = surpluses(template, demand);
    if extra.is_empty() {
        return Ok(());
    }
    warn!(count = extra.len(), "overstaffed shifts");
    Err(ScheduleError::OverstaffedShifts(extra))
}
