use super::{Availability, Capacity, Demand, ScheduleError};
use crate::model::{ScheduleTemplate, ShiftKind};
use tracing::{debug, warn};

/// Contrôle agrégé : cases ouvertes sur le mois >= gardes demandées.
///
/// Ne garantit rien jour par jour ; un mois accepté ici peut encore échouer
/// à la validation de couverture.
pub fn check_feasibility(
    template: &ScheduleTemplate,
    ctx: &Availability<'_>,
    demand: &Demand,
) -> Result<Capacity, ScheduleError> {
    let mut available = 0usize;
    for day in 0..ctx.days() {
        for row in 0..ctx.employees().len() {
            if ctx.is_blocked(row, day) {
                continue;
            }
            if template.slot(row, day).is_none() {
                available += 1;
            }
        }
    }

    let capacity = Capacity {
        needed_day: demand.total(ShiftKind::Day),
        needed_night: demand.total(ShiftKind::Night),
        available,
    };

    if capacity.available < capacity.needed() {
        warn!(
            needed = capacity.needed(),
            available, "not enough open slots for the month"
        );
        return Err(ScheduleError::InsufficientCapacity {
            needed: capacity.needed(),
            available,
        });
    }

    debug!(
        needed_day = capacity.needed_day,
        needed_night = capacity.needed_night,
        available,
        "aggregate capacity ok"
    );
    Ok(capacity)
}
