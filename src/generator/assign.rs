use super::{Availability, Demand};
use crate::model::{ScheduleTemplate, ShiftKind};
use tracing::debug;

/// Affectation gloutonne, jour par jour, garde de jour avant garde de nuit.
///
/// Les éligibles sont triés (tri stable) par nombre de gardes déjà
/// travaillées ; les `n` premiers prennent la garde. Aucun retour arrière.
pub fn assign(
    template: &ScheduleTemplate,
    ctx: &Availability<'_>,
    demand: &Demand,
) -> ScheduleTemplate {
    let mut next = template.clone();
    let mut load: Vec<usize> = (0..next.len())
        .map(|row| next.working_shifts_at(row))
        .collect();

    for day in 0..ctx.days() {
        for kind in ShiftKind::ALL {
            let needed = demand.needed(kind, day);

            let mut eligible: Vec<usize> = (0..next.len())
                .filter(|&row| next.slot(row, day).is_none() && !ctx.is_blocked(row, day))
                .collect();
            eligible.sort_by_key(|&row| load[row]);

            for &row in eligible.iter().take(needed) {
                if next.fill(row, day, kind.code()) {
                    load[row] += 1;
                }
            }

            if eligible.len() < needed {
                debug!(
                    day = day + 1,
                    shift = %kind,
                    needed,
                    eligible = eligible.len(),
                    "shift left short"
                );
            }
        }
    }

    next
}
