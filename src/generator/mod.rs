mod assign;
mod coverage;
mod feasibility;
mod resolve;
mod types;

pub use assign::assign;
pub use coverage::{shortfalls, surpluses, validate_coverage, validate_exact_coverage};
pub use feasibility::check_feasibility;
pub use resolve::{resolve, Availability};
pub use types::{
    Capacity, Demand, GeneratedSchedule, ScheduleError, ShiftRequirements, Shortfall,
    MAX_HEADCOUNT, MIN_HEADCOUNT,
};

use crate::calendar::MonthRef;
use crate::model::{Employee, ManualConstraints};
use std::collections::HashSet;
use tracing::debug;

/// Génère le planning d'un mois avec un effectif identique chaque jour.
///
/// Enchaîne résolution des contraintes, contrôle de capacité, affectation et
/// validation de couverture. Toute erreur interrompt l'appel : aucun
/// planning partiel n'est renvoyé.
pub fn generate_schedule(
    employees: &[Employee],
    month: MonthRef,
    constraints: &ManualConstraints,
    requirements: ShiftRequirements,
) -> Result<GeneratedSchedule, ScheduleError> {
    let days = month.days_in_month()?;
    requirements.validate()?;
    generate_with_demand(
        employees,
        month,
        constraints,
        Demand::uniform(requirements, days),
    )
}

/// Variante avec un besoin jour par jour.
pub fn generate_with_demand(
    employees: &[Employee],
    month: MonthRef,
    constraints: &ManualConstraints,
    demand: Demand,
) -> Result<GeneratedSchedule, ScheduleError> {
    let days = month.days_in_month()?;
    demand.validate(days)?;

    if employees.is_empty() {
        return Err(ScheduleError::NoEmployees);
    }
    let active: Vec<&Employee> = employees.iter().filter(|e| e.is_active()).collect();
    if active.is_empty() {
        return Err(ScheduleError::NoActiveEmployees);
    }
    let mut seen = HashSet::new();
    for employee in &active {
        if !seen.insert(employee.id.as_str()) {
            return Err(ScheduleError::DuplicateEmployee(employee.id.to_string()));
        }
    }

    debug!(
        year = month.year,
        month = month.month,
        days,
        active = active.len(),
        "generating schedule"
    );

    let ctx = Availability::new(active, constraints, days, month.saturdays()?);
    let template = resolve(&ctx);
    check_feasibility(&template, &ctx, &demand)?;
    let assigned = assign(&template, &ctx, &demand);
    validate_coverage(&assigned, &demand)?;

    Ok(GeneratedSchedule::new(assigned, month, demand))
}
