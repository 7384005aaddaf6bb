use crate::model::{
    Constraint, Employee, ManualConstraints, ScheduleRow, ScheduleTemplate, ShiftCode,
};
use std::collections::BTreeSet;

/// Disponibilités figées d'un mois : salariés actifs (ordre de l'appelant),
/// contraintes manuelles et samedis du mois.
#[derive(Debug, Clone)]
pub struct Availability<'a> {
    employees: Vec<&'a Employee>,
    constraints: &'a ManualConstraints,
    saturdays: BTreeSet<usize>,
    days: usize,
}

impl<'a> Availability<'a> {
    pub fn new(
        employees: Vec<&'a Employee>,
        constraints: &'a ManualConstraints,
        days: usize,
        saturdays: BTreeSet<usize>,
    ) -> Self {
        Self {
            employees,
            constraints,
            saturdays,
            days,
        }
    }

    pub fn employees(&self) -> &[&'a Employee] {
        &self.employees
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// Contrainte manuelle ; ignorée au-delà de la fin du mois.
    pub fn manual(&self, row: usize, day: usize) -> Option<Constraint> {
        if day >= self.days {
            return None;
        }
        self.employees
            .get(row)
            .and_then(|e| self.constraints.get(&e.id, day))
    }

    pub fn saturday_restricted(&self, row: usize, day: usize) -> bool {
        self.employees
            .get(row)
            .is_some_and(|e| e.does_not_work_on_saturdays && self.saturdays.contains(&day))
    }

    /// Case fermée par une contrainte manuelle ou par la règle du samedi.
    pub fn is_blocked(&self, row: usize, day: usize) -> bool {
        self.manual(row, day).is_some() || self.saturday_restricted(row, day)
    }
}

/// Construit le planning initial.
///
/// Par case : contrainte manuelle recopiée telle quelle, sinon `0` si la
/// règle du samedi s'applique, sinon vide. La contrainte manuelle prime.
pub fn resolve(ctx: &Availability<'_>) -> ScheduleTemplate {
    let rows = ctx
        .employees()
        .iter()
        .enumerate()
        .map(|(row, employee)| {
            let days = (0..ctx.days())
                .map(|day| match ctx.manual(row, day) {
                    Some(constraint) => Some(constraint.code()),
                    None if ctx.saturday_restricted(row, day) => Some(ShiftCode::Off),
                    None => None,
                })
                .collect();
            ScheduleRow {
                employee: employee.id.clone(),
                days,
            }
        })
        .collect();
    ScheduleTemplate::from_rows(rows)
}
