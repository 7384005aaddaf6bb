use crate::calendar::MonthRef;
use crate::model::{ScheduleTemplate, ShiftKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const MIN_HEADCOUNT: u32 = 1;
pub const MAX_HEADCOUNT: u32 = 5;

/// Effectif requis par garde, identique chaque jour du mois.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequirements {
    pub day_shift: u32,
    pub night_shift: u32,
}

impl Default for ShiftRequirements {
    fn default() -> Self {
        Self {
            day_shift: 1,
            night_shift: 1,
        }
    }
}

impl ShiftRequirements {
    /// Refuse toute valeur hors de `[1, 5]`.
    pub fn new(day_shift: i64, night_shift: i64) -> Result<Self, ScheduleError> {
        Ok(Self {
            day_shift: checked_headcount(ShiftKind::Day, day_shift)?,
            night_shift: checked_headcount(ShiftKind::Night, night_shift)?,
        })
    }

    /// Politique de l'appelant : valeur absente ou hors plage => 1.
    pub fn normalized(day_shift: Option<i64>, night_shift: Option<i64>) -> Self {
        let norm = |kind, v: Option<i64>| {
            v.and_then(|v| checked_headcount(kind, v).ok())
                .unwrap_or(MIN_HEADCOUNT)
        };
        Self {
            day_shift: norm(ShiftKind::Day, day_shift),
            night_shift: norm(ShiftKind::Night, night_shift),
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        checked_headcount(ShiftKind::Day, i64::from(self.day_shift))?;
        checked_headcount(ShiftKind::Night, i64::from(self.night_shift))?;
        Ok(())
    }

    pub fn required(&self, kind: ShiftKind) -> u32 {
        match kind {
            ShiftKind::Day => self.day_shift,
            ShiftKind::Night => self.night_shift,
        }
    }
}

fn checked_headcount(kind: ShiftKind, value: i64) -> Result<u32, ScheduleError> {
    u32::try_from(value)
        .ok()
        .filter(|v| (MIN_HEADCOUNT..=MAX_HEADCOUNT).contains(v))
        .ok_or(ScheduleError::InvalidHeadcount { kind, value })
}

/// Besoin jour par jour pour chaque type de garde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    day: Vec<u32>,
    night: Vec<u32>,
}

impl Demand {
    pub fn uniform(requirements: ShiftRequirements, days: usize) -> Self {
        Self {
            day: vec![requirements.day_shift; days],
            night: vec![requirements.night_shift; days],
        }
    }

    pub fn per_day(day: Vec<u32>, night: Vec<u32>) -> Self {
        Self { day, night }
    }

    pub fn validate(&self, days_in_month: usize) -> Result<(), ScheduleError> {
        for kind in ShiftKind::ALL {
            let vector = self.vector(kind);
            if vector.len() != days_in_month {
                return Err(ScheduleError::DemandLength {
                    kind,
                    expected: days_in_month,
                    actual: vector.len(),
                });
            }
            for &value in vector {
                checked_headcount(kind, i64::from(value))?;
            }
        }
        Ok(())
    }

    fn vector(&self, kind: ShiftKind) -> &[u32] {
        match kind {
            ShiftKind::Day => &self.day,
            ShiftKind::Night => &self.night,
        }
    }

    pub fn days(&self) -> usize {
        self.day.len()
    }

    /// Effectif requis pour `kind` le jour `day` (index 0).
    pub fn needed(&self, kind: ShiftKind, day: usize) -> usize {
        self.vector(kind).get(day).map_or(0, |&n| n as usize)
    }

    pub fn total(&self, kind: ShiftKind) -> usize {
        self.vector(kind).iter().map(|&n| n as usize).sum()
    }

    pub fn peak(&self, kind: ShiftKind) -> u32 {
        self.vector(kind).iter().copied().max().unwrap_or(0)
    }

    pub fn is_uniform(&self) -> bool {
        ShiftKind::ALL
            .iter()
            .all(|&kind| self.vector(kind).windows(2).all(|w| w[0] == w[1]))
    }
}

/// Bilan agrégé de l'étape de faisabilité.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub needed_day: usize,
    pub needed_night: usize,
    pub available: usize,
}

impl Capacity {
    pub fn needed(&self) -> usize {
        self.needed_day + self.needed_night
    }
}

/// Écart de dotation d'une garde ; `day` est le jour du mois (à partir de 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub day: usize,
    pub kind: ShiftKind,
    pub needed: usize,
    pub assigned: usize,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {}, shift {}: needed {}, assigned {}",
            self.day, self.kind, self.needed, self.assigned
        )
    }
}

fn join_shortfalls(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .iter()
        .map(Shortfall::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("no employees to schedule")]
    NoEmployees,
    #[error("no active employees to schedule")]
    NoActiveEmployees,
    #[error("duplicate employee id: {0}")]
    DuplicateEmployee(String),
    #[error("invalid month index: {0} (expected 0-11)")]
    InvalidMonth(u32),
    #[error("invalid date: {year}-{month}")]
    InvalidDate { year: i32, month: u32 },
    #[error("invalid headcount for shift {kind}: {value} (expected 1-5)")]
    InvalidHeadcount { kind: ShiftKind, value: i64 },
    #[error("demand for shift {kind} covers {actual} days, expected {expected}")]
    DemandLength {
        kind: ShiftKind,
        expected: usize,
        actual: usize,
    },
    #[error("insufficient capacity: {needed} shifts needed, {available} open slots")]
    InsufficientCapacity { needed: usize, available: usize },
    #[error("could not cover all shifts: {}", join_shortfalls(.0))]
    UncoveredShifts(Vec<Shortfall>),
    #[error("shifts staffed beyond requirement: {}", join_shortfalls(.0))]
    OverstaffedShifts(Vec<Shortfall>),
}

/// Planning généré, prêt à être persisté par l'appelant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSchedule {
    pub schedule: ScheduleTemplate,
    pub days_in_month: usize,
    pub month: u32,
    pub year: i32,
    pub day_shift_required: u32,
    pub night_shift_required: u32,
    /// Présent uniquement quand le besoin varie d'un jour à l'autre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<Demand>,
}

impl GeneratedSchedule {
    pub(crate) fn new(schedule: ScheduleTemplate, month: MonthRef, demand: Demand) -> Self {
        let uniform = demand.is_uniform();
        Self {
            schedule,
            days_in_month: demand.days(),
            month: month.month,
            year: month.year,
            day_shift_required: demand.peak(ShiftKind::Day),
            night_shift_required: demand.peak(ShiftKind::Night),
            demand: (!uniform).then_some(demand),
        }
    }

    /// Besoin effectivement utilisé à la génération.
    pub fn demand(&self) -> Demand {
        self.demand.clone().unwrap_or_else(|| {
            Demand::uniform(
                ShiftRequirements {
                    day_shift: self.day_shift_required,
                    night_shift: self.night_shift_required,
                },
                self.days_in_month,
            )
        })
    }
}
