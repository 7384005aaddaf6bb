#![forbid(unsafe_code)]
//! Grafik — génération de plannings mensuels de gardes jour/nuit (sans BD).
//!
//! - Contraintes manuelles (`0` repos, `U` congés) et repos du samedi.
//! - Contrôle de capacité agrégé, puis affectation gloutonne équilibrée.
//! - Validation de couverture complète ; aucun planning partiel.
//! - Import/export JSON/CSV (feature `io`).

pub mod calendar;
pub mod generator;
#[cfg(feature = "io")]
pub mod io;
pub mod model;
#[cfg(feature = "io")]
pub mod storage;

pub use calendar::MonthRef;
pub use generator::{
    generate_schedule, generate_with_demand, Demand, GeneratedSchedule, ScheduleError,
    ShiftRequirements, Shortfall,
};
pub use model::{
    Constraint, Employee, EmployeeId, ManualConstraints, ScheduleRow, ScheduleTemplate, ShiftCode,
    ShiftKind,
};
#[cfg(feature = "io")]
pub use storage::{JsonStorage, Storage};
