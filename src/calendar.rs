use crate::generator::ScheduleError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mois cible ; `month` est indexé à partir de 0 (janvier = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Result<Self, ScheduleError> {
        if month > 11 {
            return Err(ScheduleError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn first_day(&self) -> Result<NaiveDate, ScheduleError> {
        if self.month > 11 {
            return Err(ScheduleError::InvalidMonth(self.month));
        }
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).ok_or(ScheduleError::InvalidDate {
            year: self.year,
            month: self.month,
        })
    }

    pub fn days_in_month(&self) -> Result<usize, ScheduleError> {
        let first = self.first_day()?;
        let next = if self.month == 11 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 2, 1)
        }
        .ok_or(ScheduleError::InvalidDate {
            year: self.year,
            month: self.month,
        })?;
        Ok(next.signed_duration_since(first).num_days() as usize)
    }

    /// Index (à partir de 0) des samedis du mois.
    pub fn saturdays(&self) -> Result<BTreeSet<usize>, ScheduleError> {
        let days = self.days_in_month()?;
        Ok(self
            .first_day()?
            .iter_days()
            .take(days)
            .enumerate()
            .filter(|(_, date)| date.weekday() == Weekday::Sat)
            .map(|(idx, _)| idx)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_february_has_29_days() {
        assert_eq!(MonthRef::new(2024, 1).unwrap().days_in_month().unwrap(), 29);
        assert_eq!(MonthRef::new(2023, 1).unwrap().days_in_month().unwrap(), 28);
    }

    #[test]
    fn december_wraps_to_next_year() {
        assert_eq!(MonthRef::new(2024, 11).unwrap().days_in_month().unwrap(), 31);
    }

    #[test]
    fn january_2024_saturdays() {
        let sats: Vec<usize> = MonthRef::new(2024, 0)
            .unwrap()
            .saturdays()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(sats, vec![5, 12, 19, 26]);
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(matches!(
            MonthRef::new(2024, 12),
            Err(ScheduleError::InvalidMonth(12))
        ));
        let raw = MonthRef { year: 2024, month: 15 };
        assert!(raw.days_in_month().is_err());
    }
}
