use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::errors::DomainError;

/// Calendar span of fully completed months that earn points.
///
/// `start` is the first day of the month `months_back` months before today and
/// is inclusive. `end` is the last day of the month before today's month and is
/// exclusive, so a purchase dated on `end` does not count. The current,
/// possibly incomplete month never falls inside the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RewardsWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl RewardsWindow {
    pub fn resolve(today: NaiveDate, months_back: u32) -> Result<Self, DomainError> {
        if months_back < 1 {
            return Err(DomainError::InvalidRewardsPeriod(format!(
                "rewards period must cover at least 1 month, got {months_back}"
            )));
        }

        let current_month = today.with_day(1).ok_or_else(|| out_of_range(today, months_back))?;
        let start = current_month
            .checked_sub_months(Months::new(months_back))
            .ok_or_else(|| out_of_range(today, months_back))?;
        let end = current_month.pred_opt().ok_or_else(|| out_of_range(today, months_back))?;

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

fn out_of_range(today: NaiveDate, months_back: u32) -> DomainError {
    DomainError::InvalidRewardsPeriod(format!(
        "{months_back} months before {today} is outside the supported calendar range"
    ))
}
