use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::customer::CustomerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardsPeriodKind {
    Month,
    Unknown,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported rewards period type `{0}` (expected month)")]
pub struct UnknownPeriodKind(pub String);

impl FromStr for RewardsPeriodKind {
    type Err = UnknownPeriodKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "unknown" => Ok(Self::Unknown),
            other => Err(UnknownPeriodKind(other.to_string())),
        }
    }
}

impl fmt::Display for RewardsPeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => f.write_str("MONTH"),
            Self::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// Calendar month identity, ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    /// Months elapsed since year zero; consecutive months differ by one.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub points: u64,
}

impl MonthBucket {
    pub fn empty(key: MonthKey) -> Self {
        Self { year: key.year, month: key.month, points: 0 }
    }

    pub fn key(&self) -> MonthKey {
        MonthKey { year: self.year, month: self.month }
    }
}

/// Points earned by one customer over a rewards period.
///
/// Built once by the rewards engine and read-only afterwards, so the totals
/// always agree with the monthly breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RewardsSummary {
    customer_id: CustomerId,
    description: String,
    period_kind: RewardsPeriodKind,
    monthly_points: Vec<MonthBucket>,
    total_points: u64,
    total_amount: Decimal,
}

impl RewardsSummary {
    pub fn new(
        customer_id: CustomerId,
        description: impl Into<String>,
        period_kind: RewardsPeriodKind,
        monthly_points: Vec<MonthBucket>,
        total_amount: Decimal,
    ) -> Self {
        let total_points =
            monthly_points.iter().fold(0u64, |sum, bucket| sum.saturating_add(bucket.points));
        Self {
            customer_id,
            description: description.into(),
            period_kind,
            monthly_points,
            total_points,
            total_amount,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn period_kind(&self) -> RewardsPeriodKind {
        self.period_kind
    }

    pub fn monthly_points(&self) -> &[MonthBucket] {
        &self.monthly_points
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }
}
