use chrono::Months;

use crate::domain::rewards::{MonthBucket, MonthKey};
use crate::errors::DomainError;
use crate::rewards::window::RewardsWindow;

/// Zero-seeded month buckets for a window, oldest first.
///
/// Bucket `i` holds the month `i` months after the window start, so lookup is
/// an offset computation rather than a map probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthBuckets {
    first: MonthKey,
    buckets: Vec<MonthBucket>,
}

impl MonthBuckets {
    pub fn for_window(window: &RewardsWindow) -> Result<Self, DomainError> {
        let first = MonthKey::of(window.start());
        let mut buckets = Vec::new();
        let mut cursor = window.start();

        while cursor < window.end() {
            buckets.push(MonthBucket::empty(MonthKey::of(cursor)));
            cursor = cursor.checked_add_months(Months::new(1)).ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "month after {cursor} is outside the supported calendar range"
                ))
            })?;
        }

        Ok(Self { first, buckets })
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn index_of(&self, key: MonthKey) -> Option<usize> {
        let offset = usize::try_from(key.ordinal() - self.first.ordinal()).ok()?;
        self.buckets.get(offset).filter(|bucket| bucket.key() == key).map(|_| offset)
    }

    /// Sets the points of the bucket for `key`.
    ///
    /// A key outside the window means the filter and the skeleton disagree,
    /// which is reported instead of dropping the points.
    pub fn assign(&mut self, key: MonthKey, points: u64) -> Result<(), DomainError> {
        let index = self.index_of(key).ok_or_else(|| {
            DomainError::InvariantViolation(format!(
                "no month bucket for {key} in window starting {}",
                self.first
            ))
        })?;
        self.buckets[index].points = points;
        Ok(())
    }

    pub fn into_vec(self) -> Vec<MonthBucket> {
        self.buckets
    }
}
