use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PurchaseId(pub i64);

/// A completed purchase as handed over by the order store.
///
/// `transaction_time` is optional because upstream records may be incomplete;
/// purchases without one never earn points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub customer_id: CustomerId,
    pub amount: Decimal,
    #[serde(default)]
    pub transaction_time: Option<DateTime<Utc>>,
}

impl Purchase {
    /// Calendar date of the transaction in UTC.
    pub fn transaction_date(&self) -> Option<NaiveDate> {
        self.transaction_time.map(|time| time.date_naive())
    }
}
