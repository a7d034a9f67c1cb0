use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use rewards_core::domain::customer::{Customer, CustomerId};
use rewards_core::domain::purchase::{Purchase, PurchaseId};
use rewards_core::repository::{CustomerRepository, OrderRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("could not read fixture file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse fixture file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("could not write fixture file `{path}`: {source}")]
    WriteFile { path: PathBuf, source: std::io::Error },
    #[error("could not encode fixture dataset: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Customers and purchases loaded into the in-memory store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDataset {
    pub customers: Vec<Customer>,
    pub purchases: Vec<Purchase>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallSummary {
    pub customers: usize,
    pub purchases: usize,
}

/// (purchase id, customer id, amount in cents, months before today, day of month)
const DEMO_PURCHASES: &[(i64, i64, i64, u32, u32)] = &[
    (1, 1, 30_000, 1, 5),
    (2, 1, 11_000, 2, 12),
    (3, 1, 5_000, 2, 20),
    (4, 1, 10_000, 5, 3),
    (5, 1, 35_000, 10, 15),
    (6, 1, 15_000, 0, 1),
    (7, 2, 7_500, 2, 8),
    (8, 3, 15_000, 2, 8),
];

impl FixtureDataset {
    pub fn load_file(path: &Path) -> Result<Self, FixtureError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| FixtureError::ReadFile { path: path.to_path_buf(), source })?;
        serde_json::from_str(&raw)
            .map_err(|source| FixtureError::ParseFile { path: path.to_path_buf(), source })
    }

    pub fn to_json(&self) -> Result<String, FixtureError> {
        serde_json::to_string_pretty(self).map_err(FixtureError::Encode)
    }

    pub fn write_file(&self, path: &Path) -> Result<(), FixtureError> {
        let encoded = self.to_json()?;
        fs::write(path, encoded)
            .map_err(|source| FixtureError::WriteFile { path: path.to_path_buf(), source })
    }

    /// Four customers with purchases placed at fixed month offsets from `today`,
    /// so the totals for a given window length do not depend on the date.
    ///
    /// Purchases whose date would fall outside the calendar range are skipped.
    pub fn demo(today: NaiveDate) -> Self {
        let customers = (1..=4)
            .map(|id| Customer {
                id: CustomerId(id),
                name: format!("Test Name {id}"),
                phone_number: format!("100-000-000{id}"),
            })
            .collect();

        let purchases = DEMO_PURCHASES
            .iter()
            .filter_map(|&(id, customer_id, cents, months_before, day)| {
                let date = today
                    .with_day(1)?
                    .checked_sub_months(Months::new(months_before))?
                    .with_day(day)?;
                Some(Purchase {
                    id: PurchaseId(id),
                    customer_id: CustomerId(customer_id),
                    amount: Decimal::new(cents, 2),
                    transaction_time: Some(date.and_time(demo_time()).and_utc()),
                })
            })
            .collect();

        Self { customers, purchases }
    }

    pub async fn install<C, O>(
        &self,
        customers: &C,
        orders: &O,
    ) -> Result<InstallSummary, FixtureError>
    where
        C: CustomerRepository,
        O: OrderRepository,
    {
        for customer in &self.customers {
            customers.save(customer.clone()).await?;
        }
        for purchase in &self.purchases {
            orders.save(purchase.clone()).await?;
        }

        let summary =
            InstallSummary { customers: self.customers.len(), purchases: self.purchases.len() };
        info!(
            event_name = "store.fixtures.installed",
            customers = summary.customers,
            purchases = summary.purchases,
            "fixture dataset installed"
        );
        Ok(summary)
    }
}

fn demo_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use rewards_core::domain::customer::CustomerId;

    use super::{FixtureDataset, FixtureError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).expect("date")
    }

    #[test]
    fn demo_dataset_places_purchases_relative_to_today() {
        let dataset = FixtureDataset::demo(today());

        assert_eq!(dataset.customers.len(), 4);
        assert_eq!(dataset.purchases.len(), 8);

        let first = &dataset.purchases[0];
        assert_eq!(first.transaction_date(), NaiveDate::from_ymd_opt(2024, 2, 5));
        assert_eq!(first.amount, Decimal::new(300, 0));

        let oldest = &dataset.purchases[4];
        assert_eq!(oldest.transaction_date(), NaiveDate::from_ymd_opt(2023, 5, 15));
        assert!(dataset.purchases.iter().all(|purchase| purchase.customer_id != CustomerId(4)));
    }

    #[test]
    fn dataset_survives_a_file_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fixtures.json");
        let dataset = FixtureDataset::demo(today());

        dataset.write_file(&path).expect("write fixtures");
        let loaded = FixtureDataset::load_file(&path).expect("load fixtures");

        assert_eq!(loaded, dataset);
    }

    #[test]
    fn malformed_file_reports_parse_error_with_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"customers\": [").expect("write broken file");

        let error = FixtureDataset::load_file(&path).expect_err("broken json");

        assert!(matches!(error, FixtureError::ParseFile { .. }));
        assert!(error.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let error = FixtureDataset::load_file(std::path::Path::new("no/such/fixtures.json"))
            .expect_err("missing file");

        assert!(matches!(error, FixtureError::ReadFile { .. }));
    }
}
