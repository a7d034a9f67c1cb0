use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::purchase::Purchase;
use crate::domain::rewards::MonthKey;
use crate::errors::DomainError;
use crate::rewards::window::RewardsWindow;

/// Purchases that fall inside a rewards window, grouped by transaction month.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthlyOrders<'a> {
    by_month: BTreeMap<MonthKey, Vec<&'a Purchase>>,
}

impl<'a> MonthlyOrders<'a> {
    pub fn collect(purchases: &'a [Purchase], window: &RewardsWindow) -> Self {
        let mut by_month: BTreeMap<MonthKey, Vec<&'a Purchase>> = BTreeMap::new();
        for purchase in filter_in_window(purchases, window) {
            if let Some(date) = purchase.transaction_date() {
                by_month.entry(MonthKey::of(date)).or_default().push(purchase);
            }
        }
        Self { by_month }
    }

    pub fn is_empty(&self) -> bool {
        self.by_month.is_empty()
    }

    pub fn months(&self) -> impl Iterator<Item = (MonthKey, &[&'a Purchase])> + '_ {
        self.by_month.iter().map(|(key, orders)| (*key, orders.as_slice()))
    }

    /// Sum of every grouped purchase amount. Fails if the sum leaves the decimal range.
    pub fn total_amount(&self) -> Result<Decimal, DomainError> {
        self.by_month.values().flatten().try_fold(Decimal::ZERO, |sum, purchase| {
            sum.checked_add(purchase.amount).ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "total purchase amount overflowed after purchase {}",
                    purchase.id.0
                ))
            })
        })
    }
}

pub fn filter_in_window<'a>(
    purchases: &'a [Purchase],
    window: &RewardsWindow,
) -> impl Iterator<Item = &'a Purchase> + 'a {
    let window = *window;
    purchases.iter().filter(move |purchase| {
        purchase.transaction_date().map(|date| window.contains(date)).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{filter_in_window, MonthlyOrders};
    use crate::domain::customer::CustomerId;
    use crate::domain::purchase::{Purchase, PurchaseId};
    use crate::domain::rewards::MonthKey;
    use crate::errors::DomainError;
    use crate::rewards::window::RewardsWindow;

    fn purchase(id: i64, cents: i64, date: Option<(i32, u32, u32)>) -> Purchase {
        Purchase {
            id: PurchaseId(id),
            customer_id: CustomerId(1),
            amount: Decimal::new(cents, 2),
            transaction_time: date.map(|(year, month, day)| {
                Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
            }),
        }
    }

    fn window() -> RewardsWindow {
        RewardsWindow::resolve(NaiveDate::from_ymd_opt(2024, 6, 15).expect("date"), 3)
            .expect("window")
    }

    #[test]
    fn filter_keeps_start_boundary_and_drops_end_boundary() {
        let purchases = vec![
            purchase(1, 10_000, Some((2024, 3, 1))),
            purchase(2, 10_000, Some((2024, 5, 31))),
            purchase(3, 10_000, Some((2024, 2, 29))),
            purchase(4, 10_000, Some((2024, 6, 1))),
            purchase(5, 10_000, Some((2024, 5, 30))),
        ];
        let window = window();

        let kept: Vec<i64> =
            filter_in_window(&purchases, &window).map(|purchase| purchase.id.0).collect();

        assert_eq!(kept, vec![1, 5]);
    }

    #[test]
    fn purchases_without_transaction_time_are_excluded() {
        let purchases = vec![purchase(1, 7_500, None), purchase(2, 7_500, Some((2024, 4, 2)))];

        let orders = MonthlyOrders::collect(&purchases, &window());

        assert_eq!(orders.total_amount(), Ok(Decimal::new(7_500, 2)));
        assert_eq!(orders.months().count(), 1);
    }

    #[test]
    fn groups_by_transaction_month_in_chronological_order() {
        let purchases = vec![
            purchase(1, 12_000, Some((2024, 5, 2))),
            purchase(2, 7_500, Some((2024, 3, 20))),
            purchase(3, 5_000, Some((2024, 5, 18))),
        ];

        let orders = MonthlyOrders::collect(&purchases, &window());
        let grouped: Vec<(MonthKey, Vec<i64>)> = orders
            .months()
            .map(|(key, orders)| (key, orders.iter().map(|purchase| purchase.id.0).collect()))
            .collect();

        assert_eq!(
            grouped,
            vec![
                (MonthKey { year: 2024, month: 3 }, vec![2]),
                (MonthKey { year: 2024, month: 5 }, vec![1, 3]),
            ]
        );
        assert_eq!(orders.total_amount(), Ok(Decimal::new(24_500, 2)));
    }

    #[test]
    fn empty_input_yields_zero_total() {
        let orders = MonthlyOrders::collect(&[], &window());

        assert!(orders.is_empty());
        assert_eq!(orders.total_amount(), Ok(Decimal::ZERO));
    }

    #[test]
    fn overflowing_total_is_reported_instead_of_panicking() {
        let mut purchases =
            vec![purchase(1, 0, Some((2024, 4, 2))), purchase(2, 0, Some((2024, 5, 9)))];
        for purchase in &mut purchases {
            purchase.amount = Decimal::MAX;
        }

        let error = MonthlyOrders::collect(&purchases, &window())
            .total_amount()
            .expect_err("sum exceeds decimal range");

        assert!(matches!(error, DomainError::InvariantViolation(_)));
        assert!(error.is_internal());
    }
}
