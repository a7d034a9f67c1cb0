use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::purchase::Purchase;

/// Amount at or above which every whole unit earns double points.
pub const UPPER_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Amount above which every whole unit earns one point.
pub const LOWER_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
pub const UPPER_TIER_MULTIPLIER: u64 = 2;

/// Points earned by a single purchase amount.
///
/// Excess over a threshold is truncated toward zero before it is scored, so
/// 50.01 earns nothing and 100.01 earns the flat 50 of the middle tier.
pub fn points_for_amount(amount: Decimal) -> u64 {
    if amount >= UPPER_THRESHOLD {
        let excess = whole_units(amount - UPPER_THRESHOLD);
        let base = whole_units(UPPER_THRESHOLD - LOWER_THRESHOLD);
        excess.saturating_mul(UPPER_TIER_MULTIPLIER).saturating_add(base)
    } else if amount > LOWER_THRESHOLD {
        whole_units(amount - LOWER_THRESHOLD)
    } else {
        0
    }
}

pub fn points_for_orders<'a>(orders: impl IntoIterator<Item = &'a Purchase>) -> u64 {
    orders
        .into_iter()
        .fold(0u64, |sum, order| sum.saturating_add(points_for_amount(order.amount)))
}

fn whole_units(value: Decimal) -> u64 {
    value.trunc().to_u64().unwrap_or(u64::MAX)
}
