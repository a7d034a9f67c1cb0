pub mod aggregate;
pub mod buckets;
pub mod points;
pub mod window;

use chrono::NaiveDate;

use crate::clock::{Clock, SystemClock};
use crate::domain::customer::CustomerId;
use crate::domain::purchase::Purchase;
use crate::domain::rewards::{RewardsPeriodKind, RewardsSummary};
use crate::errors::DomainError;

use self::{aggregate::MonthlyOrders, buckets::MonthBuckets, window::RewardsWindow};

pub const DEFAULT_DESCRIPTION: &str = "Customer Rewards Points per month";

#[derive(Clone, Copy, Debug)]
pub struct RewardsInput<'a> {
    pub customer_id: CustomerId,
    pub purchases: &'a [Purchase],
    pub months_back: u32,
}

pub trait RewardsEngine: Send + Sync {
    fn calculate(&self, input: RewardsInput<'_>) -> Result<RewardsSummary, DomainError>;
}

/// Monthly rewards calculation pinned to the date reported by `C`.
pub struct DeterministicRewardsEngine<C> {
    clock: C,
    description: String,
}

impl<C> DeterministicRewardsEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, description: DEFAULT_DESCRIPTION.to_string() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Default for DeterministicRewardsEngine<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C> RewardsEngine for DeterministicRewardsEngine<C>
where
    C: Clock,
{
    fn calculate(&self, input: RewardsInput<'_>) -> Result<RewardsSummary, DomainError> {
        calculate_monthly_rewards(input, self.clock.today(), &self.description)
    }
}

pub fn calculate_monthly_rewards(
    input: RewardsInput<'_>,
    today: NaiveDate,
    description: &str,
) -> Result<RewardsSummary, DomainError> {
    let window = RewardsWindow::resolve(today, input.months_back)?;
    let mut buckets = MonthBuckets::for_window(&window)?;
    let orders = MonthlyOrders::collect(input.purchases, &window);

    for (month, month_orders) in orders.months() {
        buckets.assign(month, points::points_for_orders(month_orders.iter().copied()))?;
    }

    let total_amount = orders.total_amount()?;

    Ok(RewardsSummary::new(
        input.customer_id,
        description,
        RewardsPeriodKind::Month,
        buckets.into_vec(),
        total_amount,
    ))
}
