use tracing::{info, warn};

use crate::config::RewardsConfig;
use crate::domain::customer::{Customer, CustomerId};
use crate::domain::rewards::{RewardsPeriodKind, RewardsSummary};
use crate::errors::{ApplicationError, DomainError};
use crate::repository::{CustomerRepository, OrderRepository, RepositoryError};
use crate::response::CustomerRewardsResponse;
use crate::rewards::{RewardsEngine, RewardsInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardsRequest {
    pub customer_id: CustomerId,
    pub period_kind: RewardsPeriodKind,
    pub months_back: u32,
}

/// Validates rewards requests and feeds stored purchases to the engine.
pub struct CustomerRewardsService<C, O, E> {
    customers: C,
    orders: O,
    engine: E,
    max_months_back: u32,
}

impl<C, O, E> CustomerRewardsService<C, O, E>
where
    C: CustomerRepository,
    O: OrderRepository,
    E: RewardsEngine,
{
    pub fn new(customers: C, orders: O, engine: E, config: &RewardsConfig) -> Self {
        Self { customers, orders, engine, max_months_back: config.max_months_back }
    }

    pub async fn calculate(
        &self,
        request: RewardsRequest,
    ) -> Result<RewardsSummary, ApplicationError> {
        self.calculate_inner(request).await.map(|(_, summary)| summary)
    }

    pub async fn respond(
        &self,
        request: RewardsRequest,
    ) -> Result<CustomerRewardsResponse, ApplicationError> {
        let (customer, summary) = self.calculate_inner(request).await?;
        Ok(CustomerRewardsResponse::from_summary(&customer, &summary))
    }

    async fn calculate_inner(
        &self,
        request: RewardsRequest,
    ) -> Result<(Customer, RewardsSummary), ApplicationError> {
        info!(
            event_name = "rewards.calculate.start",
            customer_id = %request.customer_id,
            months_back = request.months_back,
            period_kind = %request.period_kind,
            "calculating customer rewards points"
        );

        if request.period_kind != RewardsPeriodKind::Month {
            return Err(reject(request, DomainError::UnsupportedPeriodKind(request.period_kind)));
        }
        if request.months_back < 1 || request.months_back > self.max_months_back {
            return Err(reject(
                request,
                DomainError::InvalidRewardsPeriod(format!(
                    "rewards period must be between 1 and {} months, got {}",
                    self.max_months_back, request.months_back
                )),
            ));
        }

        let customer = self
            .customers
            .find_by_id(&request.customer_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| reject(request, DomainError::CustomerNotFound(request.customer_id)))?;
        let purchases = self.orders.find_by_customer(&request.customer_id).await.map_err(persistence)?;

        let summary = self
            .engine
            .calculate(RewardsInput {
                customer_id: request.customer_id,
                purchases: &purchases,
                months_back: request.months_back,
            })
            .map_err(|error| reject(request, error))?;

        info!(
            event_name = "rewards.calculate.done",
            customer_id = %request.customer_id,
            months_back = request.months_back,
            purchases = purchases.len(),
            total_points = summary.total_points(),
            total_amount = %summary.total_amount(),
            "customer rewards points calculated"
        );

        Ok((customer, summary))
    }
}

fn reject(request: RewardsRequest, error: DomainError) -> ApplicationError {
    warn!(
        event_name = "rewards.calculate.rejected",
        customer_id = %request.customer_id,
        months_back = request.months_back,
        internal = error.is_internal(),
        error = %error,
        "customer rewards request rejected"
    );
    ApplicationError::Domain(error)
}

fn persistence(error: RepositoryError) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}
