use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerId};
use crate::domain::rewards::{RewardsPeriodKind, RewardsSummary};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRewardsResponse {
    pub customer_id: CustomerId,
    pub personal_info: CustomerPersonalInfo,
    pub rewards: CustomerRewards,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPersonalInfo {
    pub customer_name: String,
    pub phone_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRewards {
    pub description: String,
    pub rewards_period_type: RewardsPeriodKind,
    pub monthly_points_list: Vec<MonthlyPoints>,
    pub total_points: u64,
    pub total_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoints {
    pub points: u64,
    pub month: u32,
    pub year: i32,
}

impl CustomerRewardsResponse {
    pub fn from_summary(customer: &Customer, summary: &RewardsSummary) -> Self {
        Self {
            customer_id: customer.id,
            personal_info: CustomerPersonalInfo {
                customer_name: customer.name.clone(),
                phone_number: customer.phone_number.clone(),
            },
            rewards: CustomerRewards {
                description: summary.description().to_string(),
                rewards_period_type: summary.period_kind(),
                monthly_points_list: summary
                    .monthly_points()
                    .iter()
                    .map(|bucket| MonthlyPoints {
                        points: bucket.points,
                        month: bucket.month,
                        year: bucket.year,
                    })
                    .collect(),
                total_points: summary.total_points(),
                total_amount: summary.total_amount(),
            },
        }
    }
}
