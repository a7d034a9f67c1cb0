pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod response;
pub mod rewards;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::customer::{Customer, CustomerId};
pub use domain::purchase::{Purchase, PurchaseId};
pub use domain::rewards::{MonthBucket, MonthKey, RewardsPeriodKind, RewardsSummary};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use repository::{CustomerRepository, OrderRepository, RepositoryError};
pub use response::CustomerRewardsResponse;
pub use rewards::{DeterministicRewardsEngine, RewardsEngine, RewardsInput};
pub use service::{CustomerRewardsService, RewardsRequest};
