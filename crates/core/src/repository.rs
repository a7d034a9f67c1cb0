use async_trait::async_trait;
use thiserror::Error;

use crate::domain::customer::{Customer, CustomerId};
use crate::domain::purchase::Purchase;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn save(&self, customer: Customer) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Purchase>, RepositoryError>;
    async fn save(&self, purchase: Purchase) -> Result<(), RepositoryError>;
}
