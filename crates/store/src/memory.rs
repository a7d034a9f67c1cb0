use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use rewards_core::domain::customer::{Customer, CustomerId};
use rewards_core::domain::purchase::Purchase;
use rewards_core::repository::{CustomerRepository, OrderRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<i64, Customer>>,
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id.0).cloned())
    }

    async fn save(&self, customer: Customer) -> Result<(), RepositoryError> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id.0, customer);
        Ok(())
    }
}

/// Purchases keyed by purchase id, so lookups return them in id order.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<BTreeMap<i64, Purchase>>,
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Purchase>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders.values().filter(|order| order.customer_id == *customer_id).cloned().collect())
    }

    async fn save(&self, purchase: Purchase) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().await;
        orders.insert(purchase.id.0, purchase);
        Ok(())
    }
}
