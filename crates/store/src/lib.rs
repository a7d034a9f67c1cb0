pub mod fixtures;
pub mod memory;

pub use fixtures::{FixtureDataset, FixtureError, InstallSummary};
pub use memory::{InMemoryCustomerRepository, InMemoryOrderRepository};
