pub mod customer;
pub mod purchase;
pub mod rewards;
