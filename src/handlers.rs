pub mod audit;
pub mod auth;
pub mod categories;
pub mod companies;
pub mod customers;
pub mod finance;
pub mod orders;
pub mod products;
pub mod public;
pub mod reports;
pub mod users;
