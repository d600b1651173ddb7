pub mod db;
pub mod error;
pub mod store;
pub mod types;

mod customers;
mod order_items;
mod orders;
mod products;
mod users;
