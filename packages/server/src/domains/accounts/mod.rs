//! Accounts domain - registration, login and the community directory

pub mod models;

pub use models::Account;
