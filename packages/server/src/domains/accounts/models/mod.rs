//! Account models

pub mod account;

pub use account::Account;
