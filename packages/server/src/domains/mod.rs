// Business domains
pub mod accounts;
pub mod catalog;
