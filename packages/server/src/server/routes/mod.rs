// HTTP routes
pub mod accounts;
pub mod health;
pub mod pages;
pub mod resources;
pub mod search;
pub mod submit;
pub mod support;

pub use accounts::*;
pub use health::*;
pub use pages::*;
pub use resources::*;
pub use search::*;
pub use submit::*;
pub use support::*;
