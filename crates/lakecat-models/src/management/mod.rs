//! Management API wire models.
//!
//! These models use the management service's camelCase wire aliases.

mod catalog;
mod principal;
mod storage_config;

pub use catalog::*;
pub use principal::*;
pub use storage_config::*;
