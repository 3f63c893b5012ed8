//! # lakecat-models
//!
//! Wire models for the lakecat data-lake catalog REST APIs, built on the
//! schema/record/resolver core in `lakecat-wire`.
//!
//! The API surface splits the way the service does:
//!
//! - [`catalog`]: the table-format catalog API (kebab-case wire aliases;
//!   namespaces, tables, content files, OAuth token exchange).
//! - [`management`]: the management API for catalogs and principals
//!   (camelCase wire aliases; storage configurations, credentials).
//!
//! Every model is a plain struct (or, for discriminated families, an
//! enum) with a lazily built schema singleton; the wire entry points come
//! from the `WireModel` / `WireFamily` facade traits.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod management;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::management::*;
    pub use lakecat_wire::{WireError, WireFamily, WireModel, WireResult};
}
