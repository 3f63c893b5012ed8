//! Catalog API wire models.
//!
//! These models use the catalog service's kebab-case wire aliases.

mod content_file;
mod namespace;
mod oauth;
mod table;

pub use content_file::*;
pub use namespace::*;
pub use oauth::*;
pub use table::*;
