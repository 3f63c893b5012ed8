//! # lakecat-wire
//!
//! Schema-driven wire (de)serialization core for the lakecat catalog
//! client. The crate generalizes the pattern every generated API model
//! repeats: a static field-alias table, a validated instance built from
//! it, and, for polymorphic families, a discriminator that picks the
//! concrete schema before decoding.
//!
//! ## Layers
//!
//! 1. **Schema**: [`schema::ModelSchema`] maps internal field names to
//!    wire aliases, optionality, defaults, and value kinds, and owns the
//!    encode/decode field walk.
//! 2. **Record**: [`record::Record`] is an immutable, validated instance
//!    of one schema, with typed accessors and rebuild-with-changes.
//! 3. **Resolver**: [`discriminator::DiscriminatorMap`] dispatches a
//!    discriminated wire dict to the concrete schema its tag selects.
//! 4. **Facade**: [`model::WireModel`] and [`model::WireFamily`] provide
//!    the `to_wire_dict` / `to_wire_string` / `from_wire_dict` /
//!    `from_wire_str` surface every model exposes.
//!
//! All operations are pure, synchronous, in-memory transformations.
//! Schemas and discriminator maps are immutable after construction and
//! safe for unsynchronized concurrent reads; the core only ever takes
//! them by reference, so callers (and tests) can construct as many
//! registries as they need.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod discriminator;
pub mod error;
pub mod model;
pub mod record;
pub mod schema;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::discriminator::DiscriminatorMap;
    pub use crate::error::{WireError, WireResult};
    pub use crate::model::{WireFamily, WireModel};
    pub use crate::record::{FieldValue, Record, RecordBuilder};
    pub use crate::schema::{FieldDescriptor, FieldKind, ModelSchema, ScalarKind};
}

pub use discriminator::DiscriminatorMap;
pub use error::{WireError, WireResult};
pub use model::{WireFamily, WireModel};
pub use record::{FieldValue, Record, RecordBuilder};
pub use schema::{FieldDescriptor, FieldKind, ModelSchema, ScalarKind};
