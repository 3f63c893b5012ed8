//! Discriminator maps for polymorphic model families.
//!
//! A discriminated wire payload carries one designated key whose string
//! value selects the concrete schema that interprets the rest of the
//! payload. The mapping from value to schema is validated when the map is
//! built, not at each lookup.

use crate::error::{WireError, WireResult};
use crate::record::Record;
use crate::schema::{FieldKind, ModelSchema, ScalarKind};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Maps a discriminator field's wire values to concrete model schemas.
#[derive(Debug, PartialEq)]
pub struct DiscriminatorMap {
    alias: String,
    variants: Vec<(String, Arc<ModelSchema>)>,
}

impl DiscriminatorMap {
    /// Starts a validating builder keyed on the given discriminator alias.
    #[must_use]
    pub fn builder(alias: impl Into<String>) -> DiscriminatorMapBuilder {
        DiscriminatorMapBuilder {
            alias: alias.into(),
            variants: Vec::new(),
        }
    }

    /// The wire alias of the discriminator field.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The value-to-schema mapping, in registration order.
    #[must_use]
    pub fn variants(&self) -> &[(String, Arc<ModelSchema>)] {
        &self.variants
    }

    pub(crate) fn contains_schema(&self, schema: &Arc<ModelSchema>) -> bool {
        self.variants
            .iter()
            .any(|(_, candidate)| candidate.as_ref() == schema.as_ref())
    }

    /// Resolves the concrete schema for a wire dict.
    ///
    /// # Errors
    ///
    /// [`WireError::MissingDiscriminator`] when the key is absent or
    /// `null`, [`WireError::UnknownDiscriminatorValue`] when the value is
    /// not a string or maps to no variant.
    pub fn resolve(&self, dict: &Map<String, Value>) -> WireResult<&Arc<ModelSchema>> {
        let Some(value) = dict.get(&self.alias).filter(|v| !v.is_null()) else {
            tracing::trace!(alias = %self.alias, "discriminator key absent");
            return Err(WireError::missing_discriminator(&self.alias));
        };
        let Some(tag) = value.as_str() else {
            tracing::trace!(alias = %self.alias, "discriminator value is not a string");
            return Err(WireError::unknown_discriminator(&self.alias, value.to_string()));
        };
        match self.variants.iter().find(|(candidate, _)| candidate == tag) {
            Some((_, schema)) => {
                tracing::trace!(alias = %self.alias, value = tag, schema = schema.name(), "resolved discriminator");
                Ok(schema)
            }
            None => {
                tracing::trace!(alias = %self.alias, value = tag, "unmapped discriminator value");
                Err(WireError::unknown_discriminator(&self.alias, tag))
            }
        }
    }

    /// Resolves the concrete schema, then delegates decoding to it.
    ///
    /// This is a single dispatch; nested discriminated fields inside the
    /// resolved schema resolve independently at their own level.
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`DiscriminatorMap::resolve`], then any
    /// decode error of the concrete schema.
    pub fn decode(&self, dict: &Map<String, Value>) -> WireResult<Record> {
        ModelSchema::decode(self.resolve(dict)?, dict)
    }
}

/// Validating builder for [`DiscriminatorMap`].
#[derive(Debug)]
pub struct DiscriminatorMapBuilder {
    alias: String,
    variants: Vec<(String, Arc<ModelSchema>)>,
}

impl DiscriminatorMapBuilder {
    /// Registers the schema a discriminator value resolves to.
    #[must_use]
    pub fn variant(mut self, value: impl Into<String>, schema: &Arc<ModelSchema>) -> Self {
        self.variants.push((value.into(), Arc::clone(schema)));
        self
    }

    /// Validates and builds the map.
    ///
    /// Every variant schema must declare the discriminator alias as a
    /// required string field of its own, and discriminator values must be
    /// unique.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidSchema`] on any violation, including an
    /// empty variant set.
    pub fn build(self) -> WireResult<Arc<DiscriminatorMap>> {
        if self.variants.is_empty() {
            return Err(WireError::invalid_schema(format!(
                "discriminator {}: no variants registered",
                self.alias
            )));
        }
        let mut seen = HashSet::new();
        for (value, schema) in &self.variants {
            if !seen.insert(value.as_str()) {
                return Err(WireError::invalid_schema(format!(
                    "discriminator {}: duplicate value {value}",
                    self.alias
                )));
            }
            let Some(descriptor) = schema.field_by_alias(&self.alias) else {
                return Err(WireError::invalid_schema(format!(
                    "discriminator {}: schema {} does not declare the discriminator field",
                    self.alias,
                    schema.name()
                )));
            };
            let is_required_string = descriptor.is_required()
                && matches!(descriptor.kind(), FieldKind::Scalar(ScalarKind::String));
            if !is_required_string {
                return Err(WireError::invalid_schema(format!(
                    "discriminator {}: field on {} must be a required string",
                    self.alias,
                    schema.name()
                )));
            }
        }
        Ok(Arc::new(DiscriminatorMap {
            alias: self.alias,
            variants: self.variants,
        }))
    }
}
