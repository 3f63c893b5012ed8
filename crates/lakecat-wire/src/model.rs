//! Serialization facade traits.
//!
//! Every concrete model exposes the same four entry points: to/from wire
//! dict and to/from wire JSON text. Plain models route through their
//! schema; discriminated family roots route through their resolver first.

use crate::discriminator::DiscriminatorMap;
use crate::error::{json_kind, WireError, WireResult};
use crate::record::Record;
use crate::schema::ModelSchema;
use serde_json::{Map, Value};
use std::sync::Arc;

fn parse_object(text: &str) -> WireResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(WireError::type_mismatch(
            "<root>",
            "object",
            json_kind(&other),
        )),
    }
}

/// A concrete model with a fixed schema.
///
/// Implementors provide the schema and the typed conversions to and from
/// [`Record`]; the wire entry points are derived from those.
pub trait WireModel: Sized {
    /// The schema this model encodes and decodes against.
    fn schema() -> &'static Arc<ModelSchema>;

    /// Converts this value into a validated record.
    ///
    /// # Errors
    ///
    /// Fails only when the model and its schema disagree, which is a bug
    /// in the model definition.
    fn to_record(&self) -> WireResult<Record>;

    /// Builds a typed value from a decoded record.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` or `TypeMismatch` when the record
    /// does not carry the shapes this model expects.
    fn from_record(record: &Record) -> WireResult<Self>;

    /// Encodes this value into its wire dict.
    ///
    /// # Errors
    ///
    /// As for [`WireModel::to_record`].
    fn to_wire_dict(&self) -> WireResult<Map<String, Value>> {
        Ok(self.to_record()?.encode())
    }

    /// Encodes this value into wire JSON text: the exact textual
    /// serialization of [`WireModel::to_wire_dict`].
    ///
    /// # Errors
    ///
    /// As for [`WireModel::to_wire_dict`].
    fn to_wire_string(&self) -> WireResult<String> {
        Ok(serde_json::to_string(&self.to_wire_dict()?)?)
    }

    /// Decodes a wire dict into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` or `TypeMismatch` on shape errors;
    /// unknown keys are ignored.
    fn from_wire_dict(dict: &Map<String, Value>) -> WireResult<Self> {
        Self::from_record(&ModelSchema::decode(Self::schema(), dict)?)
    }

    /// Parses wire JSON text and decodes it.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Json`] on malformed text, then as for
    /// [`WireModel::from_wire_dict`].
    fn from_wire_str(text: &str) -> WireResult<Self> {
        Self::from_wire_dict(&parse_object(text)?)
    }
}

/// The root of a discriminated model family.
///
/// Families are closed sum types; decoding resolves the discriminator
/// field to one concrete member schema and delegates to it.
pub trait WireFamily: Sized {
    /// The discriminator map for this family.
    fn discriminator() -> &'static Arc<DiscriminatorMap>;

    /// Converts the active member into its record.
    ///
    /// # Errors
    ///
    /// As for [`WireModel::to_record`] on the member.
    fn to_record(&self) -> WireResult<Record>;

    /// Builds the matching member from a record decoded by the resolver.
    ///
    /// # Errors
    ///
    /// Returns member-level shape errors, or [`WireError::InvalidSchema`]
    /// when the record's schema is not part of this family.
    fn from_record(record: Record) -> WireResult<Self>;

    /// Encodes the active member into its wire dict.
    ///
    /// # Errors
    ///
    /// As for [`WireFamily::to_record`].
    fn to_wire_dict(&self) -> WireResult<Map<String, Value>> {
        Ok(self.to_record()?.encode())
    }

    /// Encodes the active member into wire JSON text.
    ///
    /// # Errors
    ///
    /// As for [`WireFamily::to_wire_dict`].
    fn to_wire_string(&self) -> WireResult<String> {
        Ok(serde_json::to_string(&self.to_wire_dict()?)?)
    }

    /// Resolves the discriminator and decodes the matching member.
    ///
    /// # Errors
    ///
    /// Returns `MissingDiscriminator` or `UnknownDiscriminatorValue` from
    /// resolution, then member-level decode errors.
    fn from_wire_dict(dict: &Map<String, Value>) -> WireResult<Self> {
        Self::from_record(Self::discriminator().decode(dict)?)
    }

    /// Parses wire JSON text and decodes the matching member.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Json`] on malformed text, then as for
    /// [`WireFamily::from_wire_dict`].
    fn from_wire_str(text: &str) -> WireResult<Self> {
        Self::from_wire_dict(&parse_object(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_rejects_non_objects() {
        let err = parse_object("[1, 2, 3]").expect_err("array should be rejected");
        assert!(matches!(
            err,
            WireError::TypeMismatch { expected, .. } if expected == "object"
        ));

        let err = parse_object("not json").expect_err("malformed text should be rejected");
        assert!(matches!(err, WireError::Json(_)));
    }

    #[test]
    fn test_parse_object_accepts_objects() {
        let map = parse_object(r#"{"a": 1}"#).expect("object should parse");
        assert_eq!(map.get("a"), Some(&serde_json::json!(1)));
    }
}
