//! Field descriptors and model schemas.
//!
//! A [`ModelSchema`] is the static per-model table mapping internal field
//! names to wire aliases, optionality, defaults, and value kinds. Schemas
//! are built once, validated at build time, and shared behind [`Arc`];
//! the encode/decode field walk lives here.

use crate::discriminator::DiscriminatorMap;
use crate::error::{json_kind, WireError, WireResult};
use crate::record::{FieldValue, Record};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// The shape a scalar field's wire value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// A JSON string.
    String,
    /// A JSON integer (no floats on this API surface).
    Integer,
    /// A JSON boolean.
    Boolean,
    /// A JSON object whose values are all strings (property bags).
    StringMap,
    /// Any JSON value, passed through unchanged.
    Any,
}

impl ScalarKind {
    /// Short name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::StringMap => "string map",
            Self::Any => "value",
        }
    }

    /// Returns true if `value` conforms to this kind.
    ///
    /// `Any` accepts every value including `null`: explicit `null` only
    /// means absence at the field level (handled in the decode walk),
    /// not inside passthrough values or list elements.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::StringMap => value
                .as_object()
                .is_some_and(|obj| obj.values().all(Value::is_string)),
            Self::Any => true,
        }
    }
}

/// The value kind of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A scalar wire value.
    Scalar(ScalarKind),
    /// A nested model with a fixed schema.
    Model(Arc<ModelSchema>),
    /// An ordered list of nested models with a fixed schema.
    ModelList(Arc<ModelSchema>),
    /// An ordered list of scalar wire values.
    ScalarList(ScalarKind),
    /// A nested model resolved through a discriminator map.
    DiscriminatedModel(Arc<DiscriminatorMap>),
}

impl FieldKind {
    /// Short description of what this kind expects, for error messages.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Model(_) | Self::DiscriminatedModel(_) => "object",
            Self::ModelList(_) => "array of objects",
            Self::ScalarList(_) => "array",
        }
    }
}

/// Metadata for one model attribute: internal name, wire alias,
/// optionality, default, and value kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    alias: String,
    required: bool,
    default: Option<Value>,
    kind: FieldKind,
}

impl FieldDescriptor {
    /// Creates a required descriptor. Required fields carry no default.
    #[must_use]
    pub fn required(name: impl Into<String>, alias: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            required: true,
            default: None,
            kind,
        }
    }

    /// Creates an optional descriptor with no default.
    #[must_use]
    pub fn optional(name: impl Into<String>, alias: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            required: false,
            default: None,
            kind,
        }
    }

    /// Attaches a default used when the field is absent at decode or
    /// construction time. Only valid on optional scalar fields; violations
    /// surface as [`WireError::InvalidSchema`] at schema build time.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// The internal field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire-format alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Whether the field must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The field's value kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// Ordered, immutable field table for one concrete model type.
///
/// Descriptor order is stable and defines the wire-dict key order on
/// output.
#[derive(Debug, PartialEq)]
pub struct ModelSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl ModelSchema {
    /// Starts a validating builder for a schema with the given type name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The model type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptors, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a descriptor by internal name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.name() == name)
    }

    /// Looks up a descriptor by wire alias.
    #[must_use]
    pub fn field_by_alias(&self, alias: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.alias() == alias)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|d| d.name() == name)
    }

    /// Encodes a record into its wire dict.
    ///
    /// Fields holding a value are written under their wire alias in
    /// descriptor order; absent optional fields are omitted entirely,
    /// never written as `null`. The record was validated at construction,
    /// so the walk does not re-check required-field presence.
    #[must_use]
    pub fn encode(&self, record: &Record) -> Map<String, Value> {
        let mut dict = Map::new();
        for (index, descriptor) in self.fields.iter().enumerate() {
            if let Some(value) = record.value_at(index) {
                dict.insert(descriptor.alias().to_string(), encode_value(value));
            }
        }
        dict
    }

    /// Decodes a wire dict into a validated record.
    ///
    /// Missing required aliases fail with
    /// [`WireError::MissingRequiredField`]; missing optional aliases take
    /// the descriptor default or stay absent. Explicit `null` is treated
    /// as absence. Wire keys not covered by any descriptor are ignored.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` or `TypeMismatch` as described above.
    pub fn decode(schema: &Arc<Self>, dict: &Map<String, Value>) -> WireResult<Record> {
        let mut values = Vec::with_capacity(schema.fields.len());
        for descriptor in &schema.fields {
            let raw = dict.get(descriptor.alias()).filter(|v| !v.is_null());
            let value = match raw {
                Some(value) => Some(decode_value(descriptor, value).inspect_err(|err| {
                    tracing::trace!(schema = schema.name(), field = descriptor.name(), %err, "decode failed");
                })?),
                None if descriptor.is_required() => {
                    tracing::trace!(
                        schema = schema.name(),
                        field = descriptor.name(),
                        "required field absent"
                    );
                    return Err(WireError::missing_field(descriptor.name()));
                }
                None => descriptor.default.clone().map(FieldValue::Scalar),
            };
            values.push(value);
        }
        Ok(Record::from_parts(Arc::clone(schema), values))
    }
}

fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Scalar(v) => v.clone(),
        FieldValue::Model(record) => Value::Object(record.encode()),
        FieldValue::ModelList(records) => Value::Array(
            records
                .iter()
                .map(|record| Value::Object(record.encode()))
                .collect(),
        ),
        FieldValue::ScalarList(items) => Value::Array(items.clone()),
    }
}

fn decode_value(descriptor: &FieldDescriptor, value: &Value) -> WireResult<FieldValue> {
    let mismatch =
        || WireError::type_mismatch(descriptor.name(), descriptor.kind().expected(), json_kind(value));

    match descriptor.kind() {
        FieldKind::Scalar(kind) => {
            if !kind.matches(value) {
                return Err(mismatch());
            }
            Ok(FieldValue::Scalar(value.clone()))
        }
        FieldKind::Model(schema) => {
            let obj = value.as_object().ok_or_else(mismatch)?;
            Ok(FieldValue::Model(ModelSchema::decode(schema, obj)?))
        }
        FieldKind::ModelList(schema) => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                let obj = item.as_object().ok_or_else(|| {
                    WireError::type_mismatch(
                        descriptor.name(),
                        descriptor.kind().expected(),
                        json_kind(item),
                    )
                })?;
                records.push(ModelSchema::decode(schema, obj)?);
            }
            Ok(FieldValue::ModelList(records))
        }
        FieldKind::ScalarList(kind) => {
            let items = value.as_array().ok_or_else(mismatch)?;
            for item in items {
                if !kind.matches(item) {
                    return Err(WireError::type_mismatch(
                        descriptor.name(),
                        kind.name(),
                        json_kind(item),
                    ));
                }
            }
            Ok(FieldValue::ScalarList(items.clone()))
        }
        FieldKind::DiscriminatedModel(map) => {
            let obj = value.as_object().ok_or_else(mismatch)?;
            Ok(FieldValue::Model(map.decode(obj)?))
        }
    }
}

/// Validating builder for [`ModelSchema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Appends one descriptor.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Appends a sequence of descriptors. Subtype composition: a family
    /// member extends a shared base by passing the base descriptors here
    /// and appending its own.
    #[must_use]
    pub fn fields(mut self, descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(descriptors);
        self
    }

    /// Validates and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidSchema`] when a name or alias is
    /// duplicated, a required field carries a default, or a default is
    /// attached to a non-scalar field.
    pub fn build(self) -> WireResult<Arc<ModelSchema>> {
        let mut names = HashSet::new();
        let mut aliases = HashSet::new();
        for descriptor in &self.fields {
            if !names.insert(descriptor.name()) {
                return Err(WireError::invalid_schema(format!(
                    "{}: duplicate field name {}",
                    self.name,
                    descriptor.name()
                )));
            }
            if !aliases.insert(descriptor.alias()) {
                return Err(WireError::invalid_schema(format!(
                    "{}: duplicate wire alias {}",
                    self.name,
                    descriptor.alias()
                )));
            }
            if let Some(default) = descriptor.default_value() {
                if descriptor.is_required() {
                    return Err(WireError::invalid_schema(format!(
                        "{}: required field {} carries a default",
                        self.name,
                        descriptor.name()
                    )));
                }
                match descriptor.kind() {
                    FieldKind::Scalar(kind) if kind.matches(default) => {}
                    FieldKind::Scalar(kind) => {
                        return Err(WireError::invalid_schema(format!(
                            "{}: default for {} is not a {}",
                            self.name,
                            descriptor.name(),
                            kind.name()
                        )));
                    }
                    _ => {
                        return Err(WireError::invalid_schema(format!(
                            "{}: default on non-scalar field {}",
                            self.name,
                            descriptor.name()
                        )));
                    }
                }
            }
        }
        Ok(Arc::new(ModelSchema {
            name: self.name,
            fields: self.fields,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> Arc<ModelSchema> {
        ModelSchema::builder("Sample")
            .field(FieldDescriptor::required(
                "name",
                "name",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "page_size",
                "page-size",
                FieldKind::Scalar(ScalarKind::Integer),
            ))
            .build()
            .expect("schema should build")
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let err = ModelSchema::builder("Bad")
            .field(FieldDescriptor::required(
                "a",
                "x",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "b",
                "x",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect_err("duplicate alias should be rejected");

        assert!(matches!(err, WireError::InvalidSchema { .. }));
    }

    #[test]
    fn test_required_with_default_rejected() {
        let err = ModelSchema::builder("Bad")
            .field(
                FieldDescriptor::required("a", "a", FieldKind::Scalar(ScalarKind::String))
                    .with_default(json!("x")),
            )
            .build()
            .expect_err("required field with default should be rejected");

        assert!(matches!(err, WireError::InvalidSchema { .. }));
    }

    #[test]
    fn test_decode_missing_required() {
        let schema = sample_schema();
        let dict = serde_json::Map::new();
        let err = ModelSchema::decode(&schema, &dict).expect_err("missing name should fail");

        assert!(matches!(
            err,
            WireError::MissingRequiredField { field } if field == "name"
        ));
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let schema = sample_schema();
        let dict = json!({"name": "n1", "extra-key": true})
            .as_object()
            .cloned()
            .expect("object");

        let record = ModelSchema::decode(&schema, &dict).expect("decode should succeed");
        assert_eq!(record.require_str("name").expect("name"), "n1");
        assert!(record.get("extra-key").is_none());
    }

    #[test]
    fn test_decode_null_is_absence() {
        let schema = sample_schema();
        let dict = json!({"name": "n1", "page-size": null})
            .as_object()
            .cloned()
            .expect("object");

        let record = ModelSchema::decode(&schema, &dict).expect("decode should succeed");
        assert!(record.get("page_size").is_none());
    }

    #[test]
    fn test_decode_type_mismatch() {
        let schema = sample_schema();
        let dict = json!({"name": "n1", "page-size": "ten"})
            .as_object()
            .cloned()
            .expect("object");

        let err = ModelSchema::decode(&schema, &dict).expect_err("string page-size should fail");
        assert!(matches!(
            err,
            WireError::TypeMismatch { field, expected, .. }
                if field == "page_size" && expected == "integer"
        ));
    }

    #[test]
    fn test_any_list_accepts_null_elements() {
        let schema = ModelSchema::builder("WithValues")
            .field(FieldDescriptor::optional(
                "values",
                "values",
                FieldKind::ScalarList(ScalarKind::Any),
            ))
            .build()
            .expect("schema should build");

        let dict = json!({"values": ["2024-01-01", null, 7]})
            .as_object()
            .cloned()
            .expect("object");

        let record = ModelSchema::decode(&schema, &dict).expect("null elements pass through");
        let items = record
            .value_list_opt("values")
            .expect("values")
            .expect("set");
        assert_eq!(items[1], Value::Null);

        let reencoded = record.encode();
        assert_eq!(reencoded.get("values"), Some(&json!(["2024-01-01", null, 7])));
    }

    #[test]
    fn test_encode_omits_absent_optionals() {
        let schema = sample_schema();
        let record = Record::builder(&schema)
            .set_str("name", "n1")
            .build()
            .expect("record should build");

        let dict = schema.encode(&record);
        assert_eq!(dict.get("name"), Some(&json!("n1")));
        assert!(!dict.contains_key("page-size"));
    }

    #[test]
    fn test_decode_applies_default() {
        let schema = ModelSchema::builder("WithDefault")
            .field(FieldDescriptor::optional(
                "kind",
                "kind",
                FieldKind::Scalar(ScalarKind::String),
            ).with_default(json!("struct")))
            .build()
            .expect("schema should build");

        let record =
            ModelSchema::decode(&schema, &serde_json::Map::new()).expect("decode should succeed");
        assert_eq!(record.require_str("kind").expect("kind"), "struct");
    }
}
