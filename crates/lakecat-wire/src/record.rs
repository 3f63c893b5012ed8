//! Validated model instances.
//!
//! A [`Record`] holds one optional value per field descriptor of its
//! schema. Records are immutable after construction; the
//! [`RecordBuilder`] validates required-field presence and kind
//! conformance on `build()`, and [`Record::rebuild`] yields a seeded
//! builder for rebuild-with-changes.

use crate::error::{json_kind, WireError, WireResult};
use crate::schema::{FieldKind, ModelSchema};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One field's value inside a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A scalar wire value.
    Scalar(Value),
    /// A nested record.
    Model(Record),
    /// An ordered list of nested records.
    ModelList(Vec<Record>),
    /// An ordered list of scalar wire values.
    ScalarList(Vec<Value>),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(value) => json_kind(value),
            Self::Model(_) => "object",
            Self::ModelList(_) => "array of objects",
            Self::ScalarList(_) => "array",
        }
    }

    fn conforms(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Self::Scalar(value), FieldKind::Scalar(scalar)) => scalar.matches(value),
            (Self::Model(record), FieldKind::Model(schema)) => {
                record.schema().as_ref() == schema.as_ref()
            }
            (Self::Model(record), FieldKind::DiscriminatedModel(map)) => {
                map.contains_schema(record.schema())
            }
            (Self::ModelList(records), FieldKind::ModelList(schema)) => records
                .iter()
                .all(|record| record.schema().as_ref() == schema.as_ref()),
            (Self::ScalarList(items), FieldKind::ScalarList(scalar)) => {
                items.iter().all(|item| scalar.matches(item))
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Model(record) => write!(f, "{record}"),
            Self::ModelList(records) => {
                write!(f, "[")?;
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{record}")?;
                }
                write!(f, "]")
            }
            Self::ScalarList(items) => write!(f, "{}", Value::Array(items.clone())),
        }
    }
}

/// An immutable, validated instance of one model schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<ModelSchema>,
    values: Vec<Option<FieldValue>>,
}

impl Record {
    /// Starts a validating builder for the given schema.
    #[must_use]
    pub fn builder(schema: &Arc<ModelSchema>) -> RecordBuilder {
        RecordBuilder {
            values: vec![None; schema.fields().len()],
            schema: Arc::clone(schema),
            invalid: None,
        }
    }

    pub(crate) fn from_parts(schema: Arc<ModelSchema>, values: Vec<Option<FieldValue>>) -> Self {
        Self { schema, values }
    }

    /// The schema this record was constructed against.
    #[must_use]
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// Returns a builder seeded with this record's values, for
    /// rebuild-with-changes. The rebuilt record revalidates on `build()`.
    #[must_use]
    pub fn rebuild(&self) -> RecordBuilder {
        RecordBuilder {
            schema: Arc::clone(&self.schema),
            values: self.values.clone(),
            invalid: None,
        }
    }

    /// Returns the value of a field by internal name, or `None` when the
    /// field is absent or the name is not part of the schema.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.schema
            .index_of(field)
            .and_then(|index| self.values[index].as_ref())
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&FieldValue> {
        self.values[index].as_ref()
    }

    /// Encodes this record into its wire dict.
    #[must_use]
    pub fn encode(&self) -> Map<String, Value> {
        self.schema.encode(self)
    }

    fn scalar_of(&self, field: &str, expected: &'static str) -> WireResult<Option<&Value>> {
        match self.get(field) {
            None => Ok(None),
            Some(FieldValue::Scalar(value)) => Ok(Some(value)),
            Some(other) => Err(WireError::type_mismatch(field, expected, other.kind_name())),
        }
    }

    /// Returns a required string field.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when absent, `TypeMismatch` when not a string.
    pub fn require_str(&self, field: &str) -> WireResult<&str> {
        self.str_opt(field)?
            .ok_or_else(|| WireError::missing_field(field))
    }

    /// Returns an optional string field.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not a string.
    pub fn str_opt(&self, field: &str) -> WireResult<Option<&str>> {
        match self.scalar_of(field, "string")? {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| WireError::type_mismatch(field, "string", json_kind(value))),
        }
    }

    /// Returns a required integer field.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when absent, `TypeMismatch` when not an integer.
    pub fn require_i64(&self, field: &str) -> WireResult<i64> {
        self.i64_opt(field)?
            .ok_or_else(|| WireError::missing_field(field))
    }

    /// Returns an optional integer field.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not an integer.
    pub fn i64_opt(&self, field: &str) -> WireResult<Option<i64>> {
        match self.scalar_of(field, "integer")? {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| WireError::type_mismatch(field, "integer", json_kind(value))),
        }
    }

    /// Returns an optional boolean field.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not a boolean.
    pub fn bool_opt(&self, field: &str) -> WireResult<Option<bool>> {
        match self.scalar_of(field, "boolean")? {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| WireError::type_mismatch(field, "boolean", json_kind(value))),
        }
    }

    /// Returns an optional raw scalar value (for passthrough fields).
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the field holds a non-scalar value.
    pub fn value_opt(&self, field: &str) -> WireResult<Option<&Value>> {
        self.scalar_of(field, "value")
    }

    /// Returns a required string-to-string property map.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when absent, `TypeMismatch` on shape errors.
    pub fn require_string_map(&self, field: &str) -> WireResult<HashMap<String, String>> {
        self.string_map_opt(field)?
            .ok_or_else(|| WireError::missing_field(field))
    }

    /// Returns an optional string-to-string property map.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not an object of strings.
    pub fn string_map_opt(&self, field: &str) -> WireResult<Option<HashMap<String, String>>> {
        let Some(value) = self.scalar_of(field, "string map")? else {
            return Ok(None);
        };
        let obj = value
            .as_object()
            .ok_or_else(|| WireError::type_mismatch(field, "string map", json_kind(value)))?;
        let mut map = HashMap::with_capacity(obj.len());
        for (key, item) in obj {
            let text = item
                .as_str()
                .ok_or_else(|| WireError::type_mismatch(field, "string map", json_kind(item)))?;
            map.insert(key.clone(), text.to_string());
        }
        Ok(Some(map))
    }

    /// Returns a required nested record.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when absent, `TypeMismatch` when the field
    /// does not hold a nested model.
    pub fn require_record(&self, field: &str) -> WireResult<&Record> {
        self.record_opt(field)?
            .ok_or_else(|| WireError::missing_field(field))
    }

    /// Returns an optional nested record.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not a nested model.
    pub fn record_opt(&self, field: &str) -> WireResult<Option<&Record>> {
        match self.get(field) {
            None => Ok(None),
            Some(FieldValue::Model(record)) => Ok(Some(record)),
            Some(other) => Err(WireError::type_mismatch(field, "object", other.kind_name())),
        }
    }

    /// Returns a required list of nested records.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when absent, `TypeMismatch` when the field
    /// does not hold a model list.
    pub fn require_records(&self, field: &str) -> WireResult<&[Record]> {
        self.records_opt(field)?
            .ok_or_else(|| WireError::missing_field(field))
    }

    /// Returns an optional list of nested records.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not a model list.
    pub fn records_opt(&self, field: &str) -> WireResult<Option<&[Record]>> {
        match self.get(field) {
            None => Ok(None),
            Some(FieldValue::ModelList(records)) => Ok(Some(records)),
            Some(other) => Err(WireError::type_mismatch(
                field,
                "array of objects",
                other.kind_name(),
            )),
        }
    }

    /// Returns a required list of strings.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when absent, `TypeMismatch` on shape errors.
    pub fn require_str_list(&self, field: &str) -> WireResult<Vec<String>> {
        self.str_list_opt(field)?
            .ok_or_else(|| WireError::missing_field(field))
    }

    /// Returns an optional list of strings.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not a list of strings.
    pub fn str_list_opt(&self, field: &str) -> WireResult<Option<Vec<String>>> {
        let Some(items) = self.scalar_list_of(field)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let text = item
                .as_str()
                .ok_or_else(|| WireError::type_mismatch(field, "string", json_kind(item)))?;
            out.push(text.to_string());
        }
        Ok(Some(out))
    }

    /// Returns an optional list of integers.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when present but not a list of integers.
    pub fn i64_list_opt(&self, field: &str) -> WireResult<Option<Vec<i64>>> {
        let Some(items) = self.scalar_list_of(field)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let number = item
                .as_i64()
                .ok_or_else(|| WireError::type_mismatch(field, "integer", json_kind(item)))?;
            out.push(number);
        }
        Ok(Some(out))
    }

    /// Returns an optional list of raw scalar values.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the field holds a non-list value.
    pub fn value_list_opt(&self, field: &str) -> WireResult<Option<&[Value]>> {
        self.scalar_list_of(field)
    }

    fn scalar_list_of(&self, field: &str) -> WireResult<Option<&[Value]>> {
        match self.get(field) {
            None => Ok(None),
            Some(FieldValue::ScalarList(items)) => Ok(Some(items)),
            Some(other) => Err(WireError::type_mismatch(field, "array", other.kind_name())),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.schema.name())?;
        let mut first = true;
        for (index, descriptor) in self.schema.fields().iter().enumerate() {
            if let Some(value) = &self.values[index] {
                if !first {
                    write!(f, ",")?;
                }
                first = false;
                write!(f, " {}: {value}", descriptor.name())?;
            }
        }
        write!(f, " }}")
    }
}

/// Validating builder for [`Record`].
///
/// Setters on unknown field names are remembered and reported as an error
/// from [`RecordBuilder::build`]; setters never panic.
#[derive(Debug)]
pub struct RecordBuilder {
    schema: Arc<ModelSchema>,
    values: Vec<Option<FieldValue>>,
    invalid: Option<WireError>,
}

impl RecordBuilder {
    fn note_unknown_field(&mut self, field: &str) {
        if self.invalid.is_none() {
            self.invalid = Some(WireError::invalid_schema(format!(
                "{}: no field named {field}",
                self.schema.name()
            )));
        }
    }

    fn set(mut self, field: &str, value: FieldValue) -> Self {
        match self.schema.index_of(field) {
            Some(index) => self.values[index] = Some(value),
            None => self.note_unknown_field(field),
        }
        self
    }

    /// Sets a string field.
    #[must_use]
    pub fn set_str(self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, FieldValue::Scalar(Value::String(value.into())))
    }

    /// Sets a string field when the value is present.
    #[must_use]
    pub fn set_str_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.set_str(field, value),
            None => self,
        }
    }

    /// Sets an integer field.
    #[must_use]
    pub fn set_i64(self, field: &str, value: i64) -> Self {
        self.set(field, FieldValue::Scalar(Value::from(value)))
    }

    /// Sets an integer field when the value is present.
    #[must_use]
    pub fn set_i64_opt(self, field: &str, value: Option<i64>) -> Self {
        match value {
            Some(value) => self.set_i64(field, value),
            None => self,
        }
    }

    /// Sets a boolean field.
    #[must_use]
    pub fn set_bool(self, field: &str, value: bool) -> Self {
        self.set(field, FieldValue::Scalar(Value::Bool(value)))
    }

    /// Sets a boolean field when the value is present.
    #[must_use]
    pub fn set_bool_opt(self, field: &str, value: Option<bool>) -> Self {
        match value {
            Some(value) => self.set_bool(field, value),
            None => self,
        }
    }

    /// Sets a passthrough scalar field from a raw JSON value.
    #[must_use]
    pub fn set_value(self, field: &str, value: Value) -> Self {
        self.set(field, FieldValue::Scalar(value))
    }

    /// Sets a passthrough scalar field when the value is present.
    #[must_use]
    pub fn set_value_opt(self, field: &str, value: Option<&Value>) -> Self {
        match value {
            Some(value) => self.set_value(field, value.clone()),
            None => self,
        }
    }

    /// Sets a string-to-string property-map field.
    #[must_use]
    pub fn set_string_map(self, field: &str, value: &HashMap<String, String>) -> Self {
        let mut obj = Map::with_capacity(value.len());
        for (key, item) in value {
            obj.insert(key.clone(), Value::String(item.clone()));
        }
        self.set(field, FieldValue::Scalar(Value::Object(obj)))
    }

    /// Sets a property-map field when the value is present.
    #[must_use]
    pub fn set_string_map_opt(self, field: &str, value: Option<&HashMap<String, String>>) -> Self {
        match value {
            Some(value) => self.set_string_map(field, value),
            None => self,
        }
    }

    /// Sets a nested-model field.
    #[must_use]
    pub fn set_record(self, field: &str, value: Record) -> Self {
        self.set(field, FieldValue::Model(value))
    }

    /// Sets a nested-model field when the value is present.
    #[must_use]
    pub fn set_record_opt(self, field: &str, value: Option<Record>) -> Self {
        match value {
            Some(value) => self.set_record(field, value),
            None => self,
        }
    }

    /// Sets a list-of-models field, preserving element order.
    #[must_use]
    pub fn set_records(self, field: &str, value: Vec<Record>) -> Self {
        self.set(field, FieldValue::ModelList(value))
    }

    /// Sets a list-of-models field when the value is present.
    #[must_use]
    pub fn set_records_opt(self, field: &str, value: Option<Vec<Record>>) -> Self {
        match value {
            Some(value) => self.set_records(field, value),
            None => self,
        }
    }

    /// Sets a list-of-strings field.
    #[must_use]
    pub fn set_str_list(self, field: &str, value: &[String]) -> Self {
        let items = value
            .iter()
            .map(|item| Value::String(item.clone()))
            .collect();
        self.set(field, FieldValue::ScalarList(items))
    }

    /// Sets a list-of-strings field when the value is present.
    #[must_use]
    pub fn set_str_list_opt(self, field: &str, value: Option<&[String]>) -> Self {
        match value {
            Some(value) => self.set_str_list(field, value),
            None => self,
        }
    }

    /// Sets a list-of-integers field.
    #[must_use]
    pub fn set_i64_list(self, field: &str, value: &[i64]) -> Self {
        let items = value.iter().map(|item| Value::from(*item)).collect();
        self.set(field, FieldValue::ScalarList(items))
    }

    /// Sets a list-of-integers field when the value is present.
    #[must_use]
    pub fn set_i64_list_opt(self, field: &str, value: Option<&[i64]>) -> Self {
        match value {
            Some(value) => self.set_i64_list(field, value),
            None => self,
        }
    }

    /// Sets a passthrough list field from raw JSON values.
    #[must_use]
    pub fn set_value_list_opt(self, field: &str, value: Option<&[Value]>) -> Self {
        match value {
            Some(value) => self.set(field, FieldValue::ScalarList(value.to_vec())),
            None => self,
        }
    }

    /// Clears a field, leaving it absent. Clearing a required field makes
    /// `build()` fail; an unknown field name is reported from `build()`
    /// like a setter on one.
    #[must_use]
    pub fn clear(mut self, field: &str) -> Self {
        match self.schema.index_of(field) {
            Some(index) => self.values[index] = None,
            None => self.note_unknown_field(field),
        }
        self
    }

    /// Validates and builds the record.
    ///
    /// Every required descriptor must hold a value of the declared kind;
    /// optional descriptors take their default when left unset.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField`, `TypeMismatch`, or `InvalidSchema`
    /// (for setters addressed at unknown field names).
    pub fn build(mut self) -> WireResult<Record> {
        if let Some(err) = self.invalid {
            return Err(err);
        }
        for (index, descriptor) in self.schema.fields().iter().enumerate() {
            match &self.values[index] {
                Some(value) => {
                    if !value.conforms(descriptor.kind()) {
                        return Err(WireError::type_mismatch(
                            descriptor.name(),
                            descriptor.kind().expected(),
                            value.kind_name(),
                        ));
                    }
                }
                None if descriptor.is_required() => {
                    return Err(WireError::missing_field(descriptor.name()));
                }
                None => {
                    self.values[index] =
                        descriptor.default_value().cloned().map(FieldValue::Scalar);
                }
            }
        }
        Ok(Record::from_parts(self.schema, self.values))
    }
}
