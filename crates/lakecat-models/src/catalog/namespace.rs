//! Namespace request and response models.

use lakecat_wire::error::json_kind;
use lakecat_wire::{
    FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireError, WireModel, WireResult,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

fn namespaces_to_values(namespaces: &[Vec<String>]) -> Vec<Value> {
    namespaces
        .iter()
        .map(|levels| Value::Array(levels.iter().cloned().map(Value::String).collect()))
        .collect()
}

fn namespaces_from_values(field: &str, values: &[Value]) -> WireResult<Vec<Vec<String>>> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let levels = value
            .as_array()
            .ok_or_else(|| WireError::type_mismatch(field, "array", json_kind(value)))?;
        let mut namespace = Vec::with_capacity(levels.len());
        for level in levels {
            let text = level
                .as_str()
                .ok_or_else(|| WireError::type_mismatch(field, "string", json_kind(level)))?;
            namespace.push(text.to_string());
        }
        out.push(namespace);
    }
    Ok(out)
}

/// Request to create a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNamespaceRequest {
    /// The namespace levels to create.
    pub namespace: Vec<String>,

    /// Properties to set on the namespace.
    pub properties: Option<HashMap<String, String>>,
}

fn create_namespace_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("CreateNamespaceRequest")
            .field(FieldDescriptor::required(
                "namespace",
                "namespace",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "properties",
                "properties",
                FieldKind::Scalar(ScalarKind::StringMap),
            ))
            .build()
            .expect("CreateNamespaceRequest schema is statically valid")
    })
}

impl WireModel for CreateNamespaceRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        create_namespace_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str_list("namespace", &self.namespace)
            .set_string_map_opt("properties", self.properties.as_ref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            namespace: record.require_str_list("namespace")?,
            properties: record.string_map_opt("properties")?,
        })
    }
}

/// Response to a namespace creation, echoing the namespace and the
/// properties actually set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNamespaceResponse {
    /// The created namespace levels.
    pub namespace: Vec<String>,

    /// Properties set on the namespace.
    pub properties: Option<HashMap<String, String>>,
}

fn create_namespace_response_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("CreateNamespaceResponse")
            .field(FieldDescriptor::required(
                "namespace",
                "namespace",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "properties",
                "properties",
                FieldKind::Scalar(ScalarKind::StringMap),
            ))
            .build()
            .expect("CreateNamespaceResponse schema is statically valid")
    })
}

impl WireModel for CreateNamespaceResponse {
    fn schema() -> &'static Arc<ModelSchema> {
        create_namespace_response_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str_list("namespace", &self.namespace)
            .set_string_map_opt("properties", self.properties.as_ref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            namespace: record.require_str_list("namespace")?,
            properties: record.string_map_opt("properties")?,
        })
    }
}

/// Response describing a namespace and its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNamespaceResponse {
    /// The namespace levels.
    pub namespace: Vec<String>,

    /// Namespace properties.
    pub properties: Option<HashMap<String, String>>,
}

fn get_namespace_response_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("GetNamespaceResponse")
            .field(FieldDescriptor::required(
                "namespace",
                "namespace",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "properties",
                "properties",
                FieldKind::Scalar(ScalarKind::StringMap),
            ))
            .build()
            .expect("GetNamespaceResponse schema is statically valid")
    })
}

impl WireModel for GetNamespaceResponse {
    fn schema() -> &'static Arc<ModelSchema> {
        get_namespace_response_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str_list("namespace", &self.namespace)
            .set_string_map_opt("properties", self.properties.as_ref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            namespace: record.require_str_list("namespace")?,
            properties: record.string_map_opt("properties")?,
        })
    }
}

/// Response listing namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNamespacesResponse {
    /// Namespace identifiers, in listing order.
    pub namespaces: Vec<Vec<String>>,

    /// Token for fetching the next page of results.
    pub next_page_token: Option<String>,
}

fn list_namespaces_response_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("ListNamespacesResponse")
            .field(FieldDescriptor::required(
                "namespaces",
                "namespaces",
                FieldKind::ScalarList(ScalarKind::Any),
            ))
            .field(FieldDescriptor::optional(
                "next_page_token",
                "next-page-token",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("ListNamespacesResponse schema is statically valid")
    })
}

impl WireModel for ListNamespacesResponse {
    fn schema() -> &'static Arc<ModelSchema> {
        list_namespaces_response_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        let namespaces = namespaces_to_values(&self.namespaces);
        Record::builder(Self::schema())
            .set_value_list_opt("namespaces", Some(&namespaces))
            .set_str_opt("next_page_token", self.next_page_token.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        let values = record
            .value_list_opt("namespaces")?
            .ok_or_else(|| WireError::missing_field("namespaces"))?;
        Ok(Self {
            namespaces: namespaces_from_values("namespaces", values)?,
            next_page_token: record.str_opt("next_page_token")?.map(str::to_string),
        })
    }
}

/// Request to update namespace properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNamespacePropertiesRequest {
    /// Property keys to remove.
    pub removals: Option<Vec<String>>,

    /// Properties to set or overwrite.
    pub updates: Option<HashMap<String, String>>,
}

fn update_namespace_properties_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("UpdateNamespacePropertiesRequest")
            .field(FieldDescriptor::optional(
                "removals",
                "removals",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "updates",
                "updates",
                FieldKind::Scalar(ScalarKind::StringMap),
            ))
            .build()
            .expect("UpdateNamespacePropertiesRequest schema is statically valid")
    })
}

impl WireModel for UpdateNamespacePropertiesRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        update_namespace_properties_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str_list_opt("removals", self.removals.as_deref())
            .set_string_map_opt("updates", self.updates.as_ref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            removals: record.str_list_opt("removals")?,
            updates: record.string_map_opt("updates")?,
        })
    }
}

/// Response to a namespace property update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNamespacePropertiesResponse {
    /// Property keys that were removed.
    pub removed: Vec<String>,

    /// Property keys that were set or overwritten.
    pub updated: Vec<String>,

    /// Requested removals that were not present.
    pub missing: Option<Vec<String>>,
}

fn update_namespace_properties_response_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("UpdateNamespacePropertiesResponse")
            .field(FieldDescriptor::required(
                "removed",
                "removed",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "updated",
                "updated",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "missing",
                "missing",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .build()
            .expect("UpdateNamespacePropertiesResponse schema is statically valid")
    })
}

impl WireModel for UpdateNamespacePropertiesResponse {
    fn schema() -> &'static Arc<ModelSchema> {
        update_namespace_properties_response_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str_list("removed", &self.removed)
            .set_str_list("updated", &self.updated)
            .set_str_list_opt("missing", self.missing.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            removed: record.require_str_list("removed")?,
            updated: record.require_str_list("updated")?,
            missing: record.str_list_opt("missing")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_namespace_roundtrip() {
        let request = CreateNamespaceRequest {
            namespace: vec!["prod".to_string(), "analytics".to_string()],
            properties: Some(HashMap::from([(
                "owner".to_string(),
                "data-team".to_string(),
            )])),
        };

        let dict = request.to_wire_dict().expect("encode");
        let parsed = CreateNamespaceRequest::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_create_namespace_omits_unset_properties() {
        let request = CreateNamespaceRequest {
            namespace: vec!["prod".to_string()],
            properties: None,
        };

        let dict = request.to_wire_dict().expect("encode");
        assert!(!dict.contains_key("properties"));
    }

    #[test]
    fn test_create_namespace_response_roundtrip() {
        let text = r#"{"namespace": ["prod"], "properties": {"owner": "data-team"}}"#;

        let response = CreateNamespaceResponse::from_wire_str(text).expect("decode");
        assert_eq!(response.namespace, vec!["prod"]);

        let dict = response.to_wire_dict().expect("encode");
        assert_eq!(dict.get("namespace"), Some(&json!(["prod"])));
        assert_eq!(dict.get("properties"), Some(&json!({"owner": "data-team"})));
    }

    #[test]
    fn test_list_namespaces_roundtrip() {
        let response = ListNamespacesResponse {
            namespaces: vec![
                vec!["db1".to_string()],
                vec!["db2".to_string(), "schema1".to_string()],
            ],
            next_page_token: Some("token123".to_string()),
        };

        let dict = response.to_wire_dict().expect("encode");
        assert_eq!(
            dict.get("namespaces"),
            Some(&json!([["db1"], ["db2", "schema1"]]))
        );

        let parsed = ListNamespacesResponse::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_list_namespaces_rejects_non_list_entries() {
        let text = r#"{"namespaces": [["db1"], "db2"]}"#;
        let err = ListNamespacesResponse::from_wire_str(text).expect_err("bad entry");

        assert!(matches!(err, WireError::TypeMismatch { .. }));
    }

    #[test]
    fn test_update_properties_roundtrip() {
        let response = UpdateNamespacePropertiesResponse {
            removed: vec!["stale".to_string()],
            updated: vec!["owner".to_string()],
            missing: None,
        };

        let dict = response.to_wire_dict().expect("encode");
        assert!(!dict.contains_key("missing"));

        let parsed = UpdateNamespacePropertiesResponse::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, response);
    }
}
