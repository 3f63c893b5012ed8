//! Principal (service identity) models for the management API.

use lakecat_wire::{
    FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireModel, WireResult,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// A principal managed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The principal name.
    pub name: String,

    /// OAuth client ID assigned to the principal.
    pub client_id: Option<String>,

    /// Free-form properties.
    pub properties: Option<HashMap<String, String>>,

    /// Version of the entity, for optimistic updates.
    pub entity_version: Option<i64>,
}

fn principal_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("Principal")
            .field(FieldDescriptor::required(
                "name",
                "name",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "client_id",
                "clientId",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "properties",
                "properties",
                FieldKind::Scalar(ScalarKind::StringMap),
            ))
            .field(FieldDescriptor::optional(
                "entity_version",
                "entityVersion",
                FieldKind::Scalar(ScalarKind::Integer),
            ))
            .build()
            .expect("Principal schema is statically valid")
    })
}

impl WireModel for Principal {
    fn schema() -> &'static Arc<ModelSchema> {
        principal_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("name", self.name.as_str())
            .set_str_opt("client_id", self.client_id.as_deref())
            .set_string_map_opt("properties", self.properties.as_ref())
            .set_i64_opt("entity_version", self.entity_version)
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            name: record.require_str("name")?.to_string(),
            client_id: record.str_opt("client_id")?.map(str::to_string),
            properties: record.string_map_opt("properties")?,
            entity_version: record.i64_opt("entity_version")?,
        })
    }
}

/// Client credentials issued for a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalCredentials {
    /// OAuth client ID.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,
}

fn principal_credentials_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("PrincipalCredentials")
            .field(FieldDescriptor::required(
                "client_id",
                "clientId",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "client_secret",
                "clientSecret",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("PrincipalCredentials schema is statically valid")
    })
}

impl WireModel for PrincipalCredentials {
    fn schema() -> &'static Arc<ModelSchema> {
        principal_credentials_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("client_id", self.client_id.as_str())
            .set_str("client_secret", self.client_secret.as_str())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            client_id: record.require_str("client_id")?.to_string(),
            client_secret: record.require_str("client_secret")?.to_string(),
        })
    }
}

/// A principal together with its freshly issued credentials.
///
/// Returned only from create and rotate operations; the secret is never
/// retrievable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalWithCredentials {
    /// The principal.
    pub principal: Principal,

    /// The issued credentials.
    pub credentials: PrincipalCredentials,
}

fn principal_with_credentials_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("PrincipalWithCredentials")
            .field(FieldDescriptor::required(
                "principal",
                "principal",
                FieldKind::Model(Arc::clone(principal_schema())),
            ))
            .field(FieldDescriptor::required(
                "credentials",
                "credentials",
                FieldKind::Model(Arc::clone(principal_credentials_schema())),
            ))
            .build()
            .expect("PrincipalWithCredentials schema is statically valid")
    })
}

impl WireModel for PrincipalWithCredentials {
    fn schema() -> &'static Arc<ModelSchema> {
        principal_with_credentials_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_record("principal", self.principal.to_record()?)
            .set_record("credentials", self.credentials.to_record()?)
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            principal: Principal::from_record(record.require_record("principal")?)?,
            credentials: PrincipalCredentials::from_record(record.require_record("credentials")?)?,
        })
    }
}

/// Request to create a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrincipalRequest {
    /// The principal to create.
    pub principal: Option<Principal>,

    /// Whether the first credentials must be rotated before use.
    pub credential_rotation_required: Option<bool>,
}

fn create_principal_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("CreatePrincipalRequest")
            .field(FieldDescriptor::optional(
                "principal",
                "principal",
                FieldKind::Model(Arc::clone(principal_schema())),
            ))
            .field(FieldDescriptor::optional(
                "credential_rotation_required",
                "credentialRotationRequiredInitially",
                FieldKind::Scalar(ScalarKind::Boolean),
            ))
            .build()
            .expect("CreatePrincipalRequest schema is statically valid")
    })
}

impl WireModel for CreatePrincipalRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        create_principal_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        let principal = self
            .principal
            .as_ref()
            .map(WireModel::to_record)
            .transpose()?;
        Record::builder(Self::schema())
            .set_record_opt("principal", principal)
            .set_bool_opt(
                "credential_rotation_required",
                self.credential_rotation_required,
            )
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            principal: record
                .record_opt("principal")?
                .map(Principal::from_record)
                .transpose()?,
            credential_rotation_required: record.bool_opt("credential_rotation_required")?,
        })
    }
}

/// Request to update a principal, guarded by its current entity version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrincipalRequest {
    /// The entity version the caller last observed.
    pub current_entity_version: i64,

    /// The full replacement property set.
    pub properties: HashMap<String, String>,
}

fn update_principal_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("UpdatePrincipalRequest")
            .field(FieldDescriptor::required(
                "current_entity_version",
                "currentEntityVersion",
                FieldKind::Scalar(ScalarKind::Integer),
            ))
            .field(FieldDescriptor::required(
                "properties",
                "properties",
                FieldKind::Scalar(ScalarKind::StringMap),
            ))
            .build()
            .expect("UpdatePrincipalRequest schema is statically valid")
    })
}

impl WireModel for UpdatePrincipalRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        update_principal_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_i64("current_entity_version", self.current_entity_version)
            .set_string_map("properties", &self.properties)
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            current_entity_version: record.require_i64("current_entity_version")?,
            properties: record.require_string_map("properties")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakecat_wire::WireError;
    use serde_json::json;

    #[test]
    fn test_principal_roundtrip() {
        let principal = Principal {
            name: "ingest-service".to_string(),
            client_id: Some("client-1".to_string()),
            properties: None,
            entity_version: Some(3),
        };

        let dict = principal.to_wire_dict().expect("encode");
        assert_eq!(dict.get("clientId"), Some(&json!("client-1")));
        assert_eq!(dict.get("entityVersion"), Some(&json!(3)));
        assert!(!dict.contains_key("properties"));

        let parsed = Principal::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, principal);
    }

    #[test]
    fn test_principal_with_credentials_nested_roundtrip() {
        let value = PrincipalWithCredentials {
            principal: Principal {
                name: "etl".to_string(),
                client_id: None,
                properties: None,
                entity_version: None,
            },
            credentials: PrincipalCredentials {
                client_id: "client-2".to_string(),
                client_secret: "s3cret".to_string(),
            },
        };

        let text = value.to_wire_string().expect("encode");
        let parsed = PrincipalWithCredentials::from_wire_str(&text).expect("decode");
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_update_principal_requires_version() {
        let text = r#"{"properties": {"team": "data"}}"#;
        let err = UpdatePrincipalRequest::from_wire_str(text).expect_err("missing version");

        assert!(matches!(
            err,
            WireError::MissingRequiredField { field } if field == "current_entity_version"
        ));
    }

    #[test]
    fn test_update_principal_roundtrip() {
        let request = UpdatePrincipalRequest {
            current_entity_version: 7,
            properties: HashMap::from([("team".to_string(), "data".to_string())]),
        };

        let dict = request.to_wire_dict().expect("encode");
        assert_eq!(dict.get("currentEntityVersion"), Some(&json!(7)));

        let parsed = UpdatePrincipalRequest::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_create_principal_empty_request() {
        let request = CreatePrincipalRequest {
            principal: None,
            credential_rotation_required: None,
        };

        let dict = request.to_wire_dict().expect("encode");
        assert!(dict.is_empty());

        let parsed = CreatePrincipalRequest::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, request);
    }
}
