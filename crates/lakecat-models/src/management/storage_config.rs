//! Storage configuration models: the discriminated family describing
//! where and how a catalog stores table data.
//!
//! The `storageType` wire field selects the provider variant; every
//! variant shares the base fields and appends provider-specific ones.

use lakecat_wire::{
    DiscriminatorMap, FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireError,
    WireFamily, WireModel, WireResult,
};
use std::sync::{Arc, OnceLock};

/// Storage provider selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Amazon S3.
    S3,
    /// Google Cloud Storage.
    Gcs,
    /// Azure blob storage.
    Azure,
    /// Local filesystem (testing only).
    File,
}

impl StorageType {
    /// The wire value for this provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S3 => "S3",
            Self::Gcs => "GCS",
            Self::Azure => "AZURE",
            Self::File => "FILE",
        }
    }

    /// Parses a wire value.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for values outside the enum.
    pub fn parse(value: &str) -> WireResult<Self> {
        match value {
            "S3" => Ok(Self::S3),
            "GCS" => Ok(Self::Gcs),
            "AZURE" => Ok(Self::Azure),
            "FILE" => Ok(Self::File),
            other => Err(WireError::type_mismatch(
                "storage_type",
                "storage type",
                other,
            )),
        }
    }
}

/// Base descriptors shared by every storage configuration variant.
fn storage_config_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::required(
            "storage_type",
            "storageType",
            FieldKind::Scalar(ScalarKind::String),
        ),
        FieldDescriptor::optional(
            "allowed_locations",
            "allowedLocations",
            FieldKind::ScalarList(ScalarKind::String),
        ),
    ]
}

/// AWS storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsStorageConfigInfo {
    /// Location prefixes the catalog may read and write.
    pub allowed_locations: Option<Vec<String>>,

    /// IAM role to assume for storage access.
    pub role_arn: String,

    /// External ID supplied when assuming the role.
    pub external_id: Option<String>,

    /// IAM user the service assumes the role as.
    pub user_arn: Option<String>,
}

fn aws_storage_config_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("AwsStorageConfigInfo")
            .fields(storage_config_fields())
            .field(FieldDescriptor::required(
                "role_arn",
                "roleArn",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "external_id",
                "externalId",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "user_arn",
                "userArn",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("AwsStorageConfigInfo schema is statically valid")
    })
}

impl WireModel for AwsStorageConfigInfo {
    fn schema() -> &'static Arc<ModelSchema> {
        aws_storage_config_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("storage_type", StorageType::S3.as_str())
            .set_str_list_opt("allowed_locations", self.allowed_locations.as_deref())
            .set_str("role_arn", self.role_arn.as_str())
            .set_str_opt("external_id", self.external_id.as_deref())
            .set_str_opt("user_arn", self.user_arn.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            allowed_locations: record.str_list_opt("allowed_locations")?,
            role_arn: record.require_str("role_arn")?.to_string(),
            external_id: record.str_opt("external_id")?.map(str::to_string),
            user_arn: record.str_opt("user_arn")?.map(str::to_string),
        })
    }
}

/// Azure storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureStorageConfigInfo {
    /// Location prefixes the catalog may read and write.
    pub allowed_locations: Option<Vec<String>>,

    /// Entra tenant the storage accounts live in.
    pub tenant_id: String,

    /// Multi-tenant application name used for access.
    pub multi_tenant_app_name: Option<String>,

    /// URL the account admin uses to grant consent.
    pub consent_url: Option<String>,
}

fn azure_storage_config_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("AzureStorageConfigInfo")
            .fields(storage_config_fields())
            .field(FieldDescriptor::required(
                "tenant_id",
                "tenantId",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "multi_tenant_app_name",
                "multiTenantAppName",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "consent_url",
                "consentUrl",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("AzureStorageConfigInfo schema is statically valid")
    })
}

impl WireModel for AzureStorageConfigInfo {
    fn schema() -> &'static Arc<ModelSchema> {
        azure_storage_config_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("storage_type", StorageType::Azure.as_str())
            .set_str_list_opt("allowed_locations", self.allowed_locations.as_deref())
            .set_str("tenant_id", self.tenant_id.as_str())
            .set_str_opt(
                "multi_tenant_app_name",
                self.multi_tenant_app_name.as_deref(),
            )
            .set_str_opt("consent_url", self.consent_url.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            allowed_locations: record.str_list_opt("allowed_locations")?,
            tenant_id: record.require_str("tenant_id")?.to_string(),
            multi_tenant_app_name: record
                .str_opt("multi_tenant_app_name")?
                .map(str::to_string),
            consent_url: record.str_opt("consent_url")?.map(str::to_string),
        })
    }
}

/// Google Cloud storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsStorageConfigInfo {
    /// Location prefixes the catalog may read and write.
    pub allowed_locations: Option<Vec<String>>,

    /// Service account used for storage access.
    pub gcs_service_account: Option<String>,
}

fn gcs_storage_config_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("GcsStorageConfigInfo")
            .fields(storage_config_fields())
            .field(FieldDescriptor::optional(
                "gcs_service_account",
                "gcsServiceAccount",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("GcsStorageConfigInfo schema is statically valid")
    })
}

impl WireModel for GcsStorageConfigInfo {
    fn schema() -> &'static Arc<ModelSchema> {
        gcs_storage_config_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("storage_type", StorageType::Gcs.as_str())
            .set_str_list_opt("allowed_locations", self.allowed_locations.as_deref())
            .set_str_opt("gcs_service_account", self.gcs_service_account.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            allowed_locations: record.str_list_opt("allowed_locations")?,
            gcs_service_account: record.str_opt("gcs_service_account")?.map(str::to_string),
        })
    }
}

/// Local filesystem storage configuration (testing only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorageConfigInfo {
    /// Location prefixes the catalog may read and write.
    pub allowed_locations: Option<Vec<String>>,
}

fn file_storage_config_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("FileStorageConfigInfo")
            .fields(storage_config_fields())
            .build()
            .expect("FileStorageConfigInfo schema is statically valid")
    })
}

impl WireModel for FileStorageConfigInfo {
    fn schema() -> &'static Arc<ModelSchema> {
        file_storage_config_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("storage_type", StorageType::File.as_str())
            .set_str_list_opt("allowed_locations", self.allowed_locations.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            allowed_locations: record.str_list_opt("allowed_locations")?,
        })
    }
}

/// A storage configuration of any provider, selected by `storageType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfigInfo {
    /// Amazon S3 (`storageType = "S3"`).
    S3(AwsStorageConfigInfo),
    /// Google Cloud Storage (`storageType = "GCS"`).
    Gcs(GcsStorageConfigInfo),
    /// Azure blob storage (`storageType = "AZURE"`).
    Azure(AzureStorageConfigInfo),
    /// Local filesystem (`storageType = "FILE"`).
    File(FileStorageConfigInfo),
}

fn storage_config_discriminator() -> &'static Arc<DiscriminatorMap> {
    static MAP: OnceLock<Arc<DiscriminatorMap>> = OnceLock::new();
    MAP.get_or_init(|| {
        DiscriminatorMap::builder("storageType")
            .variant(StorageType::S3.as_str(), aws_storage_config_schema())
            .variant(StorageType::Gcs.as_str(), gcs_storage_config_schema())
            .variant(StorageType::Azure.as_str(), azure_storage_config_schema())
            .variant(StorageType::File.as_str(), file_storage_config_schema())
            .build()
            .expect("StorageConfigInfo discriminator map is statically valid")
    })
}

/// The family discriminator map, exposed for nested discriminated fields.
#[must_use]
pub fn storage_config_info_discriminator() -> &'static Arc<DiscriminatorMap> {
    storage_config_discriminator()
}

impl WireFamily for StorageConfigInfo {
    fn discriminator() -> &'static Arc<DiscriminatorMap> {
        storage_config_discriminator()
    }

    fn to_record(&self) -> WireResult<Record> {
        match self {
            Self::S3(config) => config.to_record(),
            Self::Gcs(config) => config.to_record(),
            Self::Azure(config) => config.to_record(),
            Self::File(config) => config.to_record(),
        }
    }

    fn from_record(record: Record) -> WireResult<Self> {
        match record.schema().name() {
            "AwsStorageConfigInfo" => Ok(Self::S3(AwsStorageConfigInfo::from_record(&record)?)),
            "GcsStorageConfigInfo" => Ok(Self::Gcs(GcsStorageConfigInfo::from_record(&record)?)),
            "AzureStorageConfigInfo" => {
                Ok(Self::Azure(AzureStorageConfigInfo::from_record(&record)?))
            }
            "FileStorageConfigInfo" => {
                Ok(Self::File(FileStorageConfigInfo::from_record(&record)?))
            }
            other => Err(WireError::invalid_schema(format!(
                "{other} is not a storage-config schema"
            ))),
        }
    }
}

impl StorageConfigInfo {
    /// The provider of the active variant.
    #[must_use]
    pub const fn storage_type(&self) -> StorageType {
        match self {
            Self::S3(_) => StorageType::S3,
            Self::Gcs(_) => StorageType::Gcs,
            Self::Azure(_) => StorageType::Azure,
            Self::File(_) => StorageType::File,
        }
    }

    /// Location prefixes of the active variant.
    #[must_use]
    pub fn allowed_locations(&self) -> Option<&[String]> {
        match self {
            Self::S3(config) => config.allowed_locations.as_deref(),
            Self::Gcs(config) => config.allowed_locations.as_deref(),
            Self::Azure(config) => config.allowed_locations.as_deref(),
            Self::File(config) => config.allowed_locations.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gcs_config_composes_base_and_specific_fields() {
        let text = r#"{
            "storageType": "GCS",
            "allowedLocations": ["gs://bucket/warehouse/"],
            "gcsServiceAccount": "svc@project.iam.gserviceaccount.com"
        }"#;

        let config = StorageConfigInfo::from_wire_str(text).expect("decode");
        assert_eq!(config.storage_type(), StorageType::Gcs);
        assert_eq!(
            config.allowed_locations(),
            Some(&["gs://bucket/warehouse/".to_string()][..])
        );
        match &config {
            StorageConfigInfo::Gcs(gcs) => assert_eq!(
                gcs.gcs_service_account.as_deref(),
                Some("svc@project.iam.gserviceaccount.com")
            ),
            other => panic!("expected GCS config, got {other:?}"),
        }

        let dict = config.to_wire_dict().expect("encode");
        assert_eq!(dict.get("storageType"), Some(&json!("GCS")));
        assert_eq!(
            dict.get("gcsServiceAccount"),
            Some(&json!("svc@project.iam.gserviceaccount.com"))
        );
    }

    #[test]
    fn test_aws_config_requires_role_arn() {
        let text = r#"{"storageType": "S3", "allowedLocations": ["s3://bucket/"]}"#;
        let err = StorageConfigInfo::from_wire_str(text).expect_err("missing roleArn");

        assert!(matches!(
            err,
            WireError::MissingRequiredField { field } if field == "role_arn"
        ));
    }

    #[test]
    fn test_unknown_storage_type() {
        let text = r#"{"storageType": "FTP"}"#;
        let err = StorageConfigInfo::from_wire_str(text).expect_err("unknown provider");

        assert!(matches!(
            err,
            WireError::UnknownDiscriminatorValue { alias, value }
                if alias == "storageType" && value == "FTP"
        ));
    }

    #[test]
    fn test_s3_roundtrip() {
        let config = StorageConfigInfo::S3(AwsStorageConfigInfo {
            allowed_locations: Some(vec!["s3://bucket/warehouse/".to_string()]),
            role_arn: "arn:aws:iam::123456789012:role/catalog".to_string(),
            external_id: Some("ext-1".to_string()),
            user_arn: None,
        });

        let text = config.to_wire_string().expect("encode");
        let parsed = StorageConfigInfo::from_wire_str(&text).expect("decode");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_file_config_minimal() {
        let config = StorageConfigInfo::File(FileStorageConfigInfo {
            allowed_locations: None,
        });

        let dict = config.to_wire_dict().expect("encode");
        assert_eq!(dict.len(), 1, "only storageType should be written");
        assert_eq!(dict.get("storageType"), Some(&json!("FILE")));
    }
}
