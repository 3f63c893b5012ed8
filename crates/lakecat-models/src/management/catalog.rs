//! Catalog entity models for the management API.

use super::storage_config::{storage_config_info_discriminator, StorageConfigInfo};
use lakecat_wire::{
    FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireFamily, WireModel, WireResult,
};
use serde_json::json;
use std::sync::{Arc, OnceLock};

/// Properties attached to a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProperties {
    /// Base location new tables default to.
    pub default_base_location: String,
}

fn catalog_properties_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("CatalogProperties")
            .field(FieldDescriptor::required(
                "default_base_location",
                "default-base-location",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("CatalogProperties schema is statically valid")
    })
}

impl WireModel for CatalogProperties {
    fn schema() -> &'static Arc<ModelSchema> {
        catalog_properties_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("default_base_location", self.default_base_location.as_str())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            default_base_location: record.require_str("default_base_location")?.to_string(),
        })
    }
}

/// A catalog managed by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Catalog kind, `INTERNAL` (default) or `EXTERNAL`.
    pub catalog_type: String,

    /// The catalog name.
    pub name: String,

    /// Catalog properties.
    pub properties: CatalogProperties,

    /// Where and how the catalog stores table data.
    pub storage_config_info: StorageConfigInfo,
}

fn catalog_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("Catalog")
            .field(
                FieldDescriptor::optional(
                    "catalog_type",
                    "type",
                    FieldKind::Scalar(ScalarKind::String),
                )
                .with_default(json!("INTERNAL")),
            )
            .field(FieldDescriptor::required(
                "name",
                "name",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "properties",
                "properties",
                FieldKind::Model(Arc::clone(catalog_properties_schema())),
            ))
            .field(FieldDescriptor::required(
                "storage_config_info",
                "storageConfigInfo",
                FieldKind::DiscriminatedModel(Arc::clone(storage_config_info_discriminator())),
            ))
            .build()
            .expect("Catalog schema is statically valid")
    })
}

impl WireModel for Catalog {
    fn schema() -> &'static Arc<ModelSchema> {
        catalog_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("catalog_type", self.catalog_type.as_str())
            .set_str("name", self.name.as_str())
            .set_record("properties", self.properties.to_record()?)
            .set_record(
                "storage_config_info",
                WireFamily::to_record(&self.storage_config_info)?,
            )
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            catalog_type: record.require_str("catalog_type")?.to_string(),
            name: record.require_str("name")?.to_string(),
            properties: CatalogProperties::from_record(record.require_record("properties")?)?,
            storage_config_info: StorageConfigInfo::from_record(
                record.require_record("storage_config_info")?.clone(),
            )?,
        })
    }
}

/// Request to create a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCatalogRequest {
    /// The catalog to create.
    pub catalog: Catalog,
}

fn create_catalog_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("CreateCatalogRequest")
            .field(FieldDescriptor::required(
                "catalog",
                "catalog",
                FieldKind::Model(Arc::clone(catalog_schema())),
            ))
            .build()
            .expect("CreateCatalogRequest schema is statically valid")
    })
}

impl WireModel for CreateCatalogRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        create_catalog_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_record("catalog", self.catalog.to_record()?)
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            catalog: Catalog::from_record(record.require_record("catalog")?)?,
        })
    }
}
