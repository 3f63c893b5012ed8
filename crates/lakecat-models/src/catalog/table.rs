//! Table request and response models.

use lakecat_wire::{
    FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireModel, WireResult,
};
use std::sync::{Arc, OnceLock};

/// Table identifier: a multi-level namespace plus a table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    /// The namespace containing the table.
    pub namespace: Vec<String>,

    /// The table name.
    pub name: String,
}

impl TableIdentifier {
    /// Creates a table identifier.
    #[must_use]
    pub fn new(namespace: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// Creates a table identifier for a single-level namespace.
    #[must_use]
    pub fn simple(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: vec![namespace.into()],
            name: name.into(),
        }
    }
}

fn table_identifier_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("TableIdentifier")
            .field(FieldDescriptor::required(
                "namespace",
                "namespace",
                FieldKind::ScalarList(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "name",
                "name",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("TableIdentifier schema is statically valid")
    })
}

impl WireModel for TableIdentifier {
    fn schema() -> &'static Arc<ModelSchema> {
        table_identifier_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str_list("namespace", &self.namespace)
            .set_str("name", self.name.as_str())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            namespace: record.require_str_list("namespace")?,
            name: record.require_str("name")?.to_string(),
        })
    }
}

/// Response listing the tables of a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTablesResponse {
    /// Table identifiers, in listing order.
    pub identifiers: Vec<TableIdentifier>,

    /// Token for fetching the next page of results.
    pub next_page_token: Option<String>,
}

fn list_tables_response_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("ListTablesResponse")
            .field(FieldDescriptor::required(
                "identifiers",
                "identifiers",
                FieldKind::ModelList(Arc::clone(table_identifier_schema())),
            ))
            .field(FieldDescriptor::optional(
                "next_page_token",
                "next-page-token",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("ListTablesResponse schema is statically valid")
    })
}

impl WireModel for ListTablesResponse {
    fn schema() -> &'static Arc<ModelSchema> {
        list_tables_response_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        let identifiers = self
            .identifiers
            .iter()
            .map(WireModel::to_record)
            .collect::<WireResult<Vec<_>>>()?;
        Record::builder(Self::schema())
            .set_records("identifiers", identifiers)
            .set_str_opt("next_page_token", self.next_page_token.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            identifiers: record
                .require_records("identifiers")?
                .iter()
                .map(TableIdentifier::from_record)
                .collect::<WireResult<Vec<_>>>()?,
            next_page_token: record.str_opt("next_page_token")?.map(str::to_string),
        })
    }
}

/// Request to rename a table within the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameTableRequest {
    /// The table to rename.
    pub source: TableIdentifier,

    /// The new identifier.
    pub destination: TableIdentifier,
}

fn rename_table_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("RenameTableRequest")
            .field(FieldDescriptor::required(
                "source",
                "source",
                FieldKind::Model(Arc::clone(table_identifier_schema())),
            ))
            .field(FieldDescriptor::required(
                "destination",
                "destination",
                FieldKind::Model(Arc::clone(table_identifier_schema())),
            ))
            .build()
            .expect("RenameTableRequest schema is statically valid")
    })
}

impl WireModel for RenameTableRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        rename_table_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_record("source", self.source.to_record()?)
            .set_record("destination", self.destination.to_record()?)
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            source: TableIdentifier::from_record(record.require_record("source")?)?,
            destination: TableIdentifier::from_record(record.require_record("destination")?)?,
        })
    }
}

/// Request to register an existing table by its metadata location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterTableRequest {
    /// The table name to register under.
    pub name: String,

    /// Location of the table's current metadata file.
    pub metadata_location: String,
}

fn register_table_request_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("RegisterTableRequest")
            .field(FieldDescriptor::required(
                "name",
                "name",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "metadata_location",
                "metadata-location",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("RegisterTableRequest schema is statically valid")
    })
}

impl WireModel for RegisterTableRequest {
    fn schema() -> &'static Arc<ModelSchema> {
        register_table_request_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("name", self.name.as_str())
            .set_str("metadata_location", self.metadata_location.as_str())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            name: record.require_str("name")?.to_string(),
            metadata_location: record.require_str("metadata_location")?.to_string(),
        })
    }
}
