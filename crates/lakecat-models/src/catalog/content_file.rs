//! Content-file models: the discriminated family describing data and
//! delete files tracked by table snapshots.
//!
//! The `content` wire field selects the concrete variant; every variant
//! shares the base content-file fields and appends its own.

use lakecat_wire::{
    DiscriminatorMap, FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireError,
    WireFamily, WireModel, WireResult,
};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// File format of a content file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Apache Avro.
    Avro,
    /// Apache ORC.
    Orc,
    /// Apache Parquet.
    Parquet,
    /// Puffin statistics files.
    Puffin,
}

impl FileFormat {
    /// The wire value for this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avro => "avro",
            Self::Orc => "orc",
            Self::Parquet => "parquet",
            Self::Puffin => "puffin",
        }
    }

    /// Parses a wire value.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for values outside the enum.
    pub fn parse(value: &str) -> WireResult<Self> {
        match value {
            "avro" => Ok(Self::Avro),
            "orc" => Ok(Self::Orc),
            "parquet" => Ok(Self::Parquet),
            "puffin" => Ok(Self::Puffin),
            other => Err(WireError::type_mismatch(
                "file_format",
                "file format",
                other,
            )),
        }
    }
}

/// Base descriptors shared by every content-file variant.
fn content_file_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::required("content", "content", FieldKind::Scalar(ScalarKind::String)),
        FieldDescriptor::required(
            "file_path",
            "file-path",
            FieldKind::Scalar(ScalarKind::String),
        ),
        FieldDescriptor::required(
            "file_format",
            "file-format",
            FieldKind::Scalar(ScalarKind::String),
        ),
        FieldDescriptor::required("spec_id", "spec-id", FieldKind::Scalar(ScalarKind::Integer)),
        // Partition values are typed per partition spec; they pass
        // through as raw JSON, ordered by the spec's fields.
        FieldDescriptor::optional("partition", "partition", FieldKind::ScalarList(ScalarKind::Any)),
        FieldDescriptor::required(
            "file_size_in_bytes",
            "file-size-in-bytes",
            FieldKind::Scalar(ScalarKind::Integer),
        ),
        FieldDescriptor::required(
            "record_count",
            "record-count",
            FieldKind::Scalar(ScalarKind::Integer),
        ),
        FieldDescriptor::optional(
            "key_metadata",
            "key-metadata",
            FieldKind::Scalar(ScalarKind::String),
        ),
        FieldDescriptor::optional(
            "split_offsets",
            "split-offsets",
            FieldKind::ScalarList(ScalarKind::Integer),
        ),
        FieldDescriptor::optional(
            "sort_order_id",
            "sort-order-id",
            FieldKind::Scalar(ScalarKind::Integer),
        ),
    ]
}

/// A data file with row content.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFile {
    /// Location of the file.
    pub file_path: String,

    /// File format.
    pub file_format: FileFormat,

    /// Partition spec the file was written under.
    pub spec_id: i64,

    /// Partition field values, ordered by the spec's fields.
    pub partition: Option<Vec<Value>>,

    /// Total file size in bytes.
    pub file_size_in_bytes: i64,

    /// Number of records in the file.
    pub record_count: i64,

    /// Encryption key metadata blob.
    pub key_metadata: Option<String>,

    /// Splittable offsets within the file.
    pub split_offsets: Option<Vec<i64>>,

    /// Sort order the file was written with.
    pub sort_order_id: Option<i64>,

    /// Per-column byte sizes.
    pub column_sizes: Option<Value>,

    /// Per-column value counts.
    pub value_counts: Option<Value>,

    /// Per-column null counts.
    pub null_value_counts: Option<Value>,

    /// Per-column NaN counts.
    pub nan_value_counts: Option<Value>,
}

impl DataFile {
    /// Discriminator value for data files.
    pub const CONTENT: &'static str = "data";
}

fn data_file_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("DataFile")
            .fields(content_file_fields())
            .field(FieldDescriptor::optional(
                "column_sizes",
                "column-sizes",
                FieldKind::Scalar(ScalarKind::Any),
            ))
            .field(FieldDescriptor::optional(
                "value_counts",
                "value-counts",
                FieldKind::Scalar(ScalarKind::Any),
            ))
            .field(FieldDescriptor::optional(
                "null_value_counts",
                "null-value-counts",
                FieldKind::Scalar(ScalarKind::Any),
            ))
            .field(FieldDescriptor::optional(
                "nan_value_counts",
                "nan-value-counts",
                FieldKind::Scalar(ScalarKind::Any),
            ))
            .build()
            .expect("DataFile schema is statically valid")
    })
}

impl WireModel for DataFile {
    fn schema() -> &'static Arc<ModelSchema> {
        data_file_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("content", Self::CONTENT)
            .set_str("file_path", self.file_path.as_str())
            .set_str("file_format", self.file_format.as_str())
            .set_i64("spec_id", self.spec_id)
            .set_value_list_opt("partition", self.partition.as_deref())
            .set_i64("file_size_in_bytes", self.file_size_in_bytes)
            .set_i64("record_count", self.record_count)
            .set_str_opt("key_metadata", self.key_metadata.as_deref())
            .set_i64_list_opt("split_offsets", self.split_offsets.as_deref())
            .set_i64_opt("sort_order_id", self.sort_order_id)
            .set_value_opt("column_sizes", self.column_sizes.as_ref())
            .set_value_opt("value_counts", self.value_counts.as_ref())
            .set_value_opt("null_value_counts", self.null_value_counts.as_ref())
            .set_value_opt("nan_value_counts", self.nan_value_counts.as_ref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            file_path: record.require_str("file_path")?.to_string(),
            file_format: FileFormat::parse(record.require_str("file_format")?)?,
            spec_id: record.require_i64("spec_id")?,
            partition: record.value_list_opt("partition")?.map(<[Value]>::to_vec),
            file_size_in_bytes: record.require_i64("file_size_in_bytes")?,
            record_count: record.require_i64("record_count")?,
            key_metadata: record.str_opt("key_metadata")?.map(str::to_string),
            split_offsets: record.i64_list_opt("split_offsets")?,
            sort_order_id: record.i64_opt("sort_order_id")?,
            column_sizes: record.value_opt("column_sizes")?.cloned(),
            value_counts: record.value_opt("value_counts")?.cloned(),
            null_value_counts: record.value_opt("null_value_counts")?.cloned(),
            nan_value_counts: record.value_opt("nan_value_counts")?.cloned(),
        })
    }
}

/// A delete file holding file-position deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionDeleteFile {
    /// Location of the file.
    pub file_path: String,

    /// File format.
    pub file_format: FileFormat,

    /// Partition spec the file was written under.
    pub spec_id: i64,

    /// Partition field values, ordered by the spec's fields.
    pub partition: Option<Vec<Value>>,

    /// Total file size in bytes.
    pub file_size_in_bytes: i64,

    /// Number of records in the file.
    pub record_count: i64,

    /// Encryption key metadata blob.
    pub key_metadata: Option<String>,

    /// Splittable offsets within the file.
    pub split_offsets: Option<Vec<i64>>,

    /// Sort order the file was written with.
    pub sort_order_id: Option<i64>,

    /// Offset in the file where delete content starts.
    pub content_offset: Option<i64>,

    /// Length of delete content in bytes.
    pub content_size_in_bytes: Option<i64>,
}

impl PositionDeleteFile {
    /// Discriminator value for position-delete files.
    pub const CONTENT: &'static str = "position-deletes";
}

fn position_delete_file_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("PositionDeleteFile")
            .fields(content_file_fields())
            .field(FieldDescriptor::optional(
                "content_offset",
                "content-offset",
                FieldKind::Scalar(ScalarKind::Integer),
            ))
            .field(FieldDescriptor::optional(
                "content_size_in_bytes",
                "content-size-in-bytes",
                FieldKind::Scalar(ScalarKind::Integer),
            ))
            .build()
            .expect("PositionDeleteFile schema is statically valid")
    })
}

impl WireModel for PositionDeleteFile {
    fn schema() -> &'static Arc<ModelSchema> {
        position_delete_file_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("content", Self::CONTENT)
            .set_str("file_path", self.file_path.as_str())
            .set_str("file_format", self.file_format.as_str())
            .set_i64("spec_id", self.spec_id)
            .set_value_list_opt("partition", self.partition.as_deref())
            .set_i64("file_size_in_bytes", self.file_size_in_bytes)
            .set_i64("record_count", self.record_count)
            .set_str_opt("key_metadata", self.key_metadata.as_deref())
            .set_i64_list_opt("split_offsets", self.split_offsets.as_deref())
            .set_i64_opt("sort_order_id", self.sort_order_id)
            .set_i64_opt("content_offset", self.content_offset)
            .set_i64_opt("content_size_in_bytes", self.content_size_in_bytes)
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            file_path: record.require_str("file_path")?.to_string(),
            file_format: FileFormat::parse(record.require_str("file_format")?)?,
            spec_id: record.require_i64("spec_id")?,
            partition: record.value_list_opt("partition")?.map(<[Value]>::to_vec),
            file_size_in_bytes: record.require_i64("file_size_in_bytes")?,
            record_count: record.require_i64("record_count")?,
            key_metadata: record.str_opt("key_metadata")?.map(str::to_string),
            split_offsets: record.i64_list_opt("split_offsets")?,
            sort_order_id: record.i64_opt("sort_order_id")?,
            content_offset: record.i64_opt("content_offset")?,
            content_size_in_bytes: record.i64_opt("content_size_in_bytes")?,
        })
    }
}

/// A delete file holding equality deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityDeleteFile {
    /// Location of the file.
    pub file_path: String,

    /// File format.
    pub file_format: FileFormat,

    /// Partition spec the file was written under.
    pub spec_id: i64,

    /// Partition field values, ordered by the spec's fields.
    pub partition: Option<Vec<Value>>,

    /// Total file size in bytes.
    pub file_size_in_bytes: i64,

    /// Number of records in the file.
    pub record_count: i64,

    /// Encryption key metadata blob.
    pub key_metadata: Option<String>,

    /// Splittable offsets within the file.
    pub split_offsets: Option<Vec<i64>>,

    /// Sort order the file was written with.
    pub sort_order_id: Option<i64>,

    /// Field IDs the equality predicate applies to.
    pub equality_ids: Option<Vec<i64>>,
}

impl EqualityDeleteFile {
    /// Discriminator value for equality-delete files.
    pub const CONTENT: &'static str = "equality-deletes";
}

fn equality_delete_file_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("EqualityDeleteFile")
            .fields(content_file_fields())
            .field(FieldDescriptor::optional(
                "equality_ids",
                "equality-ids",
                FieldKind::ScalarList(ScalarKind::Integer),
            ))
            .build()
            .expect("EqualityDeleteFile schema is statically valid")
    })
}

impl WireModel for EqualityDeleteFile {
    fn schema() -> &'static Arc<ModelSchema> {
        equality_delete_file_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("content", Self::CONTENT)
            .set_str("file_path", self.file_path.as_str())
            .set_str("file_format", self.file_format.as_str())
            .set_i64("spec_id", self.spec_id)
            .set_value_list_opt("partition", self.partition.as_deref())
            .set_i64("file_size_in_bytes", self.file_size_in_bytes)
            .set_i64("record_count", self.record_count)
            .set_str_opt("key_metadata", self.key_metadata.as_deref())
            .set_i64_list_opt("split_offsets", self.split_offsets.as_deref())
            .set_i64_opt("sort_order_id", self.sort_order_id)
            .set_i64_list_opt("equality_ids", self.equality_ids.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            file_path: record.require_str("file_path")?.to_string(),
            file_format: FileFormat::parse(record.require_str("file_format")?)?,
            spec_id: record.require_i64("spec_id")?,
            partition: record.value_list_opt("partition")?.map(<[Value]>::to_vec),
            file_size_in_bytes: record.require_i64("file_size_in_bytes")?,
            record_count: record.require_i64("record_count")?,
            key_metadata: record.str_opt("key_metadata")?.map(str::to_string),
            split_offsets: record.i64_list_opt("split_offsets")?,
            sort_order_id: record.i64_opt("sort_order_id")?,
            equality_ids: record.i64_list_opt("equality_ids")?,
        })
    }
}

/// A content file of any kind, selected by the `content` wire field.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentFile {
    /// Row data (`content = "data"`).
    Data(DataFile),
    /// Position deletes (`content = "position-deletes"`).
    PositionDeletes(PositionDeleteFile),
    /// Equality deletes (`content = "equality-deletes"`).
    EqualityDeletes(EqualityDeleteFile),
}

fn content_file_discriminator() -> &'static Arc<DiscriminatorMap> {
    static MAP: OnceLock<Arc<DiscriminatorMap>> = OnceLock::new();
    MAP.get_or_init(|| {
        DiscriminatorMap::builder("content")
            .variant(DataFile::CONTENT, data_file_schema())
            .variant(PositionDeleteFile::CONTENT, position_delete_file_schema())
            .variant(EqualityDeleteFile::CONTENT, equality_delete_file_schema())
            .build()
            .expect("ContentFile discriminator map is statically valid")
    })
}

impl WireFamily for ContentFile {
    fn discriminator() -> &'static Arc<DiscriminatorMap> {
        content_file_discriminator()
    }

    fn to_record(&self) -> WireResult<Record> {
        match self {
            Self::Data(file) => file.to_record(),
            Self::PositionDeletes(file) => file.to_record(),
            Self::EqualityDeletes(file) => file.to_record(),
        }
    }

    fn from_record(record: Record) -> WireResult<Self> {
        match record.schema().name() {
            "DataFile" => Ok(Self::Data(DataFile::from_record(&record)?)),
            "PositionDeleteFile" => Ok(Self::PositionDeletes(PositionDeleteFile::from_record(
                &record,
            )?)),
            "EqualityDeleteFile" => Ok(Self::EqualityDeletes(EqualityDeleteFile::from_record(
                &record,
            )?)),
            other => Err(WireError::invalid_schema(format!(
                "{other} is not a content-file schema"
            ))),
        }
    }
}

impl ContentFile {
    /// Location of the underlying file.
    #[must_use]
    pub fn file_path(&self) -> &str {
        match self {
            Self::Data(file) => &file.file_path,
            Self::PositionDeletes(file) => &file.file_path,
            Self::EqualityDeletes(file) => &file.file_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_data_file() -> DataFile {
        DataFile {
            file_path: "s3://bucket/data/00000-0.parquet".to_string(),
            file_format: FileFormat::Parquet,
            spec_id: 0,
            partition: None,
            file_size_in_bytes: 1024,
            record_count: 100,
            key_metadata: None,
            split_offsets: Some(vec![4, 512]),
            sort_order_id: Some(1),
            column_sizes: None,
            value_counts: None,
            null_value_counts: None,
            nan_value_counts: None,
        }
    }

    #[test]
    fn test_data_file_roundtrip() {
        let file = sample_data_file();
        let dict = file.to_wire_dict().expect("encode");
        let parsed = DataFile::from_wire_dict(&dict).expect("decode");
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_data_file_uses_wire_aliases() {
        let dict = sample_data_file().to_wire_dict().expect("encode");
        assert_eq!(dict.get("content"), Some(&json!("data")));
        assert_eq!(dict.get("file-format"), Some(&json!("parquet")));
        assert_eq!(dict.get("file-size-in-bytes"), Some(&json!(1024)));
        assert!(!dict.contains_key("file_size_in_bytes"));
    }

    #[test]
    fn test_absent_optionals_are_omitted_not_null() {
        let dict = sample_data_file().to_wire_dict().expect("encode");
        assert!(!dict.contains_key("partition"));
        assert!(!dict.contains_key("key-metadata"));
        assert!(!dict.contains_key("column-sizes"));
    }

    #[test]
    fn test_family_dispatch_data() {
        let text = r#"{
            "content": "data",
            "file-path": "s3://b/d.parquet",
            "file-format": "parquet",
            "spec-id": 2,
            "file-size-in-bytes": 9,
            "record-count": 3
        }"#;

        let file = ContentFile::from_wire_str(text).expect("decode");
        match file {
            ContentFile::Data(data) => {
                assert_eq!(data.spec_id, 2);
                assert_eq!(data.file_format, FileFormat::Parquet);
            }
            other => panic!("expected data file, got {other:?}"),
        }
    }

    #[test]
    fn test_family_dispatch_equality_deletes() {
        let text = r#"{
            "content": "equality-deletes",
            "file-path": "s3://b/e.parquet",
            "file-format": "parquet",
            "spec-id": 0,
            "file-size-in-bytes": 9,
            "record-count": 3,
            "equality-ids": [1, 2]
        }"#;

        let file = ContentFile::from_wire_str(text).expect("decode");
        match file {
            ContentFile::EqualityDeletes(deletes) => {
                assert_eq!(deletes.equality_ids, Some(vec![1, 2]));
            }
            other => panic!("expected equality deletes, got {other:?}"),
        }
    }

    #[test]
    fn test_null_partition_values_pass_through() {
        let text = r#"{
            "content": "data",
            "file-path": "s3://b/d.parquet",
            "file-format": "parquet",
            "spec-id": 0,
            "partition": ["2024-01-01", null],
            "file-size-in-bytes": 9,
            "record-count": 3
        }"#;

        let file = ContentFile::from_wire_str(text).expect("decode");
        let ContentFile::Data(data) = &file else {
            panic!("expected data file, got {file:?}");
        };
        assert_eq!(
            data.partition,
            Some(vec![json!("2024-01-01"), Value::Null])
        );

        let dict = file.to_wire_dict().expect("encode");
        assert_eq!(dict.get("partition"), Some(&json!(["2024-01-01", null])));
    }

    #[test]
    fn test_family_unknown_content_kind() {
        let text = r#"{"content": "unknown-kind", "file-path": "p"}"#;
        let err = ContentFile::from_wire_str(text).expect_err("unknown kind should fail");

        assert!(matches!(
            err,
            WireError::UnknownDiscriminatorValue { value, .. } if value == "unknown-kind"
        ));
    }

    #[test]
    fn test_family_missing_content_key() {
        let text = r#"{"file-path": "p"}"#;
        let err = ContentFile::from_wire_str(text).expect_err("missing content should fail");

        assert!(matches!(
            err,
            WireError::MissingDiscriminator { alias } if alias == "content"
        ));
    }

    #[test]
    fn test_family_roundtrip_through_string() {
        let file = ContentFile::PositionDeletes(PositionDeleteFile {
            file_path: "s3://b/pd.parquet".to_string(),
            file_format: FileFormat::Parquet,
            spec_id: 1,
            partition: Some(vec![json!("2025-01-15")]),
            file_size_in_bytes: 2048,
            record_count: 7,
            key_metadata: None,
            split_offsets: None,
            sort_order_id: None,
            content_offset: Some(4),
            content_size_in_bytes: Some(2000),
        });

        let text = file.to_wire_string().expect("encode");
        let parsed = ContentFile::from_wire_str(&text).expect("decode");
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_unknown_file_format_rejected() {
        let text = r#"{
            "content": "data",
            "file-path": "s3://b/d.csv",
            "file-format": "csv",
            "spec-id": 0,
            "file-size-in-bytes": 9,
            "record-count": 3
        }"#;

        let err = ContentFile::from_wire_str(text).expect_err("csv should be rejected");
        assert!(matches!(
            err,
            WireError::TypeMismatch { field, .. } if field == "file_format"
        ));
    }
}
