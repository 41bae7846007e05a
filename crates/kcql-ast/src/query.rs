//! The semantic model produced by a successful parse

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    CompressionType, FormatType, PartitioningStrategy, SchemaEvolution, TimeUnit, WriteMode,
};

/// Reserved leading path segment routing a column to the record key
pub const KEY_MARKER: &str = "_key";
/// Reserved leading path segment routing a column to the record headers
pub const HEADER_MARKER: &str = "_header";
/// Surface spelling of the "current system time" timestamp
pub const SYSTEM_TIME: &str = "sys_time()";

/// Which part of the record a field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Value,
    Key,
    Header,
}

/// A possibly nested, possibly aliased field reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Output name; equals `name` unless `AS` was used
    pub alias: String,
    pub field_type: FieldType,
    /// Enclosing path segments, outermost first
    pub parents: Vec<String>,
}

impl Field {
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<String>, parents: Vec<String>) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            field_type: FieldType::Value,
            parents,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == Self::WILDCARD
    }

    /// Same name, type and parent path; the alias does not participate
    pub fn is_duplicate_of(&self, other: &Field) -> bool {
        self.name == other.name
            && self.field_type == other.field_type
            && self.parents == other.parents
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for parent in &self.parents {
            write!(f, "{}.", parent)?;
        }
        f.write_str(&self.name)
    }
}

/// How a tag's value is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    /// `key`: the value is read from the record field named `key`
    Default,
    /// `key = value`
    Constant,
    /// `path AS name`
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: Option<String>,
    pub tag_type: TagType,
}

/// `CLUSTERBY a, b INTO n BUCKETS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucketing {
    pub bucket_names: Vec<String>,
    pub bucket_count: u32,
}

/// Source of the record timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timestamp {
    /// Dotted path of a record field
    Field(String),
    /// `sys_time()`
    SystemTime,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Field(path) => f.write_str(path),
            Timestamp::SystemTime => f.write_str(SYSTEM_TIME),
        }
    }
}

/// A fully parsed and validated KCQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The text this query was parsed from
    pub statement: String,
    pub source: String,
    /// Absent for the select-only form used by source connectors
    pub target: Option<String>,
    pub write_mode: Option<WriteMode>,

    pub fields: Vec<Field>,
    pub key_fields: Vec<Field>,
    pub header_fields: Vec<Field>,
    pub ignored_fields: Vec<Field>,
    pub primary_keys: Vec<Field>,
    pub partition_by: Vec<String>,
    pub bucketing: Option<Bucketing>,
    /// `None` unless a non-empty tag clause was given
    pub tags: Option<Vec<Tag>>,

    pub timestamp: Option<Timestamp>,
    pub timestamp_unit: TimeUnit,
    pub format_type: Option<FormatType>,
    pub stored_as: Option<String>,
    pub stored_as_parameters: BTreeMap<String, String>,

    pub limit: Option<u32>,
    pub batch_size: Option<u32>,
    pub ttl: Option<u64>,
    pub flush_interval: Option<u64>,
    pub flush_size: Option<u64>,
    pub flush_count: Option<u64>,

    pub auto_create: bool,
    pub auto_evolve: bool,
    pub capitalize: bool,
    pub retain_structure: bool,
    pub unwrapping: bool,
    pub initialize: bool,
    pub with_overwrite: bool,
    pub with_ack: bool,
    pub with_encode_base64: bool,

    pub with_type: Option<String>,
    pub with_converter: Option<String>,
    pub with_jms_selector: Option<String>,
    pub with_regex: Option<String>,
    pub with_compression: Option<CompressionType>,
    pub with_partitioner: Option<String>,
    pub with_subscription: Option<String>,
    pub with_delay: Option<u32>,
    pub with_session: Option<String>,
    pub with_lock_time: Option<u32>,
    pub dynamic_target: Option<String>,
    pub pipeline: Option<String>,
    pub with_table_location: Option<String>,
    pub with_schema_evolution: Option<SchemaEvolution>,
    pub with_partitioning: Option<PartitioningStrategy>,
    pub with_keys: Option<Vec<String>>,
    pub key_delimiter: String,
    pub project_to: Option<u32>,
    pub doc_type: Option<String>,
    pub index_suffix: Option<String>,
    pub incremental_mode: Option<String>,

    pub properties: BTreeMap<String, String>,
}

impl Query {
    pub const DEFAULT_KEY_DELIMITER: &'static str = ".";

    /// True when the SELECT list contains a top-level `*`
    pub fn selects_all(&self) -> bool {
        self.fields.iter().any(|f| f.is_wildcard() && !f.has_parents())
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn stored_as_parameter(&self, name: &str) -> Option<&str> {
        self.stored_as_parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            statement: String::new(),
            source: String::new(),
            target: None,
            write_mode: None,
            fields: Vec::new(),
            key_fields: Vec::new(),
            header_fields: Vec::new(),
            ignored_fields: Vec::new(),
            primary_keys: Vec::new(),
            partition_by: Vec::new(),
            bucketing: None,
            tags: None,
            timestamp: None,
            timestamp_unit: TimeUnit::default(),
            format_type: None,
            stored_as: None,
            stored_as_parameters: BTreeMap::new(),
            limit: None,
            batch_size: None,
            ttl: None,
            flush_interval: None,
            flush_size: None,
            flush_count: None,
            auto_create: false,
            auto_evolve: false,
            capitalize: false,
            retain_structure: false,
            unwrapping: false,
            initialize: false,
            with_overwrite: false,
            with_ack: false,
            with_encode_base64: false,
            with_type: None,
            with_converter: None,
            with_jms_selector: None,
            with_regex: None,
            with_compression: None,
            with_partitioner: None,
            with_subscription: None,
            with_delay: None,
            with_session: None,
            with_lock_time: None,
            dynamic_target: None,
            pipeline: None,
            with_table_location: None,
            with_schema_evolution: None,
            with_partitioning: None,
            with_keys: None,
            key_delimiter: Self::DEFAULT_KEY_DELIMITER.to_string(),
            project_to: None,
            doc_type: None,
            index_suffix: None,
            incremental_mode: None,
            properties: BTreeMap::new(),
        }
    }
}
