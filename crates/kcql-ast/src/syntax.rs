//! Syntax tree produced by the grammar
//!
//! The tree keeps every value as the raw text the operator wrote. Numeric
//! and enum resolution happen later, when the tree is folded into a
//! [`Query`](crate::Query).

use serde::{Deserialize, Serialize};

use crate::{Span, Spanned, WriteMode};

/// One KCQL statement as written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// `INSERT | UPSERT | UPDATE`, absent for the select-only form
    pub verb: Option<Spanned<WriteMode>>,
    pub target: Option<Spanned<String>>,
    pub columns: Vec<ColumnRef>,
    pub source: Spanned<String>,
    pub clauses: Vec<Spanned<Clause>>,
    pub span: Span,
}

/// A column reference: `a`, `a.b.c`, `*`, `_key.*`, `a.b AS c`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Path segments in source order; a wildcard segment is `*`
    pub segments: Vec<String>,
    /// The path ended with a `.` and no segment after it
    pub dangling: bool,
    pub alias: Option<String>,
    pub span: Span,
}

/// A field name outside the select list: a partition or bucket field, or a
/// timestamp field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRef {
    pub name: Spanned<String>,
    /// The name ended with a `.` and no segment after it
    pub dangling: bool,
}

/// One tag definition inside `WITHTAG (...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDef {
    pub key: Spanned<String>,
    /// Text between the key and the value: `=`, `as`, or anything else
    pub marker: Option<Spanned<String>>,
    pub value: Option<Spanned<String>>,
    pub span: Span,
}

/// A `name = value` pair inside `STOREAS t (...)` or `PROPERTIES (...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: Spanned<String>,
    pub value: Spanned<String>,
}

/// An optional clause following `FROM <source>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    PrimaryKey(Vec<ColumnRef>),
    Ignore(Vec<ColumnRef>),
    AutoCreate,
    AutoEvolve,
    Batch(Spanned<String>),
    Limit(Spanned<String>),
    PartitionBy(Vec<PathRef>),
    /// `DISTRIBUTEBY` / `CLUSTERBY` with an optional `INTO n BUCKETS`
    Bucketing {
        names: Vec<PathRef>,
        count: Option<Spanned<String>>,
    },
    StoreAs {
        type_name: Spanned<String>,
        parameters: Vec<Assignment>,
    },
    Format(Spanned<String>),
    /// Field path, or a function call such as `sys_time()`
    Timestamp {
        value: PathRef,
        call: bool,
    },
    TimestampUnit(Spanned<String>),
    Tags(Vec<TagDef>),
    WithKeys(Vec<Spanned<String>>),
    KeyDelimiter(Spanned<String>),
    WithType(Spanned<String>),
    Converter(Spanned<String>),
    JmsSelector(Spanned<String>),
    Regex(Spanned<String>),
    Target(Spanned<String>),
    Pipeline(Spanned<String>),
    Partitioner(Spanned<String>),
    Subscription(Spanned<String>),
    Compression(Spanned<String>),
    Delay(Spanned<String>),
    FlushInterval(Spanned<String>),
    FlushSize(Spanned<String>),
    FlushCount(Spanned<String>),
    TableLocation(Spanned<String>),
    SchemaEvolution(Spanned<String>),
    Overwrite,
    Partitioning(Spanned<String>),
    Ttl(Spanned<String>),
    Session(Spanned<String>),
    Ack,
    EncodeBase64,
    LockTime(Spanned<String>),
    Capitalize,
    WithStructure,
    Unwrap,
    Initialize,
    ProjectTo(Spanned<String>),
    DocType(Spanned<String>),
    IndexSuffix(Spanned<String>),
    IncrementalMode(Spanned<String>),
    Properties(Vec<Assignment>),
}

impl Clause {
    /// The keyword that introduces the clause
    pub fn keyword(&self) -> &'static str {
        match self {
            Clause::PrimaryKey(_) => "PK",
            Clause::Ignore(_) => "IGNORE",
            Clause::AutoCreate => "AUTOCREATE",
            Clause::AutoEvolve => "AUTOEVOLVE",
            Clause::Batch(_) => "BATCH",
            Clause::Limit(_) => "LIMIT",
            Clause::PartitionBy(_) => "PARTITIONBY",
            Clause::Bucketing { .. } => "CLUSTERBY",
            Clause::StoreAs { .. } => "STOREAS",
            Clause::Format(_) => "WITHFORMAT",
            Clause::Timestamp { .. } => "WITHTIMESTAMP",
            Clause::TimestampUnit(_) => "TIMESTAMPUNIT",
            Clause::Tags(_) => "WITHTAG",
            Clause::WithKeys(_) => "WITHKEY",
            Clause::KeyDelimiter(_) => "KEYDELIMITER",
            Clause::WithType(_) => "WITHTYPE",
            Clause::Converter(_) => "WITHCONVERTER",
            Clause::JmsSelector(_) => "WITHJMSSELECTOR",
            Clause::Regex(_) => "WITHREGEX",
            Clause::Target(_) => "WITHTARGET",
            Clause::Pipeline(_) => "WITHPIPELINE",
            Clause::Partitioner(_) => "WITHPARTITIONER",
            Clause::Subscription(_) => "WITHSUBSCRIPTION",
            Clause::Compression(_) => "WITHCOMPRESSION",
            Clause::Delay(_) => "WITHDELAY",
            Clause::FlushInterval(_) => "WITH_FLUSH_INTERVAL",
            Clause::FlushSize(_) => "WITH_FLUSH_SIZE",
            Clause::FlushCount(_) => "WITH_FLUSH_COUNT",
            Clause::TableLocation(_) => "WITH_TABLE_LOCATION",
            Clause::SchemaEvolution(_) => "WITH_SCHEMA_EVOLUTION",
            Clause::Overwrite => "WITH_OVERWRITE",
            Clause::Partitioning(_) => "WITH_PARTITIONING",
            Clause::Ttl(_) => "TTL",
            Clause::Session(_) => "WITH_SESSION",
            Clause::Ack => "WITH_ACK",
            Clause::EncodeBase64 => "WITH_ENCODE_BASE64",
            Clause::LockTime(_) => "WITH_LOCK_TIME",
            Clause::Capitalize => "CAPITALIZE",
            Clause::WithStructure => "WITH_STRUCTURE",
            Clause::Unwrap => "WITHUNWRAP",
            Clause::Initialize => "INITIALIZE",
            Clause::ProjectTo(_) => "PROJECTTO",
            Clause::DocType(_) => "WITHDOCTYPE",
            Clause::IndexSuffix(_) => "WITHINDEXSUFFIX",
            Clause::IncrementalMode(_) => "INCREMENTALMODE",
            Clause::Properties(_) => "PROPERTIES",
        }
    }
}
