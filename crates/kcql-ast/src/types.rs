//! Closed vocabularies used by KCQL clauses
//!
//! Every enum resolves from text case-insensitively. A failed lookup reports
//! the full list of legal values so an operator can fix the statement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A lookup into one of the vocabularies failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {vocabulary} '{value}'. Valid values are: {}", .valid.join(", "))]
pub struct UnknownValue {
    pub vocabulary: &'static str,
    pub value: String,
    pub valid: Vec<&'static str>,
}

/// A fixed set of keywords with a canonical spelling
pub trait Vocabulary: Sized + Copy + 'static {
    /// Name used in error messages
    const NAME: &'static str;
    /// Every member in declaration order
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn lookup(text: &str) -> Result<Self, UnknownValue> {
        let text = text.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(text))
            .ok_or_else(|| UnknownValue {
                vocabulary: Self::NAME,
                value: text.to_string(),
                valid: Self::ALL.iter().map(|v| v.as_str()).collect(),
            })
    }
}

/// How records are written to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteMode {
    Insert,
    Upsert,
    Update,
}

impl Vocabulary for WriteMode {
    const NAME: &'static str = "write mode";
    const ALL: &'static [Self] = &[WriteMode::Insert, WriteMode::Upsert, WriteMode::Update];

    fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Insert => "INSERT",
            WriteMode::Upsert => "UPSERT",
            WriteMode::Update => "UPDATE",
        }
    }
}

/// Payload format declared with `WITHFORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatType {
    Avro,
    Json,
    Map,
    Object,
    Protobuf,
}

impl Vocabulary for FormatType {
    const NAME: &'static str = "FORMAT";
    const ALL: &'static [Self] = &[
        FormatType::Avro,
        FormatType::Json,
        FormatType::Map,
        FormatType::Object,
        FormatType::Protobuf,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            FormatType::Avro => "AVRO",
            FormatType::Json => "JSON",
            FormatType::Map => "MAP",
            FormatType::Object => "OBJECT",
            FormatType::Protobuf => "PROTOBUF",
        }
    }
}

/// Compression declared with `WITHCOMPRESSION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressionType {
    None,
    Lz4,
    Zlib,
    Zstd,
    Snappy,
}

impl Vocabulary for CompressionType {
    const NAME: &'static str = "WITHCOMPRESSION";
    const ALL: &'static [Self] = &[
        CompressionType::None,
        CompressionType::Lz4,
        CompressionType::Zlib,
        CompressionType::Zstd,
        CompressionType::Snappy,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            CompressionType::None => "NONE",
            CompressionType::Lz4 => "LZ4",
            CompressionType::Zlib => "ZLIB",
            CompressionType::Zstd => "ZSTD",
            CompressionType::Snappy => "SNAPPY",
        }
    }
}

/// Behaviour when the incoming schema differs from the table schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaEvolution {
    Add,
    Match,
}

impl Vocabulary for SchemaEvolution {
    const NAME: &'static str = "WITH_SCHEMA_EVOLUTION";
    const ALL: &'static [Self] = &[SchemaEvolution::Add, SchemaEvolution::Match];

    fn as_str(&self) -> &'static str {
        match self {
            SchemaEvolution::Add => "ADD",
            SchemaEvolution::Match => "MATCH",
        }
    }
}

/// Partition layout declared with `WITH_PARTITIONING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitioningStrategy {
    Static,
    Dynamic,
}

impl Vocabulary for PartitioningStrategy {
    const NAME: &'static str = "WITH_PARTITIONING";
    const ALL: &'static [Self] = &[PartitioningStrategy::Static, PartitioningStrategy::Dynamic];

    fn as_str(&self) -> &'static str {
        match self {
            PartitioningStrategy::Static => "STATIC",
            PartitioningStrategy::Dynamic => "DYNAMIC",
        }
    }
}

/// Unit of the timestamp field declared with `TIMESTAMPUNIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl Vocabulary for TimeUnit {
    const NAME: &'static str = "TIMESTAMPUNIT";
    const ALL: &'static [Self] = &[
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "NANOSECONDS",
            TimeUnit::Microseconds => "MICROSECONDS",
            TimeUnit::Milliseconds => "MILLISECONDS",
            TimeUnit::Seconds => "SECONDS",
            TimeUnit::Minutes => "MINUTES",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Days => "DAYS",
        }
    }
}

macro_rules! impl_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = UnknownValue;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Vocabulary>::lookup(s)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_text!(
    WriteMode,
    FormatType,
    CompressionType,
    SchemaEvolution,
    PartitioningStrategy,
    TimeUnit,
);
