//! Token definitions for KCQL

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]  // Skip whitespace
pub enum TokenKind {
    // === Statement skeleton ===
    #[token("insert", ignore(ascii_case))]
    Insert,
    #[token("upsert", ignore(ascii_case))]
    Upsert,
    #[token("update", ignore(ascii_case))]
    Update,
    #[token("into", ignore(ascii_case))]
    Into,
    #[token("select", ignore(ascii_case))]
    Select,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("as", ignore(ascii_case))]
    As,

    // === Field clauses ===
    #[token("pk", ignore(ascii_case))]
    Pk,
    #[token("ignore", ignore(ascii_case))]
    Ignore,
    #[token("partitionby", ignore(ascii_case))]
    PartitionBy,
    #[token("distributeby", ignore(ascii_case))]
    DistributeBy,
    #[token("clusterby", ignore(ascii_case))]
    ClusterBy,
    #[token("buckets", ignore(ascii_case))]
    Buckets,
    #[token("withkey", ignore(ascii_case))]
    WithKey,
    #[token("keydelimiter", ignore(ascii_case))]
    KeyDelimiter,
    #[token("withtag", ignore(ascii_case))]
    WithTag,
    #[token("withtags", ignore(ascii_case))]
    WithTags,

    // === Flags ===
    #[token("autocreate", ignore(ascii_case))]
    AutoCreate,
    #[token("autoevolve", ignore(ascii_case))]
    AutoEvolve,
    #[token("capitalize", ignore(ascii_case))]
    Capitalize,
    #[token("initialize", ignore(ascii_case))]
    Initialize,
    #[token("with_structure", ignore(ascii_case))]
    WithStructure,
    #[token("withunwrap", ignore(ascii_case))]
    WithUnwrap,
    #[token("with_overwrite", ignore(ascii_case))]
    WithOverwrite,
    #[token("with_ack", ignore(ascii_case))]
    WithAck,
    #[token("with_encode_base64", ignore(ascii_case))]
    WithEncodeBase64,

    // === Numeric options ===
    #[token("batch", ignore(ascii_case))]
    Batch,
    #[token("limit", ignore(ascii_case))]
    Limit,
    #[token("ttl", ignore(ascii_case))]
    Ttl,
    #[token("projectto", ignore(ascii_case))]
    ProjectTo,
    #[token("withdelay", ignore(ascii_case))]
    WithDelay,
    #[token("with_lock_time", ignore(ascii_case))]
    WithLockTime,
    #[token("with_flush_interval", ignore(ascii_case))]
    WithFlushInterval,
    #[token("with_flush_size", ignore(ascii_case))]
    WithFlushSize,
    #[token("with_flush_count", ignore(ascii_case))]
    WithFlushCount,

    // === Storage, format and timing ===
    #[token("storeas", ignore(ascii_case))]
    StoreAs,
    #[token("withformat", ignore(ascii_case))]
    WithFormat,
    #[token("withtimestamp", ignore(ascii_case))]
    WithTimestamp,
    #[token("timestampunit", ignore(ascii_case))]
    TimestampUnit,
    #[token("withcompression", ignore(ascii_case))]
    WithCompression,
    #[token("with_schema_evolution", ignore(ascii_case))]
    WithSchemaEvolution,
    #[token("with_partitioning", ignore(ascii_case))]
    WithPartitioning,
    #[token("with_table_location", ignore(ascii_case))]
    WithTableLocation,

    // === Free-form options ===
    #[token("withtype", ignore(ascii_case))]
    WithType,
    #[token("withconverter", ignore(ascii_case))]
    WithConverter,
    #[token("withjmsselector", ignore(ascii_case))]
    WithJmsSelector,
    #[token("withregex", ignore(ascii_case))]
    WithRegex,
    #[token("withtarget", ignore(ascii_case))]
    WithTarget,
    #[token("withpipeline", ignore(ascii_case))]
    WithPipeline,
    #[token("withpartitioner", ignore(ascii_case))]
    WithPartitioner,
    #[token("withsubscription", ignore(ascii_case))]
    WithSubscription,
    #[token("with_session", ignore(ascii_case))]
    WithSession,
    #[token("withdoctype", ignore(ascii_case))]
    WithDocType,
    #[token("withindexsuffix", ignore(ascii_case))]
    WithIndexSuffix,
    #[token("incrementalmode", ignore(ascii_case))]
    IncrementalMode,
    #[token("properties", ignore(ascii_case))]
    Properties,

    // === Punctuation ===
    #[token("=")]
    Eq,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,
    #[token(";")]
    Semicolon,

    // === Quoted identifiers ===
    #[regex(r"`[^`]*`")]
    Backtick,

    #[regex(r"'[^']*'")]
    Quoted,

    // === Bare words: names, numbers, values ===
    // Topic and table names may carry '-', '+', '/', ':', '@', '%'
    #[regex(r#"[^ \t\r\n\f,()=.*;'`]+"#)]
    Word,

    // === Special ===
    Error,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        !matches!(
            self,
            TokenKind::Eq
                | TokenKind::Comma
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Dot
                | TokenKind::Star
                | TokenKind::Semicolon
                | TokenKind::Backtick
                | TokenKind::Quoted
                | TokenKind::Word
                | TokenKind::Error
                | TokenKind::Eof
        )
    }

    /// Tokens that can stand for a name or a value
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Word | TokenKind::Backtick | TokenKind::Quoted
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Insert => "'INSERT'",
            TokenKind::Upsert => "'UPSERT'",
            TokenKind::Update => "'UPDATE'",
            TokenKind::Into => "'INTO'",
            TokenKind::Select => "'SELECT'",
            TokenKind::From => "'FROM'",
            TokenKind::As => "'AS'",
            TokenKind::Pk => "'PK'",
            TokenKind::Ignore => "'IGNORE'",
            TokenKind::PartitionBy => "'PARTITIONBY'",
            TokenKind::DistributeBy => "'DISTRIBUTEBY'",
            TokenKind::ClusterBy => "'CLUSTERBY'",
            TokenKind::Buckets => "'BUCKETS'",
            TokenKind::WithKey => "'WITHKEY'",
            TokenKind::KeyDelimiter => "'KEYDELIMITER'",
            TokenKind::WithTag => "'WITHTAG'",
            TokenKind::WithTags => "'WITHTAGS'",
            TokenKind::AutoCreate => "'AUTOCREATE'",
            TokenKind::AutoEvolve => "'AUTOEVOLVE'",
            TokenKind::Capitalize => "'CAPITALIZE'",
            TokenKind::Initialize => "'INITIALIZE'",
            TokenKind::WithStructure => "'WITH_STRUCTURE'",
            TokenKind::WithUnwrap => "'WITHUNWRAP'",
            TokenKind::WithOverwrite => "'WITH_OVERWRITE'",
            TokenKind::WithAck => "'WITH_ACK'",
            TokenKind::WithEncodeBase64 => "'WITH_ENCODE_BASE64'",
            TokenKind::Batch => "'BATCH'",
            TokenKind::Limit => "'LIMIT'",
            TokenKind::Ttl => "'TTL'",
            TokenKind::ProjectTo => "'PROJECTTO'",
            TokenKind::WithDelay => "'WITHDELAY'",
            TokenKind::WithLockTime => "'WITH_LOCK_TIME'",
            TokenKind::WithFlushInterval => "'WITH_FLUSH_INTERVAL'",
            TokenKind::WithFlushSize => "'WITH_FLUSH_SIZE'",
            TokenKind::WithFlushCount => "'WITH_FLUSH_COUNT'",
            TokenKind::StoreAs => "'STOREAS'",
            TokenKind::WithFormat => "'WITHFORMAT'",
            TokenKind::WithTimestamp => "'WITHTIMESTAMP'",
            TokenKind::TimestampUnit => "'TIMESTAMPUNIT'",
            TokenKind::WithCompression => "'WITHCOMPRESSION'",
            TokenKind::WithSchemaEvolution => "'WITH_SCHEMA_EVOLUTION'",
            TokenKind::WithPartitioning => "'WITH_PARTITIONING'",
            TokenKind::WithTableLocation => "'WITH_TABLE_LOCATION'",
            TokenKind::WithType => "'WITHTYPE'",
            TokenKind::WithConverter => "'WITHCONVERTER'",
            TokenKind::WithJmsSelector => "'WITHJMSSELECTOR'",
            TokenKind::WithRegex => "'WITHREGEX'",
            TokenKind::WithTarget => "'WITHTARGET'",
            TokenKind::WithPipeline => "'WITHPIPELINE'",
            TokenKind::WithPartitioner => "'WITHPARTITIONER'",
            TokenKind::WithSubscription => "'WITHSUBSCRIPTION'",
            TokenKind::WithSession => "'WITH_SESSION'",
            TokenKind::WithDocType => "'WITHDOCTYPE'",
            TokenKind::WithIndexSuffix => "'WITHINDEXSUFFIX'",
            TokenKind::IncrementalMode => "'INCREMENTALMODE'",
            TokenKind::Properties => "'PROPERTIES'",
            TokenKind::Eq => "'='",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Dot => "'.'",
            TokenKind::Star => "'*'",
            TokenKind::Semicolon => "';'",
            TokenKind::Backtick => "backtick-quoted name",
            TokenKind::Quoted => "quoted string",
            TokenKind::Word => "identifier",
            TokenKind::Error => "unrecognised input",
            TokenKind::Eof => "end of statement",
        }
    }
}
