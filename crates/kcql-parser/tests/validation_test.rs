//! Integration tests for statement validation

use kcql_parser::{parse, KcqlError, SemanticError};

/// Helper to parse a statement that must fail validation
fn semantic_error(statement: &str) -> SemanticError {
    match parse(statement) {
        Ok(query) => panic!("Expected {:?} to fail, got {:?}", statement, query),
        Err(KcqlError::Semantic(err)) => err,
        Err(other) => panic!("Expected a semantic error for {:?}, got {}", statement, other),
    }
}

/// Helper to parse a statement that must fail in the grammar
fn syntax_error(statement: &str) -> KcqlError {
    let err = parse(statement).expect_err("expected a syntax error");
    assert!(err.is_syntax(), "Expected syntax error, got {}", err);
    err
}

// === Duplicates ===

#[test]
fn test_duplicate_select_field() {
    let err = semantic_error("INSERT INTO t SELECT a, b, a AS c FROM s");
    assert!(matches!(err, SemanticError::DuplicateField { list: "Field", .. }));
    assert!(err.to_string().contains("a has already been defined"));
}

#[test]
fn test_same_name_under_other_parent_is_not_duplicate() {
    assert!(parse("INSERT INTO t SELECT a.x, b.x, x FROM s").is_ok());
}

#[test]
fn test_duplicate_key_field() {
    let err = semantic_error("INSERT INTO t SELECT _key.a, _key.a FROM s");
    assert!(matches!(err, SemanticError::DuplicateField { list: "Key field", .. }));
}

#[test]
fn test_key_and_value_with_same_name_coexist() {
    let query = parse("INSERT INTO t SELECT a, _key.a, _header.a FROM s").unwrap();
    assert_eq!(query.fields.len(), 1);
    assert_eq!(query.key_fields.len(), 1);
    assert_eq!(query.header_fields.len(), 1);
}

#[test]
fn test_duplicate_ignored_field() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s IGNORE a, a");
    assert!(matches!(err, SemanticError::DuplicateField { list: "Ignored field", .. }));
}

#[test]
fn test_duplicate_partition() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s PARTITIONBY a, b, A");
    assert!(matches!(err, SemanticError::DuplicateName { clause: "PARTITIONBY", .. }));
}

#[test]
fn test_duplicate_bucket_name() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s CLUSTERBY a, a INTO 2 BUCKETS");
    assert!(matches!(err, SemanticError::DuplicateName { .. }));
}

#[test]
fn test_duplicate_storeas_parameter() {
    let err = semantic_error(
        "INSERT INTO t SELECT * FROM s STOREAS `SortedSet` (score = ts, SCORE = other)",
    );
    assert!(matches!(err, SemanticError::DuplicateStoreAsParameter { .. }));
    assert!(err.to_string().contains("SCORE"));
}

#[test]
fn test_duplicate_property() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s PROPERTIES (a = 1, a = 2)");
    assert!(matches!(err, SemanticError::DuplicateProperty { .. }));
}

#[test]
fn test_repeated_clause() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s AUTOCREATE AUTOCREATE");
    assert!(matches!(err, SemanticError::RepeatedClause { clause: "AUTOCREATE", .. }));
}

#[test]
fn test_tag_spellings_share_one_clause() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s WITHTAG (a) WITHTAGS (b)");
    assert!(matches!(err, SemanticError::RepeatedClause { clause: "WITHTAG", .. }));
}

// === Numbers ===

#[test]
fn test_numeric_guards_name_the_clause() {
    let cases = [
        ("BATCH = 0", "BATCH"),
        ("BATCH = abc", "BATCH"),
        ("LIMIT 0", "LIMIT"),
        ("TTL = -1", "TTL"),
        ("WITH_FLUSH_INTERVAL = 0", "WITH_FLUSH_INTERVAL"),
        ("WITH_FLUSH_SIZE = x", "WITH_FLUSH_SIZE"),
        ("WITH_FLUSH_COUNT = 0", "WITH_FLUSH_COUNT"),
        ("WITHDELAY = 0", "WITHDELAY"),
        ("WITH_LOCK_TIME = 0", "WITH_LOCK_TIME"),
        ("PROJECTTO 0", "PROJECTTO"),
        ("CLUSTERBY a INTO 0 BUCKETS", "BUCKETS"),
    ];

    for (clause, name) in cases {
        let statement = format!("INSERT INTO t SELECT * FROM s {}", clause);
        match semantic_error(&statement) {
            SemanticError::InvalidNumber { clause, .. } => assert_eq!(clause, name),
            other => panic!("{}: unexpected error {}", statement, other),
        }
    }
}

#[test]
fn test_invalid_number_echoes_raw_text() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s BATCH = 12a");
    assert!(err.to_string().contains("'12a'"));
}

#[test]
fn test_integer_overflow_is_rejected() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s BATCH = 3000000000");
    assert!(matches!(err, SemanticError::InvalidNumber { .. }));
    assert!(parse("INSERT INTO t SELECT * FROM s TTL = 3000000000").is_ok());
}

// === Vocabularies ===

#[test]
fn test_unknown_values_list_legal_values() {
    let cases = [
        ("WITHFORMAT xml", "AVRO, JSON, MAP, OBJECT, PROTOBUF"),
        ("WITHCOMPRESSION = gzip", "NONE, LZ4, ZLIB, ZSTD, SNAPPY"),
        ("WITH_SCHEMA_EVOLUTION = drop", "ADD, MATCH"),
        ("WITH_PARTITIONING = hash", "STATIC, DYNAMIC"),
        (
            "TIMESTAMPUNIT = weeks",
            "NANOSECONDS, MICROSECONDS, MILLISECONDS, SECONDS, MINUTES, HOURS, DAYS",
        ),
    ];

    for (clause, valid) in cases {
        let statement = format!("INSERT INTO t SELECT * FROM s {}", clause);
        let err = semantic_error(&statement);
        assert!(matches!(err, SemanticError::UnknownValue { .. }));
        assert!(
            err.to_string().contains(valid),
            "{} should list {}",
            err,
            valid
        );
    }
}

// === Structure ===

#[test]
fn test_bucketing_without_count() {
    let err = semantic_error("UPSERT INTO T SELECT col1,col2 FROM S CLUSTERBY col2");
    assert!(matches!(err, SemanticError::MissingBucketCount { .. }));
}

#[test]
fn test_bucketing_without_names() {
    let err = semantic_error("UPSERT INTO T SELECT col1 FROM S CLUSTERBY INTO 2 BUCKETS");
    assert!(matches!(err, SemanticError::MissingBucketNames { .. }));
}

#[test]
fn test_unterminated_path() {
    let err = semantic_error("INSERT INTO t SELECT a.b. FROM s");
    assert!(matches!(err, SemanticError::UnterminatedPath { .. }));
    assert!(err.to_string().contains("a.b."));
}

#[test]
fn test_unterminated_timestamp_field() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s WITHTIMESTAMP a.");
    assert!(matches!(err, SemanticError::UnterminatedPath { ref path, .. } if path == "a."));
}

#[test]
fn test_unterminated_partition() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s PARTITIONBY a, b.c.");
    assert!(matches!(err, SemanticError::UnterminatedPath { ref path, .. } if path == "b.c."));
}

#[test]
fn test_unterminated_bucket_name() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s CLUSTERBY a. INTO 2 BUCKETS");
    assert!(matches!(err, SemanticError::UnterminatedPath { ref path, .. } if path == "a."));
}

#[test]
fn test_quoted_names_may_end_with_dot() {
    let query = parse("INSERT INTO t SELECT * FROM s PARTITIONBY `a.`").unwrap();
    assert_eq!(query.partition_by, vec!["a."]);
}

#[test]
fn test_tag_key_with_trailing_dot() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s WITHTAG (a.b.)");
    assert!(matches!(err, SemanticError::TagEndsWithDot { .. }));
}

#[test]
fn test_malformed_tag() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s WITHTAG (a like b)");
    assert!(matches!(err, SemanticError::InvalidTag { .. }));
}

#[test]
fn test_blank_key_delimiter() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s KEYDELIMITER = ' '");
    assert!(matches!(err, SemanticError::BlankKeyDelimiter { .. }));
}

#[test]
fn test_unsupported_timestamp_function() {
    let err = semantic_error("INSERT INTO t SELECT * FROM s WITHTIMESTAMP now()");
    assert!(matches!(err, SemanticError::UnsupportedTimestampFunction { .. }));
}

// === Grammar ===

#[test]
fn test_missing_skeleton_parts() {
    syntax_error("INSERT INTO SELECT * FROM s");
    syntax_error("INSERT INTO t * FROM s");
    syntax_error("INSERT INTO t SELECT FROM s");
    syntax_error("INSERT INTO t SELECT * s");
    syntax_error("");
}

#[test]
fn test_unterminated_source_and_target() {
    let err = syntax_error("INSERT INTO t SELECT * FROM s. BATCH = 1");
    assert!(err.message().contains("a name segment after '.'"));
    syntax_error("INSERT INTO t SELECT * FROM s.");
    syntax_error("INSERT INTO t. SELECT * FROM s");
}

#[test]
fn test_empty_storeas_parameters() {
    syntax_error("INSERT INTO t SELECT * FROM s STOREAS `x` ()");
}

#[test]
fn test_trailing_garbage() {
    let err = syntax_error("INSERT INTO t SELECT * FROM s; SELECT");
    assert!(err.message().contains("end of statement"));
}

#[test]
fn test_errors_carry_no_partial_query() {
    // Only the error is returned; the Ok branch is the only way to a Query
    let result = parse("INSERT INTO t SELECT a, a FROM s AUTOCREATE");
    assert!(result.is_err());
}
