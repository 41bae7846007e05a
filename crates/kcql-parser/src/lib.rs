//! KCQL Parser - Recursive descent parser
//!
//! Parses a KCQL statement into a [`Query`].
//! Parsing happens in two passes:
//! - the grammar builds a [`Statement`] syntax tree and performs no validation
//! - the [`QueryBuilder`] folds the tree into a `Query`, enforcing every rule
//!   that needs more than one token of context (numbers, vocabularies, duplicates)

mod builder;
mod error;
mod parser;

pub use builder::*;
pub use error::*;
pub use parser::*;

use kcql_ast::{Query, Statement};
use kcql_lexer::tokenize;
use tracing::debug;

/// Parse a statement into its syntax tree without validating it
pub fn parse_syntax(statement: &str) -> Result<Statement, KcqlError> {
    let tokens = tokenize(statement);
    let mut parser = Parser::new(statement, tokens);
    parser
        .parse_statement()
        .map_err(|err| KcqlError::syntax(statement, err))
}

/// Parse and validate a single statement
pub fn parse(statement: &str) -> Result<Query, KcqlError> {
    let syntax = parse_syntax(statement)?;
    debug!(
        source = %syntax.source.node,
        clauses = syntax.clauses.len(),
        "parsed statement"
    );
    let query = QueryBuilder::new(statement).build(syntax)?;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcql_ast::*;

    #[test]
    fn test_parse_insert() {
        let query = parse("INSERT INTO TABLE_A SELECT * FROM TOPIC_A PK f1,f2").unwrap();
        assert_eq!(query.source, "TOPIC_A");
        assert_eq!(query.target.as_deref(), Some("TABLE_A"));
        assert_eq!(query.write_mode, Some(WriteMode::Insert));
        assert!(query.selects_all());
        let pks: Vec<_> = query.primary_keys.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(pks, vec!["f1", "f2"]);
        assert!(query.tags.is_none());
    }

    #[test]
    fn test_parse_keeps_statement_text() {
        let text = "UPSERT INTO a SELECT x FROM b";
        assert_eq!(parse(text).unwrap().statement, text);
    }

    #[test]
    fn test_keywords_ignore_case() {
        let query = parse("upsert into a select x from b autocreate WithFormat avro").unwrap();
        assert_eq!(query.write_mode, Some(WriteMode::Upsert));
        assert!(query.auto_create);
        assert_eq!(query.format_type, Some(FormatType::Avro));
    }

    #[test]
    fn test_syntax_error_has_line_and_column() {
        let err = parse("INSERT INTO a\nSELECT * FROM").unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.line(), Some(2));
        assert!(err.message().starts_with("failed to parse at line 2"));
    }

    #[test]
    fn test_semantic_error_has_no_line() {
        let err = parse("INSERT INTO a SELECT * FROM b BATCH = 0").unwrap_err();
        assert!(!err.is_syntax());
        assert_eq!(err.line(), None);
        assert!(matches!(
            err.semantic(),
            Some(SemanticError::InvalidNumber { clause: "BATCH", .. })
        ));
        let span = err.span().unwrap();
        assert_eq!(&"INSERT INTO a SELECT * FROM b BATCH = 0"[span.start..span.end], "0");
    }

    #[test]
    fn test_repeated_clause() {
        let err = parse("INSERT INTO a SELECT * FROM b LIMIT 1 LIMIT 2").unwrap_err();
        assert!(matches!(
            err.semantic(),
            Some(SemanticError::RepeatedClause { clause: "LIMIT", .. })
        ));
    }

    #[test]
    fn test_unlexable_input() {
        let err = parse("INSERT INTO a SELECT * FROM `b").unwrap_err();
        assert!(matches!(
            err,
            KcqlError::Syntax {
                source: ParseError::InvalidToken { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_parse_syntax_does_not_validate() {
        let stmt = parse_syntax("INSERT INTO a SELECT * FROM b CLUSTERBY x").unwrap();
        assert_eq!(stmt.clauses.len(), 1);
        assert!(parse("INSERT INTO a SELECT * FROM b CLUSTERBY x").is_err());
    }
}
