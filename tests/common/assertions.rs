use kcql::ast::*;
use kcql::parser::{KcqlError, SemanticError};

/// Assert that parsing succeeds and return the query
pub fn assert_parses(statement: &str) -> Query {
    match kcql::parse(statement) {
        Ok(query) => query,
        Err(e) => panic!("Expected {:?} to parse, got: {}", statement, e),
    }
}

/// Assert that parsing fails
pub fn assert_parse_fails(statement: &str) -> KcqlError {
    match kcql::parse(statement) {
        Ok(query) => panic!("Expected {:?} to fail parsing, got {:?}", statement, query),
        Err(e) => e,
    }
}

/// Assert that parsing fails with a rule violation
pub fn assert_semantic_error(statement: &str) -> SemanticError {
    let err = assert_parse_fails(statement);
    match err.semantic() {
        Some(semantic) => semantic.clone(),
        None => panic!("Expected a semantic error for {:?}, got: {}", statement, err),
    }
}

/// Names of a field list, in order
pub fn names(fields: &[Field]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

/// Assert a field's name, alias and parent path
pub fn assert_field(field: &Field, name: &str, alias: &str, parents: &[&str]) {
    assert_eq!(field.name, name, "name of {}", field);
    assert_eq!(field.alias, alias, "alias of {}", field);
    assert_eq!(field.parents, parents, "parents of {}", field);
}
