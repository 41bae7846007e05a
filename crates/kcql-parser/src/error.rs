//! Parser error types
//!
//! Grammar failures are [`ParseError`]s, rule violations in a well-formed
//! statement are [`SemanticError`]s. Callers only ever see [`KcqlError`],
//! which wraps either one.

use std::fmt;

use kcql_ast::{Span, UnknownValue};
use kcql_lexer::{Token, TokenKind};
use thiserror::Error;

/// The grammar could not derive a statement from the tokens
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of statement: expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    #[error("unrecognised input '{text}'")]
    InvalidToken { text: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::InvalidToken { span, .. } => *span,
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: &Token, source: &str) -> Self {
        match found.kind {
            TokenKind::Eof => ParseError::UnexpectedEof {
                expected: expected.into(),
                span: found.span,
            },
            TokenKind::Error => ParseError::InvalidToken {
                text: found.text(source).to_string(),
                span: found.span,
            },
            TokenKind::Word | TokenKind::Backtick | TokenKind::Quoted => {
                ParseError::UnexpectedToken {
                    expected: expected.into(),
                    found: format!("{} '{}'", found.kind.describe(), found.text(source)),
                    span: found.span,
                }
            }
            kind => ParseError::UnexpectedToken {
                expected: expected.into(),
                found: kind.describe().to_string(),
                span: found.span,
            },
        }
    }
}

/// Which side of a mapping a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Target => f.write_str("target"),
        }
    }
}

/// A syntactically valid statement breaks a KCQL rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("{list} {field} has already been defined")]
    DuplicateField {
        /// "Field", "Key field", "Header field" or "Ignored field"
        list: &'static str,
        field: String,
        span: Span,
    },

    #[error("the field {name} appears twice in {clause}")]
    DuplicateName {
        clause: &'static str,
        name: String,
        span: Span,
    },

    #[error("{clause} requires a non-empty name")]
    BlankName { clause: &'static str, span: Span },

    #[error("{name} is a duplicated entry in the STOREAS parameters list")]
    DuplicateStoreAsParameter { name: String, span: Span },

    #[error("property {name} is defined more than once")]
    DuplicateProperty { name: String, span: Span },

    #[error("{clause} is specified more than once")]
    RepeatedClause { clause: &'static str, span: Span },

    #[error("invalid value '{value}' for {clause}: expecting {expected} greater than zero")]
    InvalidNumber {
        clause: &'static str,
        value: String,
        /// "an integer" or "a long"
        expected: &'static str,
        span: Span,
    },

    #[error("{source}")]
    UnknownValue { source: UnknownValue, span: Span },

    #[error("invalid syntax for tag '{text}'. Needs to be 'tag1 [as x]' or 'tag1' or 'tag1 = constant'")]
    InvalidTag { text: String, span: Span },

    #[error("invalid syntax for tag '{key}'. Field selection can not end with '.'")]
    TagEndsWithDot { key: String, span: Span },

    #[error("{clause} requires at least one bucket name")]
    MissingBucketNames { clause: &'static str, span: Span },

    #[error("{clause} requires the number of buckets: 'INTO <n> BUCKETS'")]
    MissingBucketCount { clause: &'static str, span: Span },

    #[error("field selection '{path}' can not end with '.'")]
    UnterminatedPath { path: String, span: Span },

    #[error("invalid key delimiter. Needs to be a non empty string")]
    BlankKeyDelimiter { span: Span },

    #[error("unsupported timestamp function {name}; only sys_time() is available")]
    UnsupportedTimestampFunction { name: String, span: Span },

    #[error("{role} {name} cannot be mapped twice")]
    DuplicateMapping { role: Role, name: String },

    #[error("{role} name '{name}' is not valid: {reason}")]
    InvalidName {
        role: Role,
        name: String,
        reason: String,
    },

    #[error("unsupported properties: {}. Allowed properties are: {}", .names.join(", "), .allowed.join(", "))]
    UnsupportedProperties {
        names: Vec<String>,
        allowed: Vec<String>,
    },
}

impl SemanticError {
    /// Location within the statement, when the rule is local to it
    pub fn span(&self) -> Option<Span> {
        match self {
            SemanticError::DuplicateField { span, .. }
            | SemanticError::DuplicateName { span, .. }
            | SemanticError::BlankName { span, .. }
            | SemanticError::DuplicateStoreAsParameter { span, .. }
            | SemanticError::DuplicateProperty { span, .. }
            | SemanticError::RepeatedClause { span, .. }
            | SemanticError::InvalidNumber { span, .. }
            | SemanticError::UnknownValue { span, .. }
            | SemanticError::InvalidTag { span, .. }
            | SemanticError::TagEndsWithDot { span, .. }
            | SemanticError::MissingBucketNames { span, .. }
            | SemanticError::MissingBucketCount { span, .. }
            | SemanticError::UnterminatedPath { span, .. }
            | SemanticError::BlankKeyDelimiter { span }
            | SemanticError::UnsupportedTimestampFunction { span, .. } => Some(*span),
            SemanticError::DuplicateMapping { .. }
            | SemanticError::InvalidName { .. }
            | SemanticError::UnsupportedProperties { .. } => None,
        }
    }
}

/// The single error kind surfaced by parsing and mapping
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KcqlError {
    #[error("failed to parse at line {line}, column {column}: {source}")]
    Syntax {
        line: usize,
        column: usize,
        source: ParseError,
    },

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// An error raised while handling one statement of a batch
    #[error("statement {}: {error}", .index + 1)]
    Statement {
        /// Zero-based position in the batch
        index: usize,
        /// Byte offset of the statement within the batch text
        offset: usize,
        #[source]
        error: Box<KcqlError>,
    },
}

impl KcqlError {
    /// Attach line and column to a grammar failure
    pub fn syntax(statement: &str, error: ParseError) -> Self {
        let (line, column) = error.span().line_col(statement);
        KcqlError::Syntax {
            line,
            column,
            source: error,
        }
    }

    pub fn in_statement(self, index: usize, offset: usize) -> Self {
        KcqlError::Statement {
            index,
            offset,
            error: Box::new(self),
        }
    }

    /// Line of the failure, relative to the statement it occurred in
    pub fn line(&self) -> Option<usize> {
        match self {
            KcqlError::Syntax { line, .. } => Some(*line),
            KcqlError::Semantic(_) => None,
            KcqlError::Statement { error, .. } => error.line(),
        }
    }

    /// Byte span of the failure; batch errors are relative to the batch text
    pub fn span(&self) -> Option<Span> {
        match self {
            KcqlError::Syntax { source, .. } => Some(source.span()),
            KcqlError::Semantic(error) => error.span(),
            KcqlError::Statement { offset, error, .. } => {
                error.span().map(|span| span.shift(*offset))
            }
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_syntax(&self) -> bool {
        match self {
            KcqlError::Syntax { .. } => true,
            KcqlError::Semantic(_) => false,
            KcqlError::Statement { error, .. } => error.is_syntax(),
        }
    }

    /// The rule violation behind this error, if any
    pub fn semantic(&self) -> Option<&SemanticError> {
        match self {
            KcqlError::Syntax { .. } => None,
            KcqlError::Semantic(error) => Some(error),
            KcqlError::Statement { error, .. } => error.semantic(),
        }
    }
}
