//! Recursive descent parser implementation

use kcql_ast::*;
use kcql_lexer::{Token, TokenKind};

use crate::ParseError;

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // === Utilities ===

    fn current(&self) -> Token {
        match self.tokens.get(self.pos).or_else(|| self.tokens.last()) {
            Some(token) => *token,
            None => Token {
                kind: TokenKind::Eof,
                span: Span::new(self.source.len(), self.source.len()),
            },
        }
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek())
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// Skip an optional `=` before a clause value
    fn eat_eq(&mut self) {
        if self.at(TokenKind::Eq) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, &self.current(), self.source)
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// End offset of the last consumed token
    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end,
            None => 0,
        }
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start, self.prev_end().max(start.start))
    }

    // === Statement ===

    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.span();

        let (verb, target) = match self.peek() {
            TokenKind::Insert | TokenKind::Upsert | TokenKind::Update => {
                let token = self.advance();
                let mode = match token.kind {
                    TokenKind::Insert => WriteMode::Insert,
                    TokenKind::Upsert => WriteMode::Upsert,
                    _ => WriteMode::Update,
                };
                self.consume(TokenKind::Into)?;
                let target = self.parse_name("a target name")?;
                (Some(Spanned::new(mode, token.span)), Some(target))
            }
            TokenKind::Select => (None, None),
            _ => return Err(self.unexpected("'INSERT', 'UPSERT', 'UPDATE' or 'SELECT'")),
        };

        self.consume(TokenKind::Select)?;
        let columns = self.parse_column_list(true)?;
        self.consume(TokenKind::From)?;
        let source = self.parse_name("a source name")?;

        let mut clauses = Vec::new();
        while !self.at_any(&[TokenKind::Semicolon, TokenKind::Eof]) {
            clauses.push(self.parse_clause()?);
        }
        if self.at(TokenKind::Semicolon) {
            self.advance();
        }
        if !self.at(TokenKind::Eof) {
            return Err(self.unexpected(TokenKind::Eof.describe()));
        }

        Ok(Statement {
            verb,
            target,
            columns,
            source,
            clauses,
            span: self.span_from(start),
        })
    }

    // === Names and values ===

    /// A name or value: one value token, extended by any directly adjacent
    /// `.segment` pieces, so `KEYSPACE.A` and `` `TOPIC.A` `` read the same way
    fn parse_text(&mut self, expected: &str) -> Result<Spanned<String>, ParseError> {
        Ok(self.parse_path(expected)?.name)
    }

    /// Like [`Parser::parse_text`], noting whether the text stopped on a
    /// bare `.`
    fn parse_path(&mut self, expected: &str) -> Result<PathRef, ParseError> {
        let first = self.current();
        if !first.kind.is_value() {
            return Err(self.unexpected(expected));
        }
        self.advance();

        let mut text = first.value(self.source).to_string();
        let mut span = first.span;
        let mut last = first.kind;
        loop {
            let next = self.current();
            if next.span.start != span.end {
                break;
            }
            match next.kind {
                TokenKind::Dot => text.push('.'),
                kind if last == TokenKind::Dot && (kind.is_value() || kind.is_keyword()) => {
                    text.push_str(next.value(self.source))
                }
                _ => break,
            }
            self.advance();
            span = span.merge(next.span);
            last = next.kind;
        }

        Ok(PathRef {
            name: Spanned::new(text, span),
            dangling: last == TokenKind::Dot,
        })
    }

    fn parse_path_list(&mut self, expected: &str) -> Result<Vec<PathRef>, ParseError> {
        let mut items = vec![self.parse_path(expected)?];
        while self.at(TokenKind::Comma) {
            self.advance();
            items.push(self.parse_path(expected)?);
        }
        Ok(items)
    }

    /// A source or target name; a trailing `.` must be followed by a segment
    fn parse_name(&mut self, expected: &str) -> Result<Spanned<String>, ParseError> {
        let path = self.parse_path(expected)?;
        if path.dangling {
            return Err(self.unexpected("a name segment after '.'"));
        }
        Ok(path.name)
    }

    fn parse_text_list(&mut self, expected: &str) -> Result<Vec<Spanned<String>>, ParseError> {
        let mut items = vec![self.parse_text(expected)?];
        while self.at(TokenKind::Comma) {
            self.advance();
            items.push(self.parse_text(expected)?);
        }
        Ok(items)
    }

    /// `[=] value`
    fn parse_option(&mut self, expected: &str) -> Result<Spanned<String>, ParseError> {
        self.eat_eq();
        self.parse_text(expected)
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let name = self.parse_text("a parameter name")?;
        self.consume(TokenKind::Eq)?;
        let value = self.parse_text("a parameter value")?;
        Ok(Assignment { name, value })
    }

    /// `( name = value, ... )`
    fn parse_assignments(&mut self) -> Result<Vec<Assignment>, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut assignments = vec![self.parse_assignment()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            assignments.push(self.parse_assignment()?);
        }
        self.consume(TokenKind::RParen)?;
        Ok(assignments)
    }

    // === Columns ===

    fn parse_column_list(&mut self, allow_alias: bool) -> Result<Vec<ColumnRef>, ParseError> {
        let mut columns = vec![self.parse_column(allow_alias)?];
        while self.at(TokenKind::Comma) {
            self.advance();
            columns.push(self.parse_column(allow_alias)?);
        }
        Ok(columns)
    }

    /// `*` or `seg(.seg)*[.*] [AS alias]`
    fn parse_column(&mut self, allow_alias: bool) -> Result<ColumnRef, ParseError> {
        let start = self.span();

        if self.at(TokenKind::Star) {
            self.advance();
            return Ok(ColumnRef {
                segments: vec![Field::WILDCARD.to_string()],
                dangling: false,
                alias: None,
                span: start,
            });
        }

        let first = self.current();
        if !first.kind.is_value() {
            return Err(self.unexpected("a field name or '*'"));
        }
        self.advance();
        let mut segments = vec![first.value(self.source).to_string()];
        let mut dangling = false;

        while self.at(TokenKind::Dot) {
            let dot = self.advance();
            let next = self.current();
            match next.kind {
                TokenKind::Star => {
                    self.advance();
                    segments.push(Field::WILDCARD.to_string());
                    break;
                }
                kind if kind.is_value() => {
                    self.advance();
                    segments.push(next.value(self.source).to_string());
                }
                kind if kind.is_keyword() && next.span.start == dot.span.end => {
                    self.advance();
                    segments.push(next.text(self.source).to_string());
                }
                _ => {
                    dangling = true;
                    break;
                }
            }
        }

        let alias = if allow_alias && self.at(TokenKind::As) {
            self.advance();
            Some(self.parse_text("an alias")?.node)
        } else {
            None
        };

        Ok(ColumnRef {
            segments,
            dangling,
            alias,
            span: self.span_from(start),
        })
    }

    // === Clauses ===

    fn parse_clause(&mut self) -> Result<Spanned<Clause>, ParseError> {
        let start = self.span();
        let keyword = self.advance();

        let clause = match keyword.kind {
            TokenKind::Pk => Clause::PrimaryKey(self.parse_column_list(false)?),
            TokenKind::Ignore => Clause::Ignore(self.parse_column_list(true)?),
            TokenKind::AutoCreate => Clause::AutoCreate,
            TokenKind::AutoEvolve => Clause::AutoEvolve,
            TokenKind::Capitalize => Clause::Capitalize,
            TokenKind::Initialize => Clause::Initialize,
            TokenKind::WithStructure => Clause::WithStructure,
            TokenKind::WithUnwrap => Clause::Unwrap,
            TokenKind::WithOverwrite => Clause::Overwrite,
            TokenKind::WithAck => Clause::Ack,
            TokenKind::WithEncodeBase64 => Clause::EncodeBase64,

            TokenKind::Batch => Clause::Batch(self.parse_option("a batch size")?),
            TokenKind::Limit => Clause::Limit(self.parse_option("a limit")?),
            TokenKind::Ttl => Clause::Ttl(self.parse_option("a TTL")?),
            TokenKind::ProjectTo => Clause::ProjectTo(self.parse_option("a version")?),
            TokenKind::WithDelay => Clause::Delay(self.parse_option("a delay")?),
            TokenKind::WithLockTime => Clause::LockTime(self.parse_option("a lock time")?),
            TokenKind::WithFlushInterval => {
                Clause::FlushInterval(self.parse_option("a flush interval")?)
            }
            TokenKind::WithFlushSize => Clause::FlushSize(self.parse_option("a flush size")?),
            TokenKind::WithFlushCount => Clause::FlushCount(self.parse_option("a flush count")?),

            TokenKind::PartitionBy => Clause::PartitionBy(self.parse_path_list("a partition field")?),
            TokenKind::DistributeBy | TokenKind::ClusterBy => self.parse_bucketing()?,
            TokenKind::StoreAs => {
                let type_name = self.parse_option("a storage type")?;
                let parameters = if self.at(TokenKind::LParen) {
                    self.parse_assignments()?
                } else {
                    Vec::new()
                };
                Clause::StoreAs {
                    type_name,
                    parameters,
                }
            }
            TokenKind::WithFormat => Clause::Format(self.parse_option("a format")?),
            TokenKind::WithTimestamp => {
                self.eat_eq();
                let value = self.parse_path("a timestamp field or sys_time()")?;
                let call = self.at(TokenKind::LParen) && self.peek_ahead(1) == TokenKind::RParen;
                if call {
                    self.advance();
                    self.advance();
                }
                Clause::Timestamp { value, call }
            }
            TokenKind::TimestampUnit => Clause::TimestampUnit(self.parse_option("a time unit")?),
            TokenKind::WithTag | TokenKind::WithTags => Clause::Tags(self.parse_tags()?),
            TokenKind::WithKey => {
                self.eat_eq();
                self.consume(TokenKind::LParen)?;
                let keys = self.parse_text_list("a key name")?;
                self.consume(TokenKind::RParen)?;
                Clause::WithKeys(keys)
            }
            TokenKind::KeyDelimiter => Clause::KeyDelimiter(self.parse_option("a delimiter")?),
            TokenKind::WithType => Clause::WithType(self.parse_option("a type")?),
            TokenKind::WithConverter => Clause::Converter(self.parse_option("a converter")?),
            TokenKind::WithJmsSelector => Clause::JmsSelector(self.parse_option("a selector")?),
            TokenKind::WithRegex => Clause::Regex(self.parse_option("a regex")?),
            TokenKind::WithTarget => Clause::Target(self.parse_option("a target path")?),
            TokenKind::WithPipeline => Clause::Pipeline(self.parse_option("a pipeline")?),
            TokenKind::WithPartitioner => Clause::Partitioner(self.parse_option("a partitioner")?),
            TokenKind::WithSubscription => {
                Clause::Subscription(self.parse_option("a subscription")?)
            }
            TokenKind::WithCompression => {
                Clause::Compression(self.parse_option("a compression type")?)
            }
            TokenKind::WithTableLocation => {
                Clause::TableLocation(self.parse_option("a table location")?)
            }
            TokenKind::WithSchemaEvolution => {
                Clause::SchemaEvolution(self.parse_option("a schema evolution mode")?)
            }
            TokenKind::WithPartitioning => {
                Clause::Partitioning(self.parse_option("a partitioning strategy")?)
            }
            TokenKind::WithSession => Clause::Session(self.parse_option("a session name")?),
            TokenKind::WithDocType => Clause::DocType(self.parse_option("a document type")?),
            TokenKind::WithIndexSuffix => Clause::IndexSuffix(self.parse_option("an index suffix")?),
            TokenKind::IncrementalMode => {
                Clause::IncrementalMode(self.parse_option("an incremental mode")?)
            }
            TokenKind::Properties => {
                self.eat_eq();
                Clause::Properties(self.parse_assignments()?)
            }
            _ => {
                return Err(ParseError::unexpected(
                    "a clause keyword",
                    &keyword,
                    self.source,
                ))
            }
        };

        Ok(Spanned::new(clause, self.span_from(start)))
    }

    /// `DISTRIBUTEBY|CLUSTERBY [names] [INTO n BUCKETS]`; pairing is checked later
    fn parse_bucketing(&mut self) -> Result<Clause, ParseError> {
        let names = if self.peek().is_value() {
            self.parse_path_list("a bucket field")?
        } else {
            Vec::new()
        };

        let count = if self.at(TokenKind::Into) {
            self.advance();
            let count = self.parse_text("a bucket count")?;
            self.consume(TokenKind::Buckets)?;
            Some(count)
        } else {
            None
        };

        Ok(Clause::Bucketing { names, count })
    }

    /// `( [tag (, tag)*] )`
    fn parse_tags(&mut self) -> Result<Vec<TagDef>, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut tags = Vec::new();
        if !self.at(TokenKind::RParen) {
            tags.push(self.parse_tag()?);
            while self.at(TokenKind::Comma) {
                self.advance();
                tags.push(self.parse_tag()?);
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(tags)
    }

    fn parse_tag(&mut self) -> Result<TagDef, ParseError> {
        let start = self.span();
        let key = self.parse_text("a tag")?;

        let (marker, value) = match self.peek() {
            TokenKind::Comma | TokenKind::RParen => (None, None),
            TokenKind::Eq | TokenKind::As => {
                let token = self.advance();
                let marker = Spanned::new(token.text(self.source).to_string(), token.span);
                (Some(marker), Some(self.parse_text("a tag value")?))
            }
            kind if kind.is_value() => {
                // Recorded as written so the builder can report it
                let token = self.advance();
                let marker = Spanned::new(token.text(self.source).to_string(), token.span);
                let value = if self.peek().is_value() {
                    Some(self.parse_text("a tag value")?)
                } else {
                    None
                };
                (Some(marker), value)
            }
            _ => return Err(self.unexpected("',' or ')'")),
        };

        Ok(TagDef {
            key,
            marker,
            value,
            span: self.span_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcql_lexer::tokenize;

    fn statement(source: &str) -> Statement {
        let mut parser = Parser::new(source, tokenize(source));
        parser.parse_statement().unwrap()
    }

    fn error(source: &str) -> ParseError {
        let mut parser = Parser::new(source, tokenize(source));
        parser.parse_statement().unwrap_err()
    }

    #[test]
    fn test_skeleton() {
        let stmt = statement("INSERT INTO out SELECT a, b.c FROM in");
        assert_eq!(stmt.verb.map(|v| v.node), Some(WriteMode::Insert));
        assert_eq!(stmt.target.map(|t| t.node).as_deref(), Some("out"));
        assert_eq!(stmt.source.node, "in");
        assert_eq!(stmt.columns.len(), 2);
        assert_eq!(stmt.columns[1].segments, vec!["b", "c"]);
        assert!(stmt.clauses.is_empty());
    }

    #[test]
    fn test_dotted_names_are_joined() {
        let stmt = statement("INSERT INTO KEYSPACE.A SELECT * FROM `TOPIC.A`");
        assert_eq!(stmt.target.unwrap().node, "KEYSPACE.A");
        assert_eq!(stmt.source.node, "TOPIC.A");
    }

    #[test]
    fn test_column_wildcards_and_alias() {
        let stmt = statement("SELECT *, a.*, _key.*, x.y AS z FROM t");
        let segments: Vec<_> = stmt.columns.iter().map(|c| c.segments.clone()).collect();
        assert_eq!(segments[0], vec!["*"]);
        assert_eq!(segments[1], vec!["a", "*"]);
        assert_eq!(segments[2], vec!["_key", "*"]);
        assert_eq!(segments[3], vec!["x", "y"]);
        assert_eq!(stmt.columns[3].alias.as_deref(), Some("z"));
    }

    #[test]
    fn test_dangling_path_is_recorded() {
        let stmt = statement("SELECT a. FROM t");
        assert!(stmt.columns[0].dangling);
    }

    #[test]
    fn test_dangling_clause_names_are_recorded() {
        let stmt = statement(
            "INSERT INTO t SELECT * FROM s PARTITIONBY a., `b.` CLUSTERBY c. INTO 2 BUCKETS",
        );
        let Clause::PartitionBy(names) = &stmt.clauses[0].node else {
            panic!("expected partitions");
        };
        assert!(names[0].dangling);
        assert_eq!(names[0].name.node, "a.");
        assert!(!names[1].dangling);
        assert_eq!(names[1].name.node, "b.");
        let Clause::Bucketing { names, .. } = &stmt.clauses[1].node else {
            panic!("expected bucketing");
        };
        assert!(names[0].dangling);
    }

    #[test]
    fn test_dangling_source_and_target_fail() {
        assert!(matches!(
            error("INSERT INTO t. SELECT * FROM s"),
            ParseError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            error("INSERT INTO t SELECT * FROM s. BATCH = 1"),
            ParseError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            error("SELECT * FROM s."),
            ParseError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_clause_order_is_free() {
        let stmt = statement("INSERT INTO t SELECT * FROM s AUTOCREATE BATCH = 10 PK a LIMIT 5;");
        let keywords: Vec<_> = stmt.clauses.iter().map(|c| c.node.keyword()).collect();
        assert_eq!(keywords, vec!["AUTOCREATE", "BATCH", "PK", "LIMIT"]);
    }

    #[test]
    fn test_timestamp_call() {
        let stmt = statement("INSERT INTO t SELECT * FROM s WITHTIMESTAMP sys_time()");
        match &stmt.clauses[0].node {
            Clause::Timestamp { value, call } => {
                assert_eq!(value.name.node, "sys_time");
                assert!(!value.dangling);
                assert!(*call);
            }
            other => panic!("unexpected clause {:?}", other),
        }
    }

    #[test]
    fn test_tag_markers() {
        let stmt = statement("INSERT INTO t SELECT * FROM s WITHTAG (a, b = 1, c.d as e)");
        let Clause::Tags(tags) = &stmt.clauses[0].node else {
            panic!("expected tags");
        };
        assert_eq!(tags.len(), 3);
        assert!(tags[0].marker.is_none());
        assert_eq!(tags[1].marker.as_ref().unwrap().node, "=");
        assert_eq!(tags[2].key.node, "c.d");
        assert_eq!(tags[2].marker.as_ref().unwrap().node, "as");
        assert_eq!(tags[2].value.as_ref().unwrap().node, "e");
    }

    #[test]
    fn test_bucketing_parts_are_optional() {
        let stmt = statement("INSERT INTO t SELECT * FROM s CLUSTERBY INTO 2 BUCKETS");
        match &stmt.clauses[0].node {
            Clause::Bucketing { names, count } => {
                assert!(names.is_empty());
                assert_eq!(count.as_ref().unwrap().node, "2");
            }
            other => panic!("unexpected clause {:?}", other),
        }
    }

    #[test]
    fn test_empty_storeas_parameters_fail() {
        assert!(matches!(
            error("INSERT INTO t SELECT * FROM s STOREAS `x` ()"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_missing_source_is_eof() {
        assert!(matches!(
            error("INSERT INTO t SELECT * FROM"),
            ParseError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_verb_requires_into() {
        assert!(matches!(
            error("INSERT t SELECT * FROM s"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_unknown_clause() {
        let err = error("INSERT INTO t SELECT * FROM s BOGUS");
        assert!(err.to_string().contains("a clause keyword"));
    }
}
