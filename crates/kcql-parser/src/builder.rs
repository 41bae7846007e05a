//! Folds a syntax tree into a validated [`Query`]
//!
//! The builder owns every piece of transient state a parse needs, including
//! the nested path buffer. A new builder is made for each statement.

use std::collections::HashSet;

use kcql_ast::*;
use tracing::trace;

use crate::SemanticError;

const INTEGER: &str = "an integer";
const LONG: &str = "a long";

/// Which list a column reference contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Select,
    Ignore,
}

pub struct QueryBuilder {
    query: Query,
    /// Path segments of the column currently being resolved
    path: Vec<String>,
    seen: HashSet<&'static str>,
}

impl QueryBuilder {
    pub fn new(statement: &str) -> Self {
        Self {
            query: Query {
                statement: statement.to_string(),
                ..Query::default()
            },
            path: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn build(mut self, statement: Statement) -> Result<Query, SemanticError> {
        self.query.write_mode = statement.verb.map(|verb| verb.node);
        self.query.target = statement.target.map(|target| target.node);
        self.query.source = statement.source.node;

        for column in &statement.columns {
            self.add_column(column, Target::Select)?;
        }

        for clause in statement.clauses {
            self.apply(clause)?;
        }

        Ok(self.query)
    }

    // === Columns ===

    fn enter_column(&mut self) {
        self.path.clear();
    }

    fn push_segment(&mut self, segment: &str) {
        self.path.push(segment.to_string());
    }

    /// Take the buffered path: the last segment is the name, the rest its parents
    fn exit_column(&mut self) -> Option<(String, Vec<String>)> {
        let mut parents = std::mem::take(&mut self.path);
        let name = parents.pop()?;
        Some((name, parents))
    }

    fn resolve(&mut self, column: &ColumnRef) -> Result<(String, Vec<String>), SemanticError> {
        if column.dangling {
            return Err(SemanticError::UnterminatedPath {
                path: format!("{}.", column.segments.join(".")),
                span: column.span,
            });
        }

        self.enter_column();
        for segment in &column.segments {
            self.push_segment(segment);
        }
        self.exit_column().ok_or(SemanticError::BlankName {
            clause: "SELECT",
            span: column.span,
        })
    }

    fn add_column(&mut self, column: &ColumnRef, target: Target) -> Result<(), SemanticError> {
        let (name, mut parents) = self.resolve(column)?;
        let alias = column.alias.clone().unwrap_or_else(|| name.clone());

        if target == Target::Ignore {
            let field = Field::new(name, parents).with_alias(alias);
            return push_unique(&mut self.query.ignored_fields, field, "Ignored field", column.span);
        }

        let field_type = match parents.first().map(String::as_str) {
            Some(KEY_MARKER) => FieldType::Key,
            Some(HEADER_MARKER) => FieldType::Header,
            _ => FieldType::Value,
        };
        if field_type != FieldType::Value {
            parents.remove(0);
        }

        let field = Field::new(name, parents)
            .with_alias(alias)
            .with_type(field_type);
        match field_type {
            FieldType::Value => push_unique(&mut self.query.fields, field, "Field", column.span),
            FieldType::Key => push_unique(&mut self.query.key_fields, field, "Key field", column.span),
            FieldType::Header => {
                push_unique(&mut self.query.header_fields, field, "Header field", column.span)
            }
        }
    }

    // === Clauses ===

    fn apply(&mut self, clause: Spanned<Clause>) -> Result<(), SemanticError> {
        let keyword = clause.node.keyword();
        trace!(clause = keyword, "applying clause");
        if !self.seen.insert(keyword) {
            return Err(SemanticError::RepeatedClause {
                clause: keyword,
                span: clause.span,
            });
        }

        let span = clause.span;
        match clause.node {
            Clause::PrimaryKey(columns) => {
                for column in &columns {
                    let (name, parents) = self.resolve(column)?;
                    self.query.primary_keys.push(Field::new(name, parents));
                }
            }
            Clause::Ignore(columns) => {
                for column in &columns {
                    self.add_column(column, Target::Ignore)?;
                }
            }
            Clause::AutoCreate => self.query.auto_create = true,
            Clause::AutoEvolve => self.query.auto_evolve = true,
            Clause::Capitalize => self.query.capitalize = true,
            Clause::WithStructure => self.query.retain_structure = true,
            Clause::Unwrap => self.query.unwrapping = true,
            Clause::Initialize => self.query.initialize = true,
            Clause::Overwrite => self.query.with_overwrite = true,
            Clause::Ack => self.query.with_ack = true,
            Clause::EncodeBase64 => self.query.with_encode_base64 = true,

            Clause::Batch(value) => self.query.batch_size = Some(positive_int("BATCH", &value)?),
            Clause::Limit(value) => self.query.limit = Some(positive_int("LIMIT", &value)?),
            Clause::ProjectTo(value) => {
                self.query.project_to = Some(positive_int("PROJECTTO", &value)?)
            }
            Clause::Delay(value) => self.query.with_delay = Some(positive_int("WITHDELAY", &value)?),
            Clause::LockTime(value) => {
                self.query.with_lock_time = Some(positive_int("WITH_LOCK_TIME", &value)?)
            }
            Clause::Ttl(value) => self.query.ttl = Some(positive_long("TTL", &value)?),
            Clause::FlushInterval(value) => {
                self.query.flush_interval = Some(positive_long("WITH_FLUSH_INTERVAL", &value)?)
            }
            Clause::FlushSize(value) => {
                self.query.flush_size = Some(positive_long("WITH_FLUSH_SIZE", &value)?)
            }
            Clause::FlushCount(value) => {
                self.query.flush_count = Some(positive_long("WITH_FLUSH_COUNT", &value)?)
            }

            Clause::PartitionBy(names) => {
                self.query.partition_by = unique_names("PARTITIONBY", paths(names)?)?;
            }
            Clause::Bucketing { names, count } => {
                if names.is_empty() {
                    return Err(SemanticError::MissingBucketNames {
                        clause: keyword,
                        span,
                    });
                }
                let count = count.ok_or(SemanticError::MissingBucketCount {
                    clause: keyword,
                    span,
                })?;
                self.query.bucketing = Some(Bucketing {
                    bucket_names: unique_names(keyword, paths(names)?)?,
                    bucket_count: positive_int("BUCKETS", &count)?,
                });
            }
            Clause::StoreAs {
                type_name,
                parameters,
            } => {
                self.query.stored_as = Some(type_name.node);
                for parameter in parameters {
                    let name = parameter.name.node;
                    if self
                        .query
                        .stored_as_parameters
                        .keys()
                        .any(|existing| existing.eq_ignore_ascii_case(&name))
                    {
                        return Err(SemanticError::DuplicateStoreAsParameter {
                            name,
                            span: parameter.name.span,
                        });
                    }
                    self.query
                        .stored_as_parameters
                        .insert(name, parameter.value.node);
                }
            }
            Clause::Properties(assignments) => {
                for assignment in assignments {
                    let name = assignment.name.node;
                    if self.query.properties.contains_key(&name) {
                        return Err(SemanticError::DuplicateProperty {
                            name,
                            span: assignment.name.span,
                        });
                    }
                    self.query.properties.insert(name, assignment.value.node);
                }
            }

            Clause::Format(value) => self.query.format_type = Some(lookup(&value)?),
            Clause::Compression(value) => self.query.with_compression = Some(lookup(&value)?),
            Clause::SchemaEvolution(value) => {
                self.query.with_schema_evolution = Some(lookup(&value)?)
            }
            Clause::Partitioning(value) => self.query.with_partitioning = Some(lookup(&value)?),
            Clause::TimestampUnit(value) => self.query.timestamp_unit = lookup(&value)?,
            Clause::Timestamp { value, call } => {
                self.query.timestamp = Some(timestamp(path(value)?, call)?);
            }

            Clause::Tags(defs) => {
                let mut tags = Vec::with_capacity(defs.len());
                for def in defs {
                    tags.push(tag(def)?);
                }
                if !tags.is_empty() {
                    self.query.tags = Some(tags);
                }
            }
            Clause::WithKeys(keys) => {
                self.query.with_keys = Some(keys.into_iter().map(|k| k.node).collect());
            }
            Clause::KeyDelimiter(value) => {
                if value.node.trim().is_empty() {
                    return Err(SemanticError::BlankKeyDelimiter { span: value.span });
                }
                self.query.key_delimiter = value.node;
            }

            Clause::WithType(value) => self.query.with_type = Some(value.node),
            Clause::Converter(value) => self.query.with_converter = Some(value.node),
            Clause::JmsSelector(value) => self.query.with_jms_selector = Some(value.node),
            Clause::Regex(value) => self.query.with_regex = Some(value.node),
            Clause::Target(value) => self.query.dynamic_target = Some(value.node),
            Clause::Pipeline(value) => self.query.pipeline = Some(value.node),
            Clause::Partitioner(value) => self.query.with_partitioner = Some(value.node),
            Clause::Subscription(value) => self.query.with_subscription = Some(value.node),
            Clause::Session(value) => self.query.with_session = Some(value.node),
            Clause::TableLocation(value) => self.query.with_table_location = Some(value.node),
            Clause::DocType(value) => self.query.doc_type = Some(value.node),
            Clause::IndexSuffix(value) => self.query.index_suffix = Some(value.node),
            Clause::IncrementalMode(value) => self.query.incremental_mode = Some(value.node),
        }

        Ok(())
    }
}

fn push_unique(
    list: &mut Vec<Field>,
    field: Field,
    kind: &'static str,
    span: Span,
) -> Result<(), SemanticError> {
    if list.iter().any(|existing| existing.is_duplicate_of(&field)) {
        return Err(SemanticError::DuplicateField {
            list: kind,
            field: field.to_string(),
            span,
        });
    }
    list.push(field);
    Ok(())
}

fn path(path: PathRef) -> Result<Spanned<String>, SemanticError> {
    if path.dangling {
        return Err(SemanticError::UnterminatedPath {
            path: path.name.node,
            span: path.name.span,
        });
    }
    Ok(path.name)
}

fn paths(paths: Vec<PathRef>) -> Result<Vec<Spanned<String>>, SemanticError> {
    paths.into_iter().map(path).collect()
}

fn unique_names(
    clause: &'static str,
    names: Vec<Spanned<String>>,
) -> Result<Vec<String>, SemanticError> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if name.node.trim().is_empty() {
            return Err(SemanticError::BlankName {
                clause,
                span: name.span,
            });
        }
        if out.iter().any(|n| n.eq_ignore_ascii_case(&name.node)) {
            return Err(SemanticError::DuplicateName {
                clause,
                name: name.node,
                span: name.span,
            });
        }
        out.push(name.node);
    }
    Ok(out)
}

fn positive_int(clause: &'static str, value: &Spanned<String>) -> Result<u32, SemanticError> {
    match value.node.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n as u32),
        _ => Err(SemanticError::InvalidNumber {
            clause,
            value: value.node.clone(),
            expected: INTEGER,
            span: value.span,
        }),
    }
}

fn positive_long(clause: &'static str, value: &Spanned<String>) -> Result<u64, SemanticError> {
    match value.node.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as u64),
        _ => Err(SemanticError::InvalidNumber {
            clause,
            value: value.node.clone(),
            expected: LONG,
            span: value.span,
        }),
    }
}

fn lookup<V: Vocabulary>(value: &Spanned<String>) -> Result<V, SemanticError> {
    V::lookup(&value.node).map_err(|source| SemanticError::UnknownValue {
        source,
        span: value.span,
    })
}

fn timestamp(value: Spanned<String>, call: bool) -> Result<Timestamp, SemanticError> {
    if call {
        if value.node.eq_ignore_ascii_case("sys_time") {
            return Ok(Timestamp::SystemTime);
        }
        return Err(SemanticError::UnsupportedTimestampFunction {
            name: format!("{}()", value.node),
            span: value.span,
        });
    }
    if value.node.eq_ignore_ascii_case(SYSTEM_TIME) {
        return Ok(Timestamp::SystemTime);
    }
    Ok(Timestamp::Field(value.node))
}

fn tag(def: TagDef) -> Result<Tag, SemanticError> {
    let key = def.key.node;
    if key.trim().ends_with('.') {
        return Err(SemanticError::TagEndsWithDot {
            key,
            span: def.key.span,
        });
    }

    let tag_type = match (&def.marker, &def.value) {
        (None, _) => TagType::Default,
        (Some(marker), Some(_)) if marker.node == "=" => TagType::Constant,
        (Some(marker), Some(_)) if marker.node.eq_ignore_ascii_case("as") => TagType::Alias,
        (Some(marker), value) => {
            let mut text = format!("{} {}", key, marker.node);
            if let Some(value) = value {
                text.push(' ');
                text.push_str(&value.node);
            }
            return Err(SemanticError::InvalidTag {
                text,
                span: def.span,
            });
        }
    };

    Ok(Tag {
        key,
        value: def.value.map(|value| value.node),
        tag_type,
    })
}
