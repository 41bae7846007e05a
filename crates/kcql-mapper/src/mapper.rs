//! Batch mapping of statements into a source/target table

use std::collections::HashSet;

use kcql_ast::Query;
use kcql_parser::{parse, KcqlError, Role, SemanticError};
use tracing::{debug, info, warn};

use crate::{AnyName, NamePolicy, StatementSplitter, Terminated};

/// Parses a batch of statements and checks them against each other
///
/// ```ignore
/// let table = Mapper::new()
///     .with_name_policy(NamePattern::topic_names())
///     .map("INSERT INTO a SELECT * FROM t1; INSERT INTO b SELECT * FROM t2")?;
/// ```
pub struct Mapper {
    splitter: Box<dyn StatementSplitter + Send + Sync>,
    policy: Box<dyn NamePolicy + Send + Sync>,
}

impl Mapper {
    pub fn new() -> Self {
        Self {
            splitter: Box::new(Terminated::default()),
            policy: Box::new(AnyName),
        }
    }

    pub fn with_splitter(mut self, splitter: impl StatementSplitter + Send + Sync + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    pub fn with_name_policy(mut self, policy: impl NamePolicy + Send + Sync + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn map(&self, text: &str) -> Result<MappingTable, KcqlError> {
        let mut sources = HashSet::new();
        let mut targets = HashSet::new();
        let mut queries = Vec::new();

        for (index, (offset, statement)) in self.splitter.split(text).into_iter().enumerate() {
            let query = self
                .map_one(statement, &mut sources, &mut targets)
                .map_err(|err| {
                    warn!(index, error = %err, "rejected statement");
                    err.in_statement(index, offset)
                })?;
            debug!(index, source = %query.source, "mapped statement");
            queries.push(query);
        }

        info!(statements = queries.len(), "mapping complete");
        Ok(MappingTable { queries })
    }

    fn map_one(
        &self,
        statement: &str,
        sources: &mut HashSet<String>,
        targets: &mut HashSet<String>,
    ) -> Result<Query, KcqlError> {
        let query = parse(statement)?;

        self.admit(Role::Source, &query.source, sources)?;
        if let Some(target) = &query.target {
            self.admit(Role::Target, target, targets)?;
        }

        Ok(query)
    }

    fn admit(
        &self,
        role: Role,
        name: &str,
        seen: &mut HashSet<String>,
    ) -> Result<(), SemanticError> {
        self.policy
            .check(role, name)
            .map_err(|reason| SemanticError::InvalidName {
                role,
                name: name.to_string(),
                reason,
            })?;

        if !seen.insert(name.to_string()) {
            return Err(SemanticError::DuplicateMapping {
                role,
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

/// The statements of a batch, in the order they were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    queries: Vec<Query>,
}

impl MappingTable {
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn into_queries(self) -> Vec<Query> {
        self.queries
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// The query reading from `source`
    pub fn query_for(&self, source: &str) -> Option<&Query> {
        self.queries.iter().find(|q| q.source == source)
    }

    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.query_for(source).and_then(|q| q.target.as_deref())
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.source.as_str())
    }

    /// `(source, target)` pairs of every statement that names a target
    pub fn inputs_to_outputs(&self) -> Vec<(&str, &str)> {
        self.queries
            .iter()
            .filter_map(|q| q.target.as_deref().map(|t| (q.source.as_str(), t)))
            .collect()
    }
}

/// Split `text` on `;` and parse every statement, without cross-checks
pub fn parse_multiple(text: &str) -> Result<Vec<Query>, KcqlError> {
    Terminated::default()
        .split(text)
        .into_iter()
        .enumerate()
        .map(|(index, (offset, statement))| {
            parse(statement).map_err(|err| err.in_statement(index, offset))
        })
        .collect()
}

/// Reject a query whose `PROPERTIES` use keys outside `allowed`
pub fn check_properties(query: &Query, allowed: &[&str]) -> Result<(), SemanticError> {
    let names: Vec<String> = query
        .properties
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect();

    if names.is_empty() {
        return Ok(());
    }
    Err(SemanticError::UnsupportedProperties {
        names,
        allowed: allowed.iter().map(|a| a.to_string()).collect(),
    })
}
