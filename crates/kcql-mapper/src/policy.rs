//! Name checks applied to every source and target

use regex::Regex;

use kcql_parser::Role;

/// Decides whether a source or target name is acceptable
///
/// Returns the reason for a rejection.
pub trait NamePolicy {
    fn check(&self, role: Role, name: &str) -> Result<(), String>;
}

/// Accept every name
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyName;

impl NamePolicy for AnyName {
    fn check(&self, _role: Role, _name: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Names must match a regular expression
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: Regex,
}

impl NamePattern {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Kafka topic names: word characters, `-`, `_` and `.`
    pub fn topic_names() -> Self {
        Self::new(Regex::new(r"^[\w][\w\-\_\.]*$").expect("topic name pattern is valid"))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl NamePolicy for NamePattern {
    fn check(&self, _role: Role, name: &str) -> Result<(), String> {
        if self.pattern.is_match(name) {
            Ok(())
        } else {
            Err(format!("does not match {}", self.pattern.as_str()))
        }
    }
}

impl<F> NamePolicy for F
where
    F: Fn(Role, &str) -> bool,
{
    fn check(&self, role: Role, name: &str) -> Result<(), String> {
        if self(role, name) {
            Ok(())
        } else {
            Err("rejected by name policy".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        let policy = NamePattern::topic_names();
        assert!(policy.check(Role::Source, "orders.v1-eu_west").is_ok());
        assert!(policy.check(Role::Source, "-orders").is_err());
        assert!(policy.check(Role::Target, "a/b").is_err());
    }

    #[test]
    fn test_closure_policy() {
        let policy = |role: Role, name: &str| role == Role::Target || name.starts_with("in_");
        assert!(policy.check(Role::Source, "in_a").is_ok());
        assert!(policy.check(Role::Source, "a").is_err());
        assert!(policy.check(Role::Target, "anything").is_ok());
    }
}
