use std::fmt;
use std::str::FromStr;

use crate::core::schema;
use crate::domain::model::EntityKind;
use crate::utils::error::{FleetError, Result};

/// A dotted exclusion path such as `driver.vehicle`, parsed from the
/// caller-facing form `"-driver.vehicle"` (the leading `-` is optional).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RulePath {
    segments: Vec<String>,
}

impl RulePath {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('-').unwrap_or(trimmed);

        if body.is_empty() {
            return Err(FleetError::InvalidRulePath {
                path: raw.to_string(),
                reason: "path is empty".to_string(),
            });
        }

        let segments: Vec<String> = body.split('.').map(|s| s.to_string()).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(FleetError::InvalidRulePath {
                path: raw.to_string(),
                reason: "path contains an empty segment".to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the static schema from `root`; every segment must name a
    /// relationship of the type reached so far.
    pub fn validate_for(&self, root: EntityKind) -> Result<()> {
        let mut kind = root;
        for segment in &self.segments {
            match schema::relationship(kind, segment) {
                Some(rel) => kind = rel.target,
                None => {
                    return Err(FleetError::InvalidRulePath {
                        path: self.to_string(),
                        reason: format!("'{}' is not a relationship of {}", segment, kind),
                    })
                }
            }
        }
        Ok(())
    }
}

impl FromStr for RulePath {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self> {
        RulePath::parse(s)
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// The ordered, de-duplicated exclusion rules for one serialization call.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RulePath>,
}

impl RuleSet {
    pub fn new(rules: Vec<RulePath>) -> Self {
        let mut set = Self::default();
        for rule in rules {
            set.push(rule);
        }
        set
    }

    pub fn parse<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for item in raw {
            set.push(RulePath::parse(item.as_ref())?);
        }
        Ok(set)
    }

    pub fn push(&mut self, rule: RulePath) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    pub fn extend(&mut self, other: RuleSet) {
        for rule in other.rules {
            self.push(rule);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RulePath> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn validate_for(&self, root: EntityKind) -> Result<()> {
        for rule in &self.rules {
            rule.validate_for(root)?;
        }
        Ok(())
    }
}
