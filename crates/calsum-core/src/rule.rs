//! Category rules: named title patterns in declaration order.
//!
//! A rule exists in two forms. The serialized form is what configuration
//! files carry (a name and a pattern string); the materialized form holds a
//! compiled pattern and is what the classifier runs. [`RuleForm`] holds
//! either and converts explicitly in both directions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::pattern::FullMatchPattern;

/// Built-in rules used when no configuration supplies any.
///
/// The interview rule skips placeholders prefixed `HOLD!` and preparation
/// sessions.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("interview", r"(?!HOLD!)(?!.*\b[pP]rep).*[iI]nterview.*"),
    ("debrief", r".*[dD]ebrief.*"),
];

/// On-disk representation of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedRule {
    pub name: String,
    pub pattern: String,
}

impl SerializedRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Compiles the pattern.
    pub fn materialize(&self) -> Result<CategoryRule, ConfigurationError> {
        CategoryRule::new(self.name.clone(), &self.pattern)
    }
}

/// A named category with a compiled full-title matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    name: String,
    matcher: FullMatchPattern,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigurationError::EmptyName {
                pattern: pattern.to_string(),
            });
        }
        let matcher =
            FullMatchPattern::new(pattern).map_err(|source| ConfigurationError::InvalidPattern {
                name: name.clone(),
                pattern: pattern.to_string(),
                source: Box::new(source),
            })?;
        Ok(Self { name, matcher })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn matcher(&self) -> &FullMatchPattern {
        &self.matcher
    }

    pub fn matches(&self, title: &str) -> bool {
        self.matcher.matches(title)
    }

    pub fn to_serialized(&self) -> SerializedRule {
        SerializedRule::new(self.name.clone(), self.matcher.as_str())
    }
}

/// A rule in either of its two representations.
#[derive(Debug, Clone)]
pub enum RuleForm {
    Serialized(SerializedRule),
    Materialized(CategoryRule),
}

impl RuleForm {
    pub fn name(&self) -> &str {
        match self {
            Self::Serialized(rule) => &rule.name,
            Self::Materialized(rule) => rule.name(),
        }
    }

    pub fn to_serialized(&self) -> SerializedRule {
        match self {
            Self::Serialized(rule) => rule.clone(),
            Self::Materialized(rule) => rule.to_serialized(),
        }
    }

    pub fn materialize(self) -> Result<CategoryRule, ConfigurationError> {
        match self {
            Self::Serialized(rule) => rule.materialize(),
            Self::Materialized(rule) => Ok(rule),
        }
    }
}

impl From<SerializedRule> for RuleForm {
    fn from(rule: SerializedRule) -> Self {
        Self::Serialized(rule)
    }
}

impl From<CategoryRule> for RuleForm {
    fn from(rule: CategoryRule) -> Self {
        Self::Materialized(rule)
    }
}

/// An ordered, name-unique set of category rules.
///
/// Declaration order decides which rule wins when several match a title,
/// and is the default display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name()) {
                return Err(ConfigurationError::DuplicateName {
                    name: rule.name().to_string(),
                });
            }
        }
        Ok(Self { rules })
    }

    pub fn from_forms(
        forms: impl IntoIterator<Item = RuleForm>,
    ) -> Result<Self, ConfigurationError> {
        let rules = forms
            .into_iter()
            .map(RuleForm::materialize)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules)
    }

    pub fn from_serialized(rules: &[SerializedRule]) -> Result<Self, ConfigurationError> {
        Self::from_forms(rules.iter().cloned().map(RuleForm::from))
    }

    /// The built-in rule set from [`DEFAULT_RULES`].
    pub fn builtin() -> Result<Self, ConfigurationError> {
        let rules: Vec<SerializedRule> = DEFAULT_RULES
            .iter()
            .map(|(name, pattern)| SerializedRule::new(*name, *pattern))
            .collect();
        Self::from_serialized(&rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(CategoryRule::name)
    }

    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Declaration index of the named rule.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name() == name)
    }

    /// The earliest-declared rule accepting `title`.
    pub fn first_match(&self, title: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.matches(title))
    }

    pub fn to_serialized(&self) -> Vec<SerializedRule> {
        self.rules.iter().map(CategoryRule::to_serialized).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a CategoryRule;
    type IntoIter = std::slice::Iter<'a, CategoryRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
