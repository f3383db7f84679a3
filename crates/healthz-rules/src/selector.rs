//! Label selectors parsed from `key=value,key=value` query strings.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separator between selector items.
const ITEM_SEPARATOR: char = ',';

/// Separator between a key and its value.
const PAIR_SEPARATOR: char = '=';

/// A set of required `key=value` label constraints.
///
/// An empty selector matches every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    labels: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a selector from a comma-separated query.
    ///
    /// Parsing is lenient and never fails. Items that do not split on `=`
    /// into exactly a non-empty key and a non-empty value are dropped, and
    /// the remaining items still apply. Keys and values are taken verbatim
    /// (no trimming). A repeated key keeps its last value.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut labels = BTreeMap::new();

        for item in query.split(ITEM_SEPARATOR) {
            let mut parts = item.split(PAIR_SEPARATOR);
            if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
                if !key.is_empty() && !value.is_empty() {
                    labels.insert(key.to_string(), value.to_string());
                }
            }
        }

        Self { labels }
    }

    /// Adds a required label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns true if the label set satisfies every constraint.
    ///
    /// A key that is absent, or present with another value, fails the match.
    #[must_use]
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        if self.is_empty() {
            return true;
        }

        self.labels
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }

    /// Returns the required value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Returns true if the selector has no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Iterates constraints in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for LabelSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "{ITEM_SEPARATOR}")?;
            }
            write!(f, "{key}{PAIR_SEPARATOR}{value}")?;
        }
        Ok(())
    }
}
