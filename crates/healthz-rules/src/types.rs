//! Rules snapshot types as served by the Prometheus `/api/v1/rules` endpoint.
//!
//! - [`RulesResponse`]: The top-level API envelope
//! - [`RuleGroup`]: A named, ordered group of rules
//! - [`Rule`]: A single rule with its labels and alert instances
//! - [`Alert`]: One alert instance and its [`AlertState`]
//!
//! The snapshot is read-only data; nothing in this crate mutates it after
//! decoding.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Envelope status reported by the upstream for a failed query.
const STATUS_ERROR: &str = "error";

/// Decodes an explicit `null` as the type's default.
///
/// Go-based backends serialise nil maps and slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The state of a single alert instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    /// The rule condition is false.
    Inactive,
    /// The condition is true but has not held for the rule's `for` duration.
    Pending,
    /// The condition is true and the alert is active.
    Firing,
}

impl AlertState {
    /// Returns the state as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Firing => "firing",
        }
    }

    /// Returns true if this is the firing state.
    #[must_use]
    pub const fn is_firing(&self) -> bool {
        matches!(self, Self::Firing)
    }
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An alert instance produced by evaluating a rule.
///
/// The alert's labels are distinct from its parent rule's labels and play no
/// part in selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Labels attached to this alert instance.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    /// Current state of the alert.
    pub state: AlertState,
}

impl Alert {
    /// Creates an alert in the given state with no labels.
    #[must_use]
    pub fn new(state: AlertState) -> Self {
        Self {
            labels: HashMap::new(),
            state,
        }
    }

    /// Adds a label to the alert.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// A single alerting or recording rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule name.
    pub name: String,
    /// Labels configured on the rule.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    /// Alert instances. Recording rules carry none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
    /// Evaluation health as reported upstream (`ok`, `err`, `unknown`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    /// Rule kind as reported upstream (`alerting` or `recording`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
}

impl Rule {
    /// Creates a rule with no labels and no alerts.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: HashMap::new(),
            alerts: Vec::new(),
            health: None,
            rule_type: None,
        }
    }

    /// Adds a label to the rule.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Appends an alert instance to the rule.
    #[must_use]
    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alerts.push(alert);
        self
    }
}

/// A named group of rules, in upstream evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    /// Group name.
    pub name: String,
    /// File the group was loaded from, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Rules in this group.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: None,
            rules: Vec::new(),
        }
    }

    /// Appends a rule to the group.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// The `data` member of a rules response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesData {
    /// Rule groups in snapshot order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<RuleGroup>,
}

/// A rules snapshot as returned by `GET /api/v1/rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesResponse {
    /// Envelope status (`success` or `error`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Snapshot payload.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: RulesData,
    /// Error class when `status` is `error`.
    #[serde(default, rename = "errorType", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Error message when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RulesResponse {
    /// Creates a successful snapshot from a list of groups.
    #[must_use]
    pub fn from_groups(groups: Vec<RuleGroup>) -> Self {
        Self {
            status: Some("success".to_string()),
            data: RulesData { groups },
            error_type: None,
            error: None,
        }
    }

    /// Decodes a snapshot from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RulesError::Decode`] if the body is not a valid rules response.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Returns false only when the upstream flagged the response as an error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() != Some(STATUS_ERROR)
    }

    /// Returns the groups in snapshot order.
    #[must_use]
    pub fn groups(&self) -> &[RuleGroup] {
        &self.data.groups
    }

    /// Iterates every rule, groups first and then rules within each group.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.data.groups.iter().flat_map(|group| group.rules.iter())
    }
}
