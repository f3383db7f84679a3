//! Health verdicts and their JSON response body.

use serde::{Deserialize, Serialize};

/// Reported health state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// No selected rule is firing.
    Healthy,
    /// At least one selected rule is firing.
    Unhealthy,
}

impl HealthState {
    /// Returns the state as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthVerdict {
    /// No matching firing rules.
    Healthy,
    /// Names of the matching firing rules, never empty.
    Unhealthy(Vec<String>),
}

impl HealthVerdict {
    /// Builds a verdict from the filtered rule names.
    #[must_use]
    pub fn from_rules(rules: Vec<String>) -> Self {
        if rules.is_empty() {
            Self::Healthy
        } else {
            Self::Unhealthy(rules)
        }
    }

    /// Returns true for [`HealthVerdict::Healthy`].
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns the reported state.
    #[must_use]
    pub const fn state(&self) -> HealthState {
        match self {
            Self::Healthy => HealthState::Healthy,
            Self::Unhealthy(_) => HealthState::Unhealthy,
        }
    }

    /// Returns the offending rule names (empty when healthy).
    #[must_use]
    pub fn rules(&self) -> &[String] {
        match self {
            Self::Healthy => &[],
            Self::Unhealthy(rules) => rules,
        }
    }
}

impl From<Vec<String>> for HealthVerdict {
    fn from(rules: Vec<String>) -> Self {
        Self::from_rules(rules)
    }
}

/// JSON body returned by the health endpoint.
///
/// `rules` is serialised as `null` when healthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Reported state.
    pub state: HealthState,
    /// Offending rule names.
    pub rules: Option<Vec<String>>,
}

impl From<HealthVerdict> for HealthResponse {
    fn from(verdict: HealthVerdict) -> Self {
        match verdict {
            HealthVerdict::Healthy => Self {
                state: HealthState::Healthy,
                rules: None,
            },
            HealthVerdict::Unhealthy(rules) => Self {
                state: HealthState::Unhealthy,
                rules: Some(rules),
            },
        }
    }
}
