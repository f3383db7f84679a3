//! Selection of firing rules from a rules snapshot.
//!
//! A rule is reported when its own labels satisfy the whole selector and at
//! least one of its alerts is firing. Alert labels are not consulted.

use tracing::trace;

use crate::selector::LabelSelector;
use crate::types::{Rule, RulesResponse};

impl Rule {
    /// Returns true if the rule's labels satisfy every selector constraint.
    #[must_use]
    pub fn matches(&self, selector: &LabelSelector) -> bool {
        selector.matches(&self.labels)
    }

    /// Returns true if any alert of this rule is firing.
    #[must_use]
    pub fn is_firing(&self) -> bool {
        self.alerts.iter().any(|alert| alert.state.is_firing())
    }
}

/// Returns the names of rules that match `selector` and are firing.
///
/// Names are returned in traversal order: groups in snapshot order, then
/// rules within each group. Each qualifying rule appears once.
#[must_use]
pub fn firing_rules(selector: &LabelSelector, snapshot: &RulesResponse) -> Vec<String> {
    snapshot
        .rules()
        .filter(|rule| {
            let selected = rule.matches(selector) && rule.is_firing();
            trace!(rule = %rule.name, selected, "evaluated rule");
            selected
        })
        .map(|rule| rule.name.clone())
        .collect()
}

/// Parses `query` into a selector and returns the matching firing rules.
///
/// An empty result means healthy.
#[must_use]
pub fn filter_firing_rules(query: &str, snapshot: &RulesResponse) -> Vec<String> {
    firing_rules(&LabelSelector::parse(query), snapshot)
}
