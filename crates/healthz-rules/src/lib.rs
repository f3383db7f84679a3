//! Firing-rule selection over Prometheus rule snapshots.
//!
//! `healthz-rules` decides whether a set of alerting rules, chosen by a label
//! selector, is currently firing. It is the pure core behind the
//! `prometheus-healthz` endpoint and does no I/O.
//!
//! # Features
//!
//! - **Label selectors**: Lenient `key=value,key=value` parsing
//! - **Rule matching**: All selector labels must match the rule's own labels
//! - **Firing check**: A rule fires when any of its alerts is in the `firing` state
//! - **Verdicts**: Healthy / unhealthy outcome with the offending rule names
//!
//! # Example
//!
//! ```rust
//! use healthz_rules::{
//!     filter_firing_rules, Alert, AlertState, HealthVerdict, Rule, RuleGroup, RulesResponse,
//! };
//!
//! let snapshot = RulesResponse::from_groups(vec![
//!     RuleGroup::new("cluster")
//!         .with_rule(
//!             Rule::new("NodeDown")
//!                 .with_label("type", "healthz")
//!                 .with_alert(Alert::new(AlertState::Firing)),
//!         )
//!         .with_rule(
//!             Rule::new("DiskFilling")
//!                 .with_label("type", "capacity")
//!                 .with_alert(Alert::new(AlertState::Firing)),
//!         ),
//! ]);
//!
//! let firing = filter_firing_rules("type=healthz", &snapshot);
//! assert_eq!(firing, vec!["NodeDown"]);
//!
//! let verdict = HealthVerdict::from_rules(firing);
//! assert!(!verdict.is_healthy());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod filter;
pub mod selector;
pub mod types;
pub mod verdict;

// Re-export main types at crate root
pub use error::{Result, RulesError};
pub use filter::{filter_firing_rules, firing_rules};
pub use selector::LabelSelector;
pub use types::{Alert, AlertState, Rule, RuleGroup, RulesData, RulesResponse};
pub use verdict::{HealthResponse, HealthState, HealthVerdict};
