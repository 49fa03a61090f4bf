//! Validation rules for multiple selections
//!
//! Rules are exposed in the framework's string form (`array`, `min:1`,
//! `max:5`) and can also be checked directly against a selection count.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
	/// At least one value must be selected
	Required,
	/// The submitted value must be a list
	Array,
	/// Minimum number of selected values
	Min(usize),
	/// Maximum number of selected values
	Max(usize),
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Required => f.write_str("required"),
			Self::Array => f.write_str("array"),
			Self::Min(n) => write!(f, "min:{}", n),
			Self::Max(n) => write!(f, "max:{}", n),
		}
	}
}

/// A failed rule with its field-level message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
	pub rule: Rule,
	pub message: String,
}

/// Check a selection count against a rule set.
///
/// `Array` always holds for parsed selections. An empty, optional selection
/// skips the bound checks.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::rules::{Rule, validate_selection};
///
/// let rules = [Rule::Array, Rule::Min(2), Rule::Max(3)];
///
/// assert!(validate_selection(&rules, 2).is_empty());
/// assert_eq!(validate_selection(&rules, 4)[0].rule, Rule::Max(3));
/// assert_eq!(validate_selection(&rules, 1)[0].message, "Select at least 2 items.");
/// ```
pub fn validate_selection(rules: &[Rule], count: usize) -> Vec<RuleViolation> {
	let required = rules.contains(&Rule::Required);
	if count == 0 && !required {
		return Vec::new();
	}

	rules
		.iter()
		.filter_map(|rule| {
			let message = match *rule {
				Rule::Required if count == 0 => "This field is required.".to_string(),
				Rule::Min(min) if count < min => format!("Select at least {} {}.", min, items(min)),
				Rule::Max(max) if count > max => format!("Select at most {} {}.", max, items(max)),
				_ => return None,
			};
			Some(RuleViolation {
				rule: *rule,
				message,
			})
		})
		.collect()
}

fn items(n: usize) -> &'static str {
	if n == 1 { "item" } else { "items" }
}
