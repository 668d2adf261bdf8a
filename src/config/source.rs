use crate::error::ExtractIssue;
use std::collections::HashMap;
use std::str::FromStr;

/// Outcome of looking a key up in a [`ConfigSource`].
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
	/// The key is absent (or explicitly null).
	Missing,
	/// The key is present and has the requested shape.
	Found(T),
	/// The key is present but holds something of a different shape.
	Mismatch {
		expected: &'static str,
		found: &'static str,
	},
}

/// A value handed back by a collection extractor.
///
/// `value` is always usable. `issue` is set when the source held something
/// malformed and the default was substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
	pub value: T,
	pub issue: Option<ExtractIssue>,
}

impl<T> Extracted<T> {
	pub fn clean(value: T) -> Self {
		Self { value, issue: None }
	}

	pub fn degraded(value: T, issue: ExtractIssue) -> Self {
		tracing::warn!("{issue}, using default");
		Self {
			value,
			issue: Some(issue),
		}
	}

	/// False when the default was substituted because of a malformed source.
	pub fn ok(&self) -> bool {
		self.issue.is_none()
	}
}

/// Parse a boolean configuration token.
///
/// Accepts `true`/`yes`/`1` and `false`/`no`/`0`, case-insensitively.
pub fn parse_bool_token(token: &str) -> Option<bool> {
	match token.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "1" => Some(true),
		"false" | "no" | "0" => Some(false),
		_ => None,
	}
}

/// Return `default` when `value` is empty.
///
/// Guards user configuration converted from older versions, which stored keys
/// with literal empty values.
pub fn non_empty_or(key: &str, value: &str, default: &str) -> String {
	if value.is_empty() {
		tracing::debug!(key, default, "empty value replaced with default");
		return default.to_string();
	}
	value.to_string()
}

/// A configuration document that can be queried by key.
///
/// Implementors only provide the three raw probes. The typed extractors are
/// shared, so every format applies the same defaulting policy.
pub trait ConfigSource {
	/// Look up a single scalar value.
	fn scalar_at(&self, key: &str) -> Probe<String>;

	/// Look up an ordered list of scalars.
	fn sequence_at(&self, key: &str) -> Probe<Vec<String>>;

	/// Look up an ordered list of key/value pairs.
	fn mapping_at(&self, key: &str) -> Probe<Vec<(String, String)>>;

	fn bool_at(&self, key: &str, missing: bool) -> bool {
		match self.scalar_at(key) {
			Probe::Found(raw) => parse_bool_token(&raw).unwrap_or(missing),
			_ => missing,
		}
	}

	/// Extract a number of any width. Text that does not parse, including
	/// values out of range for `T`, yields `missing`.
	fn number_at<T: FromStr>(&self, key: &str, missing: T) -> T
	where
		Self: Sized,
	{
		match self.scalar_at(key) {
			Probe::Found(raw) => raw.trim().parse().unwrap_or(missing),
			_ => missing,
		}
	}

	fn string_at(&self, key: &str, missing: &str, non_empty: bool) -> String {
		match self.scalar_at(key) {
			Probe::Found(raw) if non_empty => non_empty_or(key, &raw, missing),
			Probe::Found(raw) => raw,
			_ => missing.to_string(),
		}
	}

	fn list_at(&self, key: &str, missing: Vec<String>) -> Extracted<Vec<String>> {
		match self.sequence_at(key) {
			Probe::Found(items) => Extracted::clean(items),
			Probe::Missing => Extracted::clean(missing),
			Probe::Mismatch { expected, found } => Extracted::degraded(
				missing,
				ExtractIssue::StructuralMismatch {
					key: key.to_string(),
					expected,
					found,
				},
			),
		}
	}

	fn string_map_at(
		&self,
		key: &str,
		missing: HashMap<String, String>,
	) -> Extracted<HashMap<String, String>> {
		match self.mapping_at(key) {
			Probe::Found(pairs) => Extracted::clean(pairs.into_iter().collect()),
			Probe::Missing => Extracted::clean(missing),
			Probe::Mismatch { expected, found } => Extracted::degraded(
				missing,
				ExtractIssue::StructuralMismatch {
					key: key.to_string(),
					expected,
					found,
				},
			),
		}
	}
}
