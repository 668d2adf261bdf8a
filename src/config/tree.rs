//! Extraction from parsed YAML trees.
//!
//! `serde_yaml::Value` is the tree. A `null` value is treated exactly like an
//! absent key, so `key:` with nothing after it falls back to the default.

use crate::config::source::{ConfigSource, Extracted, Probe};
use crate::error::ExtractIssue;
use serde_yaml::Value;
use std::collections::HashMap;

/// A scalar of unknown type, as stored in a free-form YAML mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
}

/// Name of a node's shape, for diagnostics.
pub fn shape_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Sequence(_) => "sequence",
		Value::Mapping(_) => "mapping",
		Value::Tagged(tagged) => shape_of(&tagged.value),
	}
}

/// Convert a scalar node to text. Collections yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::Null => Some(String::new()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => Some(n.to_string()),
		Value::String(s) => Some(s.clone()),
		Value::Tagged(tagged) => scalar_text(&tagged.value),
		Value::Sequence(_) | Value::Mapping(_) => None,
	}
}

fn scalar_value(value: &Value) -> Option<ScalarValue> {
	match value {
		Value::Null => Some(ScalarValue::Null),
		Value::Bool(b) => Some(ScalarValue::Bool(*b)),
		Value::Number(n) => Some(match n.as_i64() {
			Some(i) => ScalarValue::Int(i),
			None => ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN)),
		}),
		Value::String(s) => Some(ScalarValue::Text(s.clone())),
		Value::Tagged(tagged) => scalar_value(&tagged.value),
		Value::Sequence(_) | Value::Mapping(_) => None,
	}
}

/// The child at `key`, with `null` folded into absence.
fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
	node.get(key).filter(|v| !v.is_null())
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> ExtractIssue {
	ExtractIssue::StructuralMismatch {
		key: key.to_string(),
		expected,
		found: shape_of(found),
	}
}

fn sequence_texts(node: &Value) -> Probe<Vec<String>> {
	let Some(seq) = node.as_sequence() else {
		return Probe::Mismatch {
			expected: "sequence",
			found: shape_of(node),
		};
	};
	let mut items = Vec::with_capacity(seq.len());
	for item in seq {
		match scalar_text(item) {
			Some(text) => items.push(text),
			None => {
				return Probe::Mismatch {
					expected: "sequence of scalars",
					found: "nested collection",
				};
			}
		}
	}
	Probe::Found(items)
}

fn mapping_texts(node: &Value) -> Probe<Vec<(String, String)>> {
	let Some(map) = node.as_mapping() else {
		return Probe::Mismatch {
			expected: "mapping",
			found: shape_of(node),
		};
	};
	let mut pairs = Vec::with_capacity(map.len());
	for (k, v) in map {
		match (scalar_text(k), scalar_text(v)) {
			(Some(k), Some(v)) => pairs.push((k, v)),
			_ => {
				return Probe::Mismatch {
					expected: "mapping of scalars",
					found: "nested collection",
				};
			}
		}
	}
	Probe::Found(pairs)
}

/// [`ConfigSource`] view over a YAML node.
#[derive(Debug, Clone, Copy)]
pub struct TreeNodeSource<'a> {
	node: &'a Value,
}

impl<'a> TreeNodeSource<'a> {
	pub fn new(node: &'a Value) -> Self {
		Self { node }
	}
}

impl ConfigSource for TreeNodeSource<'_> {
	fn scalar_at(&self, key: &str) -> Probe<String> {
		match child(self.node, key) {
			None => Probe::Missing,
			Some(value) => match scalar_text(value) {
				Some(text) => Probe::Found(text),
				None => Probe::Mismatch {
					expected: "scalar",
					found: shape_of(value),
				},
			},
		}
	}

	fn sequence_at(&self, key: &str) -> Probe<Vec<String>> {
		match child(self.node, key) {
			None => Probe::Missing,
			Some(value) => sequence_texts(value),
		}
	}

	fn mapping_at(&self, key: &str) -> Probe<Vec<(String, String)>> {
		match child(self.node, key) {
			None => Probe::Missing,
			Some(value) => mapping_texts(value),
		}
	}
}

/// Read `node` itself as a list of strings.
pub fn string_list(node: &Value, missing: Vec<String>) -> Extracted<Vec<String>> {
	if node.is_null() {
		return Extracted::clean(missing);
	}
	match sequence_texts(node) {
		Probe::Found(items) => Extracted::clean(items),
		Probe::Missing => Extracted::clean(missing),
		Probe::Mismatch { expected, found } => Extracted::degraded(
			missing,
			ExtractIssue::StructuralMismatch {
				key: String::new(),
				expected,
				found,
			},
		),
	}
}

/// Read `node` itself as a string-to-string mapping.
pub fn string_hash(node: &Value) -> Extracted<HashMap<String, String>> {
	if node.is_null() {
		return Extracted::clean(HashMap::new());
	}
	match mapping_texts(node) {
		Probe::Found(pairs) => Extracted::clean(pairs.into_iter().collect()),
		Probe::Missing => Extracted::clean(HashMap::new()),
		Probe::Mismatch { expected, found } => Extracted::degraded(
			HashMap::new(),
			ExtractIssue::StructuralMismatch {
				key: String::new(),
				expected,
				found,
			},
		),
	}
}

/// Mapping of string to scalar of any type.
pub fn variant_map_at(
	node: &Value,
	key: &str,
	missing: HashMap<String, ScalarValue>,
) -> Extracted<HashMap<String, ScalarValue>> {
	let Some(value) = child(node, key) else {
		return Extracted::clean(missing);
	};
	let Some(map) = value.as_mapping() else {
		return Extracted::degraded(missing, mismatch(key, "mapping", value));
	};

	let mut out = HashMap::with_capacity(map.len());
	for (k, v) in map {
		match (scalar_text(k), scalar_value(v)) {
			(Some(k), Some(v)) => {
				out.insert(k, v);
			}
			_ => return Extracted::degraded(missing, mismatch(key, "mapping of scalars", v)),
		}
	}
	Extracted::clean(out)
}

/// Mapping of string to string-to-string mapping.
pub fn hash_of_hash_at(
	node: &Value,
	key: &str,
) -> Extracted<HashMap<String, HashMap<String, String>>> {
	let Some(value) = child(node, key) else {
		return Extracted::clean(HashMap::new());
	};
	let Some(map) = value.as_mapping() else {
		return Extracted::degraded(HashMap::new(), mismatch(key, "mapping", value));
	};

	let mut out = HashMap::with_capacity(map.len());
	for (k, v) in map {
		let Some(name) = scalar_text(k) else {
			return Extracted::degraded(HashMap::new(), mismatch(key, "scalar key", k));
		};
		match mapping_texts(v) {
			Probe::Found(pairs) => {
				out.insert(name, pairs.into_iter().collect());
			}
			_ => {
				return Extracted::degraded(
					HashMap::new(),
					ExtractIssue::MalformedEntry {
						key: key.to_string(),
						entry: name,
					},
				);
			}
		}
	}
	Extracted::clean(out)
}

/// Sequence of sequences of strings.
pub fn list_of_lists_at(node: &Value, key: &str) -> Extracted<Vec<Vec<String>>> {
	let Some(value) = child(node, key) else {
		return Extracted::clean(Vec::new());
	};
	let Some(seq) = value.as_sequence() else {
		return Extracted::degraded(Vec::new(), mismatch(key, "sequence", value));
	};

	let mut out = Vec::with_capacity(seq.len());
	for (index, item) in seq.iter().enumerate() {
		match sequence_texts(item) {
			Probe::Found(items) => out.push(items),
			_ => {
				return Extracted::degraded(
					Vec::new(),
					ExtractIssue::MalformedEntry {
						key: key.to_string(),
						entry: format!("item {index}"),
					},
				);
			}
		}
	}
	Extracted::clean(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn yaml(text: &str) -> Value {
		serde_yaml::from_str(text).unwrap()
	}

	const DOC: &str = r#"
enable: Yes
count: 42
negative: -5
ratio: 0.75
huge: 9000000000
name: Patrol
blank: ""
nothing:
users: [alice, bob, 3]
nested: [[a, b], [c]]
summaries:
  vandal: Reverted vandalism
  spam: Removed spam
props:
  flag: true
  size: 10
  weight: 1.5
  label: text
templates:
  en:
    uw-1: Level one
  de:
    uw-1: Stufe eins
"#;

	#[test]
	fn test_missing_key_returns_default() {
		let node = yaml(DOC);
		let src = TreeNodeSource::new(&node);
		assert!(src.bool_at("absent", true));
		assert_eq!(src.number_at::<i32>("absent", 9), 9);
		assert_eq!(src.string_at("absent", "d", false), "d");

		let list = src.list_at("absent", vec!["x".to_string()]);
		assert!(list.ok());
		assert_eq!(list.value, vec!["x"]);

		let strings = src.string_map_at("absent", HashMap::from([("k".to_string(), "v".to_string())]));
		assert!(strings.ok());
		assert_eq!(strings.value.get("k").map(String::as_str), Some("v"));

		let map = variant_map_at(&node, "absent", HashMap::new());
		assert!(map.ok());
		assert!(hash_of_hash_at(&node, "absent").ok());
		assert!(list_of_lists_at(&node, "absent").ok());
	}

	#[test]
	fn test_null_is_missing() {
		let node = yaml(DOC);
		let src = TreeNodeSource::new(&node);
		assert_eq!(src.string_at("nothing", "d", false), "d");
		assert!(src.list_at("nothing", Vec::new()).ok());
	}

	#[test]
	fn test_scalars() {
		let node = yaml(DOC);
		let src = TreeNodeSource::new(&node);
		// `Yes` is a plain string under YAML 1.2 and goes through the token rule.
		assert!(src.bool_at("enable", false));
		assert_eq!(src.number_at::<i32>("count", 0), 42);
		assert_eq!(src.number_at::<u32>("negative", 1), 1);
		assert_eq!(src.number_at::<i32>("huge", 7), 7);
		assert_eq!(src.number_at::<i64>("huge", 7), 9_000_000_000);
		assert_eq!(src.number_at::<f64>("ratio", 0.0), 0.75);
		assert_eq!(src.string_at("name", "", true), "Patrol");
		assert_eq!(src.string_at("blank", "d", true), "d");
		assert_eq!(src.string_at("blank", "d", false), "");
		assert_eq!(src.string_at("users", "d", false), "d");
	}

	#[test]
	fn test_string_list() {
		let node = yaml(DOC);
		let src = TreeNodeSource::new(&node);
		let users = src.list_at("users", Vec::new());
		assert!(users.ok());
		assert_eq!(users.value, vec!["alice", "bob", "3"]);

		let wrong = src.list_at("name", vec!["d".to_string()]);
		assert!(!wrong.ok());
		assert_eq!(wrong.value, vec!["d"]);

		let nested = src.list_at("nested", Vec::new());
		assert!(!nested.ok());
	}

	#[test]
	fn test_node_level_helpers() {
		let node = yaml(DOC);
		let users = string_list(&node["users"], Vec::new());
		assert_eq!(users.value.len(), 3);
		assert!(!string_list(&node["summaries"], Vec::new()).ok());

		let summaries = string_hash(&node["summaries"]);
		assert!(summaries.ok());
		assert_eq!(summaries.value["spam"], "Removed spam");
		assert!(!string_hash(&node["users"]).ok());
	}

	#[test]
	fn test_variant_map() {
		let node = yaml(DOC);
		let props = variant_map_at(&node, "props", HashMap::new());
		assert!(props.ok());
		assert_eq!(props.value["flag"], ScalarValue::Bool(true));
		assert_eq!(props.value["size"], ScalarValue::Int(10));
		assert_eq!(props.value["weight"], ScalarValue::Float(1.5));
		assert_eq!(props.value["label"], ScalarValue::Text("text".to_string()));

		let bad = variant_map_at(&node, "templates", HashMap::new());
		assert!(!bad.ok());
		assert!(bad.value.is_empty());
	}

	#[test]
	fn test_hash_of_hash() {
		let node = yaml(DOC);
		let templates = hash_of_hash_at(&node, "templates");
		assert!(templates.ok());
		assert_eq!(templates.value["de"]["uw-1"], "Stufe eins");

		let bad = hash_of_hash_at(&node, "summaries");
		assert!(!bad.ok());
		assert!(bad.value.is_empty());
	}

	#[test]
	fn test_list_of_lists() {
		let node = yaml(DOC);
		let nested = list_of_lists_at(&node, "nested");
		assert!(nested.ok());
		assert_eq!(nested.value, vec![vec!["a", "b"], vec!["c"]]);

		let bad = list_of_lists_at(&node, "users");
		assert!(!bad.ok());
	}
}
