use crate::config::legacy::{LegacyText, LegacyTextSource};
use crate::config::source::{ConfigSource, Probe};
use crate::config::tree::{TreeNodeSource, scalar_text, shape_of};
use serde::Serialize;
use serde_yaml::Value;

/// Name given to a definition that does not carry one.
pub const UNNAMED_QUEUE: &str = "unnamed";

/// How a queue filter treats edits that have a given property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMatch {
	/// The property does not affect inclusion.
	#[default]
	Ignore,
	/// Only edits with the property are shown.
	Require,
	/// Edits with the property are hidden.
	Exclude,
}

impl FilterMatch {
	/// Parse `exclude`/`require`/`ignore`. Older configurations used booleans
	/// where true meant "filter out", so those are accepted too.
	pub fn parse(token: &str) -> Option<Self> {
		match token.trim().to_ascii_lowercase().as_str() {
			"exclude" | "true" | "yes" | "1" => Some(FilterMatch::Exclude),
			"require" => Some(FilterMatch::Require),
			"ignore" | "false" | "no" | "0" => Some(FilterMatch::Ignore),
			_ => None,
		}
	}
}

/// A queue filter definition.
///
/// Only the definition lives here; matching edits against it is done by the
/// queue itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct QueueFilter {
	pub name: String,
	pub description: String,
	/// Set for filters from built-in or project configuration, which the user
	/// cannot edit.
	pub locked: bool,
	pub ignored_users: FilterMatch,
	pub bots: FilterMatch,
	pub assisted: FilterMatch,
	pub anonymous: FilterMatch,
	pub registered: FilterMatch,
	pub new_pages: FilterMatch,
	pub own_edits: FilterMatch,
	pub minor: FilterMatch,
	pub reverts: FilterMatch,
	pub talk: FilterMatch,
	pub watched: FilterMatch,
	pub friends: FilterMatch,
	pub user_space: FilterMatch,
	/// Namespace ids shown by the queue; empty means all of them.
	pub namespaces: Vec<i32>,
	pub ignored_tags: Vec<String>,
	pub required_tags: Vec<String>,
}

impl Default for QueueFilter {
	fn default() -> Self {
		Self {
			name: UNNAMED_QUEUE.to_string(),
			description: String::new(),
			locked: false,
			ignored_users: FilterMatch::Exclude,
			bots: FilterMatch::Exclude,
			assisted: FilterMatch::Ignore,
			anonymous: FilterMatch::Ignore,
			registered: FilterMatch::Ignore,
			new_pages: FilterMatch::Ignore,
			own_edits: FilterMatch::Exclude,
			minor: FilterMatch::Ignore,
			reverts: FilterMatch::Ignore,
			talk: FilterMatch::Ignore,
			watched: FilterMatch::Ignore,
			friends: FilterMatch::Exclude,
			user_space: FilterMatch::Ignore,
			namespaces: Vec::new(),
			ignored_tags: Vec::new(),
			required_tags: Vec::new(),
		}
	}
}

impl QueueFilter {
	/// Build a filter from one definition, field by field. Anything missing
	/// or unreadable keeps the default.
	pub fn from_source(name: &str, source: &impl ConfigSource, locked: bool) -> Self {
		let d = QueueFilter::default();
		let m = |key: &str, default: FilterMatch| match source.scalar_at(key) {
			Probe::Found(raw) => FilterMatch::parse(&raw).unwrap_or_else(|| {
				tracing::warn!(queue = name, key, value = %raw, "unknown filter value");
				default
			}),
			_ => default,
		};

		let namespaces = source
			.list_at("namespaces", Vec::new())
			.value
			.iter()
			.filter_map(|ns| ns.trim().parse::<i32>().ok())
			.collect();

		Self {
			name: name.to_string(),
			description: source.string_at("description", "", false),
			locked,
			ignored_users: m("filter-ignored", d.ignored_users),
			bots: m("filter-bots", d.bots),
			assisted: m("filter-assisted", d.assisted),
			anonymous: m("filter-ip", d.anonymous),
			registered: m("filter-users", d.registered),
			new_pages: m("filter-new-pages", d.new_pages),
			own_edits: m("filter-me", d.own_edits),
			minor: m("filter-minor", d.minor),
			reverts: m("filter-reverts", d.reverts),
			talk: m("filter-talk", d.talk),
			watched: m("filter-watched", d.watched),
			friends: m("filter-friends", d.friends),
			user_space: m("filter-userspace", d.user_space),
			namespaces,
			ignored_tags: source.list_at("ignored-tags", Vec::new()).value,
			required_tags: source.list_at("required-tags", Vec::new()).value,
		}
	}

	fn named(name: &str, locked: bool) -> Self {
		Self {
			name: name.to_string(),
			locked,
			..Default::default()
		}
	}
}

/// Build queue filters from a YAML `queues` node.
///
/// The node is either a mapping of queue name to properties, or a sequence
/// of property mappings that carry a `name` key. Output follows source order
/// and has one filter per definition.
pub fn queue_filters_from_tree(node: &Value, locked: bool) -> Vec<QueueFilter> {
	match node {
		Value::Null => Vec::new(),
		Value::Mapping(queues) => queues
			.iter()
			.map(|(name, props)| {
				let name = scalar_text(name).unwrap_or_else(|| UNNAMED_QUEUE.to_string());
				filter_from_props(&name, props, locked)
			})
			.collect(),
		Value::Sequence(queues) => queues
			.iter()
			.map(|props| {
				let name = props
					.get("name")
					.and_then(scalar_text)
					.filter(|n| !n.is_empty())
					.unwrap_or_else(|| UNNAMED_QUEUE.to_string());
				filter_from_props(&name, props, locked)
			})
			.collect(),
		other => {
			tracing::warn!(found = shape_of(other), "queues must be a mapping or sequence");
			Vec::new()
		}
	}
}

fn filter_from_props(name: &str, props: &Value, locked: bool) -> QueueFilter {
	if props.is_mapping() {
		return QueueFilter::from_source(name, &TreeNodeSource::new(props), locked);
	}
	if !props.is_null() {
		tracing::warn!(
			queue = name,
			found = shape_of(props),
			"queue definition is not a mapping, using defaults"
		);
	}
	QueueFilter::named(name, locked)
}

/// Build queue filters from the `queues:` entry of a legacy document.
///
/// ```text
/// queues:
///     default:
///         filter-bots:exclude
///         namespaces:0,2
///     talk only:
///         filter-talk:require
/// ```
///
/// Lines at the indentation of the first line open a queue; deeper lines are
/// its properties, read with the legacy grammar (lists comma separated).
pub fn queue_filters_from_legacy(text: &str, locked: bool) -> Vec<QueueFilter> {
	queue_filters_from_document(&LegacyText::new(text), locked)
}

/// As [`queue_filters_from_legacy`], for an already split document.
pub fn queue_filters_from_document(doc: &LegacyText, locked: bool) -> Vec<QueueFilter> {
	let Some(entry) = doc.entry("queues") else {
		return Vec::new();
	};

	let Some(base) = entry.lines.first().map(|l| indent_of(l)) else {
		return Vec::new();
	};

	let mut definitions: Vec<(String, Vec<&str>)> = Vec::new();
	for line in &entry.lines {
		let trimmed = line.trim();
		if indent_of(line) <= base {
			let name = trimmed.strip_suffix(':').unwrap_or(trimmed).trim();
			definitions.push((name.to_string(), Vec::new()));
		} else if let Some((_, props)) = definitions.last_mut() {
			props.push(trimmed);
		}
	}

	definitions
		.into_iter()
		.map(|(name, props)| {
			let name: &str = if name.is_empty() { UNNAMED_QUEUE } else { &name };
			let props = LegacyText::new(&props.join("\n"));
			let source = LegacyTextSource::new(&props).comma_separated(true);
			QueueFilter::from_source(name, &source, locked)
		})
		.collect()
}

fn indent_of(line: &str) -> usize {
	line.len() - line.trim_start().len()
}

#[cfg(test)]
mod tests {
	use super::*;

	const LEGACY: &str = "\
enable:true
queues:
    default:
        filter-bots:exclude
        filter-ip:require
        namespaces:0,2,x
    minimal:
    talk only:
        filter-talk:require
        filter-minor:bogus
        ignored-tags:mw-rollback, mw-undo
other:1
";

	#[test]
	fn test_filter_match_tokens() {
		assert_eq!(FilterMatch::parse("EXCLUDE"), Some(FilterMatch::Exclude));
		assert_eq!(FilterMatch::parse("require"), Some(FilterMatch::Require));
		assert_eq!(FilterMatch::parse("ignore"), Some(FilterMatch::Ignore));
		assert_eq!(FilterMatch::parse("true"), Some(FilterMatch::Exclude));
		assert_eq!(FilterMatch::parse("false"), Some(FilterMatch::Ignore));
		assert_eq!(FilterMatch::parse("sometimes"), None);
	}

	#[test]
	fn test_legacy_order_and_fields() {
		let filters = queue_filters_from_legacy(LEGACY, false);
		let names: Vec<_> = filters.iter().map(|f| f.name.as_str()).collect();
		assert_eq!(names, vec!["default", "minimal", "talk only"]);

		let default = &filters[0];
		assert_eq!(default.bots, FilterMatch::Exclude);
		assert_eq!(default.anonymous, FilterMatch::Require);
		assert_eq!(default.namespaces, vec![0, 2]);

		let minimal = &filters[1];
		assert_eq!(
			*minimal,
			QueueFilter {
				name: "minimal".to_string(),
				..Default::default()
			}
		);

		let talk = &filters[2];
		assert_eq!(talk.talk, FilterMatch::Require);
		assert_eq!(talk.minor, FilterMatch::Ignore);
		assert_eq!(talk.ignored_tags, vec!["mw-rollback", "mw-undo"]);
	}

	#[test]
	fn test_legacy_locked_is_stamped() {
		assert!(queue_filters_from_legacy(LEGACY, true).iter().all(|f| f.locked));
		assert!(queue_filters_from_legacy(LEGACY, false).iter().all(|f| !f.locked));
	}

	#[test]
	fn test_legacy_trailing_comma_keeps_next_property() {
		let text = "queues:\n    default:\n        ignored-tags:mw-undo,\n        filter-bots:ignore\n";
		let filters = queue_filters_from_legacy(text, false);
		assert_eq!(filters.len(), 1);
		assert_eq!(filters[0].ignored_tags, vec!["mw-undo"]);
		assert_eq!(filters[0].bots, FilterMatch::Ignore);
	}

	#[test]
	fn test_legacy_without_queues() {
		assert!(queue_filters_from_legacy("enable:true\n", true).is_empty());
		assert!(queue_filters_from_legacy("queues:\nother:1\n", true).is_empty());
	}

	#[test]
	fn test_tree_mapping_form() {
		let node: Value = serde_yaml::from_str(
			r#"
zeta:
  filter-bots: ignore
  filter-friends: require
  namespaces: [0, 4]
  required-tags: [visualeditor]
  description: Everything but bots
alpha:
broken: just a string
"#,
		)
		.unwrap();
		let filters = queue_filters_from_tree(&node, true);
		let names: Vec<_> = filters.iter().map(|f| f.name.as_str()).collect();
		assert_eq!(names, vec!["zeta", "alpha", "broken"]);
		assert!(filters.iter().all(|f| f.locked));

		let zeta = &filters[0];
		assert_eq!(zeta.bots, FilterMatch::Ignore);
		assert_eq!(zeta.friends, FilterMatch::Require);
		assert_eq!(zeta.namespaces, vec![0, 4]);
		assert_eq!(zeta.required_tags, vec!["visualeditor"]);
		assert_eq!(zeta.description, "Everything but bots");

		assert_eq!(filters[2].bots, FilterMatch::Exclude);
		assert!(filters[2].namespaces.is_empty());
	}

	#[test]
	fn test_tree_sequence_form() {
		let node: Value = serde_yaml::from_str(
			r#"
- name: first
  filter-me: ignore
- filter-new-pages: require
- name: third
  namespaces: "not a list"
"#,
		)
		.unwrap();
		let filters = queue_filters_from_tree(&node, false);
		assert_eq!(filters.len(), 3);
		assert_eq!(filters[0].name, "first");
		assert_eq!(filters[0].own_edits, FilterMatch::Ignore);
		assert_eq!(filters[1].name, UNNAMED_QUEUE);
		assert_eq!(filters[1].new_pages, FilterMatch::Require);
		assert_eq!(filters[2].name, "third");
		assert!(filters[2].namespaces.is_empty());
		assert!(filters.iter().all(|f| !f.locked));
	}

	#[test]
	fn test_tree_wrong_shape() {
		assert!(queue_filters_from_tree(&Value::Null, true).is_empty());
		assert!(queue_filters_from_tree(&Value::String("x".into()), true).is_empty());
	}
}
