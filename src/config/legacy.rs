//! The flat `key:value` configuration format that predates YAML.
//!
//! Grammar (version 1):
//!
//! ```text
//! // comment
//! enable:true
//! ignore:
//!     Jimbo,
//!     Some user,
//! score-words(200):
//!     word1, word2,
//!     word3
//! ```
//!
//! - A line starting at column 0 that contains `:` opens an entry. The key is
//!   the text before the first `:`, compared case-sensitively.
//! - Following lines belong to the entry while they are indented (space or
//!   tab), or while the previous value line ends with `,` and the line is not
//!   itself a header. A blank line ends the entry.
//! - Lines starting with `//` are comments.
//! - The first entry for a key wins. Separators cannot be escaped.

use crate::config::source::{ConfigSource, Probe, non_empty_or, parse_bool_token};

/// One `key:value` entry of a legacy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEntry {
	pub key: String,
	/// Text after the colon on the header line, trimmed.
	pub inline: String,
	/// Continuation lines, untrimmed.
	pub lines: Vec<String>,
}

impl LegacyEntry {
	/// The inline part (when non-empty) followed by every continuation line.
	pub fn value_lines(&self) -> impl Iterator<Item = &str> {
		let inline = (!self.inline.is_empty()).then_some(self.inline.as_str());
		inline.into_iter().chain(self.lines.iter().map(String::as_str))
	}

	/// The whole value with lines joined by `\n`.
	pub fn raw_value(&self) -> String {
		self.value_lines().collect::<Vec<_>>().join("\n")
	}

	fn ends_with_comma(&self) -> bool {
		self.value_lines()
			.last()
			.is_some_and(|line| line.trim_end().ends_with(','))
	}
}

/// An immutable legacy configuration document, split into entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyText {
	entries: Vec<LegacyEntry>,
}

impl LegacyText {
	pub fn new(content: &str) -> Self {
		Self {
			entries: split_entries(content),
		}
	}

	/// Every entry in document order, repeats included.
	pub fn entries(&self) -> impl Iterator<Item = &LegacyEntry> {
		self.entries.iter()
	}

	/// The first entry for `key`.
	pub fn entry(&self, key: &str) -> Option<&LegacyEntry> {
		self.entries.iter().find(|e| e.key == key)
	}

	/// The inline value of `key`, trimmed.
	pub fn scalar(&self, key: &str) -> Option<&str> {
		self.entry(key).map(|e| e.inline.as_str())
	}

	/// Scalar lookup with a default. With `non_empty`, an empty value also
	/// yields `missing`.
	pub fn scalar_or(&self, key: &str, missing: &str, non_empty: bool) -> String {
		match self.scalar(key) {
			Some(value) if non_empty => non_empty_or(key, value, missing),
			Some(value) => value.to_string(),
			None => missing.to_string(),
		}
	}

	pub fn boolean(&self, key: &str, missing: bool) -> bool {
		self.scalar(key)
			.and_then(parse_bool_token)
			.unwrap_or(missing)
	}

	/// List lookup.
	///
	/// With `cs` false every line is one item (a trailing comma is dropped),
	/// so items may contain commas. With `cs` true items are separated by
	/// commas and several may share a line.
	pub fn list(&self, key: &str, cs: bool) -> Vec<String> {
		self.list_or(key, Vec::new(), cs)
	}

	pub fn list_or(&self, key: &str, missing: Vec<String>, cs: bool) -> Vec<String> {
		match self.entry(key) {
			Some(entry) => split_list(entry.value_lines(), cs),
			None => missing,
		}
	}

	/// List lookup that trims every item and strips one trailing separator
	/// from the value. Empty items are kept unless `remove_null` is set.
	pub fn trimmed_list(&self, key: &str, cs: bool, remove_null: bool) -> Vec<String> {
		let Some(entry) = self.entry(key) else {
			return Vec::new();
		};
		let raw = entry.raw_value();
		let raw = raw.trim();
		let raw = raw.strip_suffix(',').unwrap_or(raw);

		let pieces: Vec<&str> = if cs {
			raw.split([',', '\n']).collect()
		} else {
			raw.split('\n')
				.map(|line| {
					let line = line.trim_end();
					line.strip_suffix(',').unwrap_or(line)
				})
				.collect()
		};

		pieces
			.into_iter()
			.map(str::trim)
			.filter(|item| !remove_null || !item.is_empty())
			.map(str::to_string)
			.collect()
	}
}

fn split_entries(content: &str) -> Vec<LegacyEntry> {
	let mut entries = Vec::new();
	let mut current: Option<LegacyEntry> = None;

	for raw in content.split('\n') {
		let line = raw.strip_suffix('\r').unwrap_or(raw);
		let is_comment = line.starts_with("//");
		let is_blank = line.trim().is_empty();

		if let Some(entry) = current.as_mut() {
			let indented = line.starts_with([' ', '\t']);
			let header = !indented && line.contains(':');
			if !is_blank && !is_comment && (indented || (!header && entry.ends_with_comma())) {
				entry.lines.push(line.to_string());
				continue;
			}
			entries.extend(current.take());
		}

		if is_comment || is_blank || line.starts_with([' ', '\t']) {
			continue;
		}
		if let Some((key, inline)) = line.split_once(':') {
			current = Some(LegacyEntry {
				key: key.to_string(),
				inline: inline.trim().to_string(),
				lines: Vec::new(),
			});
		}
	}
	entries.extend(current);

	entries
}

/// Split value lines into list items, see [`LegacyText::list`].
pub fn split_list<'a>(lines: impl Iterator<Item = &'a str>, cs: bool) -> Vec<String> {
	let mut items = Vec::new();
	for line in lines {
		let line = line.trim();
		if cs {
			items.extend(
				line.split(',')
					.map(str::trim)
					.filter(|item| !item.is_empty())
					.map(str::to_string),
			);
		} else {
			let item = line.strip_suffix(',').unwrap_or(line).trim();
			if !item.is_empty() {
				items.push(item.to_string());
			}
		}
	}
	items
}

/// [`ConfigSource`] view over a legacy document.
#[derive(Debug, Clone, Copy)]
pub struct LegacyTextSource<'a> {
	text: &'a LegacyText,
	comma_separated: bool,
}

impl<'a> LegacyTextSource<'a> {
	/// Lists are read one item per line.
	pub fn new(text: &'a LegacyText) -> Self {
		Self {
			text,
			comma_separated: false,
		}
	}

	/// Choose whether lists are comma separated (see [`LegacyText::list`]).
	pub fn comma_separated(mut self, cs: bool) -> Self {
		self.comma_separated = cs;
		self
	}
}

impl ConfigSource for LegacyTextSource<'_> {
	fn scalar_at(&self, key: &str) -> Probe<String> {
		match self.text.entry(key) {
			None => Probe::Missing,
			Some(entry) if entry.inline.is_empty() && !entry.lines.is_empty() => Probe::Mismatch {
				expected: "scalar",
				found: "list",
			},
			Some(entry) => Probe::Found(entry.inline.clone()),
		}
	}

	fn sequence_at(&self, key: &str) -> Probe<Vec<String>> {
		match self.text.entry(key) {
			None => Probe::Missing,
			Some(entry) => Probe::Found(split_list(entry.value_lines(), self.comma_separated)),
		}
	}

	fn mapping_at(&self, key: &str) -> Probe<Vec<(String, String)>> {
		let Some(entry) = self.text.entry(key) else {
			return Probe::Missing;
		};
		let mut pairs = Vec::new();
		for line in entry.value_lines() {
			match line.trim().split_once(':') {
				Some((k, v)) => pairs.push((k.trim().to_string(), v.trim().to_string())),
				None => {
					return Probe::Mismatch {
						expected: "mapping",
						found: "list",
					};
				}
			}
		}
		Probe::Found(pairs)
	}
}
