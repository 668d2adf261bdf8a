//! Per-site state produced by configuration loading.
//!
//! Each `WikiSite` carries its own month names, warning vocabulary and score
//! tables. Nothing here is global; parsers receive the site they work on.

use crate::config::legacy::split_list;
use crate::config::source::ConfigSource;
use crate::rules::scoring::ScoreTables;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const ENGLISH_MONTHS: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

/// Localized month names of a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTable {
	/// Position + 1 is the month number.
	names: Vec<String>,
	/// Extra spellings (abbreviations, genitive forms) keyed by month number.
	alternatives: HashMap<u8, Vec<String>>,
}

impl Default for MonthTable {
	fn default() -> Self {
		Self::new(ENGLISH_MONTHS.iter().map(|m| m.to_string()).collect())
	}
}

impl MonthTable {
	pub fn new(names: Vec<String>) -> Self {
		Self {
			names,
			alternatives: HashMap::new(),
		}
	}

	pub fn with_alternatives(mut self, month: u8, names: Vec<String>) -> Self {
		self.alternatives.entry(month).or_default().extend(names);
		self
	}

	/// The 1-based number of `name`, compared case-insensitively against the
	/// primary names first and then the alternatives. `None` when unknown.
	pub fn id_of(&self, name: &str) -> Option<u8> {
		let wanted = name.trim().to_lowercase();
		if wanted.is_empty() {
			return None;
		}
		if let Some(pos) = self.names.iter().position(|n| n.to_lowercase() == wanted) {
			return u8::try_from(pos + 1).ok();
		}
		let mut months: Vec<_> = self.alternatives.iter().collect();
		months.sort_by_key(|(month, _)| **month);
		months
			.into_iter()
			.find(|(_, alts)| alts.iter().any(|a| a.to_lowercase() == wanted))
			.map(|(month, _)| *month)
	}
}

/// Warning templates and summaries a site recognizes.
///
/// Every entry is a `key;value` item (see [`crate::warnings::summary`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningVocabulary {
	/// `level;marker`, where the marker is the text a warning template leaves
	/// on a talk page.
	pub defs: Vec<String>,
	/// `key;display name`.
	pub types: Vec<String>,
	/// `key;edit summary`.
	pub summaries: Vec<String>,
	pub default_summary: String,
}

/// A wiki the tool works against, with its parsed configuration tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiSite {
	pub name: String,
	pub months: MonthTable,
	pub warnings: WarningVocabulary,
	pub scores: ScoreTables,
}

impl WikiSite {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	/// Read month names and warning vocabulary from a project configuration.
	///
	/// Score tables are left empty; they are filled by the score parsers.
	/// A month list that does not have exactly twelve entries is ignored.
	pub fn from_source(name: impl Into<String>, source: &impl ConfigSource) -> Self {
		let mut site = WikiSite::new(name);

		let months = source.list_at("months", Vec::new()).value;
		if months.len() == 12 {
			site.months = MonthTable::new(months);
		} else if !months.is_empty() {
			tracing::warn!(
				site = %site.name,
				count = months.len(),
				"month list must have 12 entries, keeping defaults"
			);
		}

		let alternatives = source.string_map_at("alternative-months", HashMap::new()).value;
		for (month, names) in alternatives {
			match month.trim().parse::<u8>() {
				Ok(id @ 1..=12) => {
					let names = split_list(names.lines(), true);
					site.months = site.months.with_alternatives(id, names);
				}
				_ => tracing::warn!(site = %site.name, month = %month, "invalid month number"),
			}
		}

		site.warnings = WarningVocabulary {
			defs: source.list_at("warning-template-tags", Vec::new()).value,
			types: source.list_at("warning-types", Vec::new()).value,
			summaries: source.list_at("warning-summaries", Vec::new()).value,
			default_summary: source.string_at("default-summary", "", false),
		};

		site
	}
}

/// Score tables that can be read while a reload builds their replacement.
///
/// Readers take a snapshot; a reload parses into a fresh [`ScoreTables`] and
/// swaps it in whole, so nobody observes a half-filled table.
#[derive(Debug, Default)]
pub struct SharedScoreTables {
	inner: RwLock<Arc<ScoreTables>>,
}

impl SharedScoreTables {
	pub fn new(tables: ScoreTables) -> Self {
		Self {
			inner: RwLock::new(Arc::new(tables)),
		}
	}

	pub fn snapshot(&self) -> Arc<ScoreTables> {
		Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
	}

	/// Install `tables`, returning the previous ones.
	pub fn replace(&self, tables: ScoreTables) -> Arc<ScoreTables> {
		let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
		std::mem::replace(&mut *guard, Arc::new(tables))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::legacy::{LegacyText, LegacyTextSource};
	use crate::config::tree::TreeNodeSource;
	use crate::rules::scoring::{ScoreRule, parse_words};

	#[test]
	fn test_month_lookup() {
		let months = MonthTable::default();
		assert_eq!(months.id_of("March"), Some(3));
		assert_eq!(months.id_of("march"), Some(3));
		assert_eq!(months.id_of("DECEMBER"), Some(12));
		assert_eq!(months.id_of("Smarch"), None);
		assert_eq!(months.id_of(""), None);
	}

	#[test]
	fn test_month_alternatives() {
		let months = MonthTable::default().with_alternatives(9, vec!["Sept".to_string()]);
		assert_eq!(months.id_of("sept"), Some(9));
		assert_eq!(months.id_of("September"), Some(9));
	}

	#[test]
	fn test_site_from_yaml() {
		let node: serde_yaml::Value = serde_yaml::from_str(
			r#"
months: [Januar, Februar, März, April, Mai, Juni, Juli, August, September, Oktober, November, Dezember]
alternative-months:
  3: "Mrz, Maerz"
  13: "Nope"
warning-template-tags: ["1;<!-- Template:uw-test1 -->", "2;<!-- Template:uw-test2 -->"]
warning-types: ["vandal;Vandalism", "spam;Spam"]
default-summary: Reverted edits
"#,
		)
		.unwrap();
		let site = WikiSite::from_source("de.wikipedia", &TreeNodeSource::new(&node));
		assert_eq!(site.name, "de.wikipedia");
		assert_eq!(site.months.id_of("märz"), Some(3));
		assert_eq!(site.months.id_of("Maerz"), Some(3));
		assert_eq!(site.months.id_of("March"), None);
		assert_eq!(site.warnings.defs.len(), 2);
		assert_eq!(site.warnings.types[1], "spam;Spam");
		assert!(site.warnings.summaries.is_empty());
		assert_eq!(site.warnings.default_summary, "Reverted edits");
		assert!(site.scores.is_empty());
	}

	#[test]
	fn test_site_from_legacy_keeps_default_months() {
		let text = LegacyText::new("months:\n    Jan,\n    Feb\nwarning-types:\n    vandal;Vandalism\n");
		let site = WikiSite::from_source("en", &LegacyTextSource::new(&text));
		assert_eq!(site.months, MonthTable::default());
		assert_eq!(site.warnings.types, vec!["vandal;Vandalism"]);
	}

	#[test]
	fn test_shared_tables_swap() {
		let shared = SharedScoreTables::default();
		let before = shared.snapshot();
		assert!(before.is_empty());

		let mut fresh = ScoreTables::default();
		parse_words("score-words(5):\n    foo\n", &mut fresh);
		let old = shared.replace(fresh);

		assert!(old.is_empty());
		assert!(before.is_empty());
		assert_eq!(shared.snapshot().words, vec![ScoreRule::new("foo", 5)]);
	}
}
