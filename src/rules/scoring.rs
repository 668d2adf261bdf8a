use crate::config::legacy::{LegacyText, split_list};
use crate::config::tree::{scalar_text, shape_of};
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

/// Which score table a rule belongs to.
///
/// Word rules are compared against whole tokens, pattern rules against
/// substrings, and the no-talk tables only apply outside discussion
/// namespaces. The scoring engine reads each table through its own code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
	TalkWord,
	TalkPattern,
	NonTalkWord,
	NonTalkPattern,
}

impl ScoreCategory {
	pub const ALL: [ScoreCategory; 4] = [
		ScoreCategory::TalkWord,
		ScoreCategory::TalkPattern,
		ScoreCategory::NonTalkWord,
		ScoreCategory::NonTalkPattern,
	];

	/// Configuration key holding this category's rules.
	pub fn config_key(self) -> &'static str {
		match self {
			ScoreCategory::TalkWord => "score-words",
			ScoreCategory::TalkPattern => "score-parts",
			ScoreCategory::NonTalkWord => "score-words-no-talk",
			ScoreCategory::NonTalkPattern => "score-parts-no-talk",
		}
	}
}

/// A scorable token and the weight it adds to an edit's score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRule {
	pub text: String,
	pub score: i64,
}

impl ScoreRule {
	pub fn new(text: impl Into<String>, score: i64) -> Self {
		Self {
			text: text.into(),
			score,
		}
	}
}

/// The four per-site score tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTables {
	pub words: Vec<ScoreRule>,
	pub patterns: Vec<ScoreRule>,
	pub no_talk_words: Vec<ScoreRule>,
	pub no_talk_patterns: Vec<ScoreRule>,
}

impl ScoreTables {
	pub fn table(&self, category: ScoreCategory) -> &[ScoreRule] {
		match category {
			ScoreCategory::TalkWord => &self.words,
			ScoreCategory::TalkPattern => &self.patterns,
			ScoreCategory::NonTalkWord => &self.no_talk_words,
			ScoreCategory::NonTalkPattern => &self.no_talk_patterns,
		}
	}

	pub fn table_mut(&mut self, category: ScoreCategory) -> &mut Vec<ScoreRule> {
		match category {
			ScoreCategory::TalkWord => &mut self.words,
			ScoreCategory::TalkPattern => &mut self.patterns,
			ScoreCategory::NonTalkWord => &mut self.no_talk_words,
			ScoreCategory::NonTalkPattern => &mut self.no_talk_patterns,
		}
	}

	/// Empty one table. The parsers only append, so a reload clears first.
	pub fn clear(&mut self, category: ScoreCategory) {
		self.table_mut(category).clear();
	}

	pub fn len(&self) -> usize {
		ScoreCategory::ALL
			.iter()
			.map(|c| self.table(*c).len())
			.sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(score-(?:words|parts)(?:-no-talk)?)\(\s*(-?\d+)\s*\)$")
		.expect("score header regex is valid")
});

/// Append every `<key>(N):` block of a legacy document to `category`'s table.
fn parse_legacy(doc: &LegacyText, tables: &mut ScoreTables, category: ScoreCategory) {
	let wanted = category.config_key();

	for entry in doc.entries() {
		let Some(caps) = HEADER_RE.captures(entry.key.trim()) else {
			continue;
		};
		if &caps[1] != wanted {
			continue;
		}
		let score = match caps[2].parse::<i64>() {
			Ok(score) if score != 0 => score,
			_ => {
				tracing::warn!(key = %entry.key, "skipping score block with zero or invalid weight");
				continue;
			}
		};
		push_rules(tables, category, split_list(entry.value_lines(), true), score);
	}
}

/// Append the rules under a YAML category node to `category`'s table.
///
/// Accepted shapes:
///
/// ```yaml
/// score-words:
///   - score: 200
///     list: [word1, word2]   # or "word1, word2"; `words` works too
/// score-parts:
///   -50: [pattern]
/// ```
fn parse_tree(node: &Value, tables: &mut ScoreTables, category: ScoreCategory) {
	match node {
		Value::Null => {}
		Value::Sequence(blocks) => {
			for block in blocks {
				let score = block.get("score").and_then(scalar_text);
				let items = block.get("list").or_else(|| block.get("words"));
				push_block(tables, category, score.as_deref(), items);
			}
		}
		Value::Mapping(blocks) => {
			for (score, items) in blocks {
				push_block(tables, category, scalar_text(score).as_deref(), Some(items));
			}
		}
		other => tracing::warn!(
			key = category.config_key(),
			found = shape_of(other),
			"score rules must be a sequence or mapping"
		),
	}
}

fn push_block(
	tables: &mut ScoreTables,
	category: ScoreCategory,
	score: Option<&str>,
	items: Option<&Value>,
) {
	let score = match score.map(|s| s.trim().parse::<i64>()) {
		Some(Ok(score)) if score != 0 => score,
		_ => {
			tracing::warn!(
				key = category.config_key(),
				score,
				"skipping score block with zero or invalid weight"
			);
			return;
		}
	};

	let words = match items {
		Some(Value::Sequence(seq)) => seq
			.iter()
			.filter_map(scalar_text)
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect(),
		Some(value) => match scalar_text(value) {
			Some(text) => split_list(text.lines(), true),
			None => Vec::new(),
		},
		None => Vec::new(),
	};
	push_rules(tables, category, words, score);
}

fn push_rules(tables: &mut ScoreTables, category: ScoreCategory, words: Vec<String>, score: i64) {
	let table = tables.table_mut(category);
	table.extend(words.into_iter().map(|w| ScoreRule::new(w, score)));
}

/// Parse `score-parts(N)` blocks into the talk pattern table.
pub fn parse_patterns(text: &str, tables: &mut ScoreTables) {
	parse_legacy(&LegacyText::new(text), tables, ScoreCategory::TalkPattern);
}

/// Parse `score-words(N)` blocks into the talk word table.
pub fn parse_words(text: &str, tables: &mut ScoreTables) {
	parse_legacy(&LegacyText::new(text), tables, ScoreCategory::TalkWord);
}

pub fn parse_no_talk_words(text: &str, tables: &mut ScoreTables) {
	parse_legacy(&LegacyText::new(text), tables, ScoreCategory::NonTalkWord);
}

pub fn parse_no_talk_patterns(text: &str, tables: &mut ScoreTables) {
	parse_legacy(&LegacyText::new(text), tables, ScoreCategory::NonTalkPattern);
}

/// Parse a `score-parts` YAML node into the talk pattern table.
pub fn parse_patterns_yaml(node: &Value, tables: &mut ScoreTables) {
	parse_tree(node, tables, ScoreCategory::TalkPattern);
}

pub fn parse_words_yaml(node: &Value, tables: &mut ScoreTables) {
	parse_tree(node, tables, ScoreCategory::TalkWord);
}

pub fn parse_no_talk_words_yaml(node: &Value, tables: &mut ScoreTables) {
	parse_tree(node, tables, ScoreCategory::NonTalkWord);
}

pub fn parse_no_talk_patterns_yaml(node: &Value, tables: &mut ScoreTables) {
	parse_tree(node, tables, ScoreCategory::NonTalkPattern);
}

/// Run all four legacy parsers over one document.
pub fn parse_all_legacy(doc: &LegacyText, tables: &mut ScoreTables) {
	for category in ScoreCategory::ALL {
		parse_legacy(doc, tables, category);
	}
}

/// Run all four YAML parsers over the children of a document root.
pub fn parse_all_yaml(root: &Value, tables: &mut ScoreTables) {
	for category in ScoreCategory::ALL {
		if let Some(node) = root.get(category.config_key()) {
			parse_tree(node, tables, category);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const LEGACY: &str = "\
score-words(200):
    idiot, stupid,
    dumb
score-parts(-50):
    lol
score-words-no-talk(10):
    hello
score-parts-no-talk(5):
    !!!, ???
score-words(0):
    ignored
score-words(abc):
    ignored
";

	fn texts(rules: &[ScoreRule]) -> Vec<&str> {
		rules.iter().map(|r| r.text.as_str()).collect()
	}

	#[test]
	fn test_legacy_partitions() {
		let mut tables = ScoreTables::default();
		parse_words(LEGACY, &mut tables);
		assert_eq!(texts(&tables.words), vec!["idiot", "stupid", "dumb"]);
		assert!(tables.words.iter().all(|r| r.score == 200));
		assert!(tables.patterns.is_empty());
		assert!(tables.no_talk_words.is_empty());
		assert!(tables.no_talk_patterns.is_empty());

		parse_patterns(LEGACY, &mut tables);
		assert_eq!(tables.patterns, vec![ScoreRule::new("lol", -50)]);

		parse_no_talk_words(LEGACY, &mut tables);
		assert_eq!(tables.no_talk_words, vec![ScoreRule::new("hello", 10)]);

		parse_no_talk_patterns(LEGACY, &mut tables);
		assert_eq!(texts(&tables.no_talk_patterns), vec!["!!!", "???"]);

		// The talk tables were not touched by the no-talk parsers.
		assert_eq!(tables.words.len(), 3);
		assert_eq!(tables.patterns.len(), 1);
	}

	#[test]
	fn test_trailing_comma_does_not_swallow_next_block() {
		let text = LegacyText::new("score-words(10):\n    spam,\n    eggs,\nscore-parts(-5):\n    lol\n");
		let mut tables = ScoreTables::default();
		parse_all_legacy(&text, &mut tables);
		assert_eq!(
			tables.words,
			vec![ScoreRule::new("spam", 10), ScoreRule::new("eggs", 10)]
		);
		assert_eq!(tables.patterns, vec![ScoreRule::new("lol", -5)]);
	}

	#[test]
	fn test_multiple_blocks_accumulate() {
		let text = "score-words(1):\n    a\nother:x\nscore-words(2):\n    b, c\n";
		let mut tables = ScoreTables::default();
		parse_words(text, &mut tables);
		assert_eq!(
			tables.words,
			vec![
				ScoreRule::new("a", 1),
				ScoreRule::new("b", 2),
				ScoreRule::new("c", 2)
			]
		);
	}

	#[test]
	fn test_reparse_appends() {
		let text = "score-words(3):\n    one, two\n";
		let mut tables = ScoreTables::default();
		parse_words(text, &mut tables);
		parse_words(text, &mut tables);
		assert_eq!(tables.words.len(), 4);

		tables.clear(ScoreCategory::TalkWord);
		parse_words(text, &mut tables);
		assert_eq!(tables.words.len(), 2);
	}

	#[test]
	fn test_yaml_sequence_form() {
		let node: Value = serde_yaml::from_str(
			r#"
- score: 100
  list: [foo, bar]
- score: -20
  words: "baz, qux"
- score: 0
  list: [skipped]
- list: [no-score]
"#,
		)
		.unwrap();
		let mut tables = ScoreTables::default();
		parse_words_yaml(&node, &mut tables);
		assert_eq!(
			tables.words,
			vec![
				ScoreRule::new("foo", 100),
				ScoreRule::new("bar", 100),
				ScoreRule::new("baz", -20),
				ScoreRule::new("qux", -20),
			]
		);
		assert!(tables.patterns.is_empty());
	}

	#[test]
	fn test_yaml_mapping_form() {
		let node: Value = serde_yaml::from_str("50: [x]\n-5: \"y, z\"\n").unwrap();
		let mut tables = ScoreTables::default();
		parse_no_talk_patterns_yaml(&node, &mut tables);
		assert_eq!(
			tables.no_talk_patterns,
			vec![
				ScoreRule::new("x", 50),
				ScoreRule::new("y", -5),
				ScoreRule::new("z", -5)
			]
		);
		assert!(tables.no_talk_words.is_empty());
	}

	#[test]
	fn test_yaml_wrong_shape_is_ignored() {
		let node = Value::String("not a list".to_string());
		let mut tables = ScoreTables::default();
		parse_patterns_yaml(&node, &mut tables);
		parse_no_talk_words_yaml(&Value::Null, &mut tables);
		assert!(tables.is_empty());
	}

	#[test]
	fn test_parse_all_yaml_routes_by_key() {
		let root: Value = serde_yaml::from_str(
			r#"
score-words:
  - score: 1
    list: [w]
score-parts:
  - score: 2
    list: [p]
score-words-no-talk:
  - score: 3
    list: [nw]
score-parts-no-talk:
  - score: 4
    list: [np]
"#,
		)
		.unwrap();
		let mut tables = ScoreTables::default();
		parse_all_yaml(&root, &mut tables);
		assert_eq!(tables.table(ScoreCategory::TalkWord), [ScoreRule::new("w", 1)]);
		assert_eq!(tables.table(ScoreCategory::TalkPattern), [ScoreRule::new("p", 2)]);
		assert_eq!(tables.table(ScoreCategory::NonTalkWord), [ScoreRule::new("nw", 3)]);
		assert_eq!(tables.table(ScoreCategory::NonTalkPattern), [ScoreRule::new("np", 4)]);
		assert_eq!(tables.len(), 4);
	}

	#[test]
	fn test_parse_all_legacy() {
		let mut tables = ScoreTables::default();
		parse_all_legacy(&LegacyText::new(LEGACY), &mut tables);
		assert_eq!(tables.len(), 3 + 1 + 1 + 2);
	}
}
