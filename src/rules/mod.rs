//! Runtime objects built from configuration.
//!
//! This module handles:
//! - Queue filter definitions from YAML nodes or legacy text
//! - Word and pattern score tables, split into talk and non-talk partitions

pub mod queue;
pub mod scoring;

pub use queue::{
	FilterMatch, QueueFilter, queue_filters_from_document, queue_filters_from_legacy,
	queue_filters_from_tree,
};
pub use scoring::{
	ScoreCategory, ScoreRule, ScoreTables, parse_all_legacy, parse_all_yaml, parse_no_talk_patterns,
	parse_no_talk_patterns_yaml, parse_no_talk_words, parse_no_talk_words_yaml, parse_patterns,
	parse_patterns_yaml, parse_words, parse_words_yaml,
};
