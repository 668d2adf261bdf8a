use crate::config::legacy::{LegacyText, LegacyTextSource};
use crate::config::source::{ConfigSource, Probe};
use crate::config::tree::TreeNodeSource;
use crate::rules::queue::{QueueFilter, queue_filters_from_document, queue_filters_from_tree};
use crate::rules::scoring::{ScoreTables, parse_all_legacy, parse_all_yaml};
use crate::site::WikiSite;
use serde_yaml::Value;
use std::path::PathBuf;

/// Which grammar a document is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
	/// YAML for `.yaml`/`.yml` files or text starting with `---`, legacy
	/// otherwise.
	#[default]
	Auto,
	Legacy,
	Yaml,
}

/// The parsed contents of one configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
	Legacy(LegacyText),
	Tree(Value),
}

/// A loaded configuration document with its source path for debugging/display.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
	pub body: DocumentBody,

	/// The path this document was loaded from.
	pub path: PathBuf,
}

impl ConfigDocument {
	pub fn format(&self) -> DocumentFormat {
		match self.body {
			DocumentBody::Legacy(_) => DocumentFormat::Legacy,
			DocumentBody::Tree(_) => DocumentFormat::Yaml,
		}
	}

	/// Scalar value of `key`, or `None` when absent or not a scalar.
	pub fn scalar(&self, key: &str) -> Option<String> {
		let probe = match &self.body {
			DocumentBody::Legacy(text) => LegacyTextSource::new(text).scalar_at(key),
			DocumentBody::Tree(node) => TreeNodeSource::new(node).scalar_at(key),
		};
		match probe {
			Probe::Found(value) => Some(value),
			_ => None,
		}
	}

	/// List value of `key`; `cs` picks comma-separated items for legacy text.
	pub fn list(&self, key: &str, cs: bool) -> Vec<String> {
		match &self.body {
			DocumentBody::Legacy(text) => LegacyTextSource::new(text)
				.comma_separated(cs)
				.list_at(key, Vec::new())
				.value,
			DocumentBody::Tree(node) => TreeNodeSource::new(node).list_at(key, Vec::new()).value,
		}
	}

	/// Queue filters defined under `queues`, stamped with `locked`.
	pub fn queue_filters(&self, locked: bool) -> Vec<QueueFilter> {
		match &self.body {
			DocumentBody::Legacy(text) => queue_filters_from_document(text, locked),
			DocumentBody::Tree(node) => match node.get("queues") {
				Some(queues) => queue_filters_from_tree(queues, locked),
				None => Vec::new(),
			},
		}
	}

	/// Append every score rule of the document to `tables`.
	pub fn load_scores(&self, tables: &mut ScoreTables) {
		match &self.body {
			DocumentBody::Legacy(text) => parse_all_legacy(text, tables),
			DocumentBody::Tree(node) => parse_all_yaml(node, tables),
		}
	}

	/// Build a site from this document, score tables included.
	pub fn load_site(&self, name: &str) -> WikiSite {
		let mut site = match &self.body {
			DocumentBody::Legacy(text) => WikiSite::from_source(name, &LegacyTextSource::new(text)),
			DocumentBody::Tree(node) => WikiSite::from_source(name, &TreeNodeSource::new(node)),
		};
		self.load_scores(&mut site.scores);
		site
	}
}
