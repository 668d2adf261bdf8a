//! Configuration extraction for both supported formats.
//!
//! This module handles:
//! - Default-aware typed extraction shared by every format (`ConfigSource`)
//! - The legacy flat `key:value` text format
//! - YAML trees, including the shapes only YAML can express
//! - Loading a document and picking its format

pub mod legacy;
pub mod parser;
pub mod source;
pub mod tree;
pub mod types;

pub use legacy::{LegacyEntry, LegacyText, LegacyTextSource};
pub use parser::{parse_document_file, parse_document_str, resolve_format};
pub use source::{ConfigSource, Extracted, Probe, non_empty_or, parse_bool_token};
pub use tree::{
	ScalarValue, TreeNodeSource, hash_of_hash_at, list_of_lists_at, string_hash, string_list,
	variant_map_at,
};
pub use types::{ConfigDocument, DocumentBody, DocumentFormat};
