use std::path::PathBuf;

/// Library-level structured errors for patrol-config.
///
/// Only loading a document can fail. Everything after that point degrades to
/// defaults and reports problems through [`ExtractIssue`] instead.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PatrolError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse YAML config: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},
}

/// Result type alias using PatrolError.
pub type Result<T> = std::result::Result<T, PatrolError>;

/// A problem noticed while extracting a value.
///
/// Never fatal: the extractor has already substituted the caller's default by
/// the time one of these is handed out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractIssue {
	#[error("key `{key}` holds a {found}, expected a {expected}")]
	StructuralMismatch {
		key: String,
		expected: &'static str,
		found: &'static str,
	},

	#[error("key `{key}` has a malformed entry: {entry}")]
	MalformedEntry { key: String, entry: String },
}
