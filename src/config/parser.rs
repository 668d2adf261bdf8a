use crate::config::legacy::LegacyText;
use crate::config::types::{ConfigDocument, DocumentBody, DocumentFormat};
use crate::error::{PatrolError, Result};
use std::path::Path;

/// Parse a config document from the given path.
pub fn parse_document_file(path: &Path, format: DocumentFormat) -> Result<ConfigDocument> {
	let content = std::fs::read_to_string(path).map_err(|source| PatrolError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_document_str(&content, path, format)
}

/// Parse a config document from a string (useful for testing, and for text
/// fetched from a wiki page).
///
/// Only YAML syntax errors fail. A legacy document always parses.
pub fn parse_document_str(
	content: &str,
	path: &Path,
	format: DocumentFormat,
) -> Result<ConfigDocument> {
	let body = match resolve_format(content, path, format) {
		DocumentFormat::Yaml => {
			let node = serde_yaml::from_str(content).map_err(|source| PatrolError::ConfigParseError {
				path: path.to_path_buf(),
				source,
			})?;
			DocumentBody::Tree(node)
		}
		_ => DocumentBody::Legacy(LegacyText::new(content)),
	};

	tracing::debug!(path = %path.display(), kind = kind(&body), "parsed config document");
	Ok(ConfigDocument {
		body,
		path: path.to_path_buf(),
	})
}

fn kind(body: &DocumentBody) -> &'static str {
	match body {
		DocumentBody::Legacy(_) => "legacy",
		DocumentBody::Tree(_) => "yaml",
	}
}

/// Decide the grammar for `Auto`: the file extension first, then a leading
/// `---` document marker.
pub fn resolve_format(content: &str, path: &Path, format: DocumentFormat) -> DocumentFormat {
	if format != DocumentFormat::Auto {
		return format;
	}
	let by_extension = path
		.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
	if by_extension || content.trim_start().starts_with("---") {
		DocumentFormat::Yaml
	} else {
		DocumentFormat::Legacy
	}
}
