use crate::site::WikiSite;

/// Separator between key and value in an item.
pub const SS_SEPARATOR: char = ';';

/// A `key;value` item.
///
/// Split at the first separator, so the value may itself contain `;`. An item
/// without a separator is all key and has an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsItem {
	pub key: String,
	pub value: String,
}

impl SsItem {
	pub fn parse(item: &str) -> Self {
		Self {
			key: key_from_ss_item(item).to_string(),
			value: value_from_ss_item(item).to_string(),
		}
	}
}

pub fn key_from_ss_item(item: &str) -> &str {
	match item.split_once(SS_SEPARATOR) {
		Some((key, _)) => key,
		None => item,
	}
}

pub fn value_from_ss_item(item: &str) -> &str {
	match item.split_once(SS_SEPARATOR) {
		Some((_, value)) => value,
		None => "",
	}
}

/// Display name of a warning type. Unknown keys are returned unchanged.
pub fn warning_type_name(key: &str, site: &WikiSite) -> String {
	site.warnings
		.types
		.iter()
		.find(|item| key_from_ss_item(item) == key)
		.map(|item| value_from_ss_item(item).to_string())
		.unwrap_or_else(|| key.to_string())
}

/// Key of the warning type displayed as `name`. Unknown names are returned
/// unchanged.
pub fn warning_type_key(name: &str, site: &WikiSite) -> String {
	site.warnings
		.types
		.iter()
		.find(|item| value_from_ss_item(item) == name)
		.map(|item| key_from_ss_item(item).to_string())
		.unwrap_or_else(|| name.to_string())
}

/// Edit summary used when reverting for the warning type `key`.
///
/// The user's own summaries win over the site's; the site default summary is
/// the fallback.
pub fn warning_summary(key: &str, site: &WikiSite, user_summaries: &[String]) -> String {
	user_summaries
		.iter()
		.chain(site.warnings.summaries.iter())
		.find(|item| key_from_ss_item(item) == key)
		.map(|item| value_from_ss_item(item).to_string())
		.unwrap_or_else(|| site.warnings.default_summary.clone())
}
