use crate::site::WikiSite;
use crate::warnings::summary::SsItem;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Signature timestamp, e.g. `14:02, 5 March 2024 (UTC)`. Some wikis write
/// the day with a trailing dot.
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\d{1,2}:\d{2}, (\d{1,2})\.? (\p{L}[\p{L}.]*) (\d{4}) \(UTC\)")
		.expect("signature regex is valid")
});

/// Number of a localized month name on `site`, 1-based. `None` when the
/// name is unknown; callers treat that as an unparseable date.
pub fn month_id(month: &str, site: &WikiSite) -> Option<u8> {
	site.months.id_of(month)
}

/// The current warning level of a user, from the text of their talk page.
///
/// Every occurrence of a warning marker is dated by the first signature
/// timestamp after it in the same section. Occurrences without a readable
/// date, or dated before `cutoff`, are ignored. Returns the highest level
/// among the rest, or `None` when there is none.
pub fn get_level(page: &str, cutoff: NaiveDate, site: &WikiSite) -> Option<u8> {
	let markers: Vec<(u8, String)> = site
		.warnings
		.defs
		.iter()
		.map(|def| SsItem::parse(def))
		.filter_map(|item| {
			let level = item.key.trim().parse::<u8>().ok()?;
			(!item.value.is_empty()).then_some((level, item.value))
		})
		.collect();

	let mut best = None;
	for section in sections(page) {
		let stamps: Vec<(usize, Option<NaiveDate>)> = SIGNATURE_RE
			.captures_iter(section)
			.map(|caps| (caps.get(0).map_or(0, |m| m.start()), signature_date(&caps, site)))
			.collect();

		for (level, marker) in &markers {
			for (pos, _) in section.match_indices(marker.as_str()) {
				let date = stamps.iter().find(|(start, _)| *start >= pos).map(|(_, d)| *d);
				match date {
					Some(Some(date)) if date >= cutoff => best = best.max(Some(*level)),
					Some(Some(date)) => {
						tracing::debug!(level, %date, %cutoff, "ignoring expired warning");
					}
					Some(None) => tracing::debug!(level, "ignoring warning with unparseable date"),
					None => tracing::debug!(level, "ignoring undated warning"),
				}
			}
		}
	}
	best
}

fn signature_date(caps: &Captures<'_>, site: &WikiSite) -> Option<NaiveDate> {
	let day = caps[1].parse::<u32>().ok()?;
	let month = month_id(&caps[2], site)?;
	let year = caps[3].parse::<i32>().ok()?;
	NaiveDate::from_ymd_opt(year, u32::from(month), day)
}

/// Split a page into sections at heading lines (`== ... ==`).
fn sections(page: &str) -> Vec<&str> {
	let mut starts = vec![0];
	let mut offset = 0;
	for line in page.split_inclusive('\n') {
		if offset > 0 && line.starts_with("==") {
			starts.push(offset);
		}
		offset += line.len();
	}
	starts.push(page.len());
	starts.windows(2).map(|w| &page[w[0]..w[1]]).collect()
}
