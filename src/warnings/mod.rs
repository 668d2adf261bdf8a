//! Talk-page warning analysis.
//!
//! This module handles:
//! - Compact `key;value` items used by warning and summary configuration
//! - Working out a user's current warning level from their talk page

pub mod level;
pub mod summary;

pub use level::{get_level, month_id};
pub use summary::{
	SsItem, key_from_ss_item, value_from_ss_item, warning_summary, warning_type_key,
	warning_type_name,
};
