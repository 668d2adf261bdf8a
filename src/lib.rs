//! Patrol config - configuration and talk-page parsing for a wiki patrol tool.
//!
//! This library provides:
//! - Typed, default-aware extraction from YAML trees and the legacy `key:value` text format
//! - Queue filter definitions and vandalism score tables built from project configuration
//! - Per-site month names and warning vocabulary
//! - Warning level detection from user talk pages
//!
//! # Example
//!
//! ```no_run
//! use patrol_config::config::{DocumentFormat, parse_document_file};
//! use patrol_config::warnings::get_level;
//! use chrono::NaiveDate;
//! use std::path::Path;
//!
//! let doc = parse_document_file(Path::new("project.yaml"), DocumentFormat::Auto).unwrap();
//! let site = doc.load_site("en.wikipedia");
//! let queues = doc.queue_filters(true);
//! println!("{} queues, {} score rules", queues.len(), site.scores.len());
//!
//! let page = std::fs::read_to_string("talk.txt").unwrap();
//! let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! if let Some(level) = get_level(&page, cutoff, &site) {
//!     println!("current warning level: {level}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod site;
pub mod warnings;

pub use error::{ExtractIssue, PatrolError, Result};
