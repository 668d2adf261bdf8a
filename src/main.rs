use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use patrol_config::config::{ConfigDocument, DocumentFormat, parse_document_file};
use patrol_config::rules::ScoreCategory;
use patrol_config::warnings::get_level;

#[derive(Parser)]
#[command(name = "patrol")]
#[command(
	author,
	version,
	about = "Inspect wiki patrol configuration and user warning levels"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the value of a configuration key
	Get {
		file: PathBuf,
		key: String,

		/// Read the key as a list, one item per line
		#[arg(long)]
		list: bool,

		/// Split legacy list items on commas
		#[arg(long, requires = "list")]
		cs: bool,

		#[arg(long, value_enum, default_value_t = FormatArg::Auto)]
		format: FormatArg,
	},
	/// Print the queue filters defined in a configuration as YAML
	Queues {
		file: PathBuf,

		/// Mark the filters as coming from a locked (site-wide) configuration
		#[arg(long)]
		locked: bool,

		#[arg(long, value_enum, default_value_t = FormatArg::Auto)]
		format: FormatArg,
	},
	/// Print the score tables defined in a configuration
	Scores {
		file: PathBuf,

		#[arg(long, value_enum, default_value_t = FormatArg::Auto)]
		format: FormatArg,
	},
	/// Print the current warning level found on a user talk page
	Level {
		/// Talk page wikitext
		page: PathBuf,

		/// Project configuration with month names and warning templates
		#[arg(long, value_name = "FILE")]
		config: PathBuf,

		/// Ignore warnings dated before this day (YYYY-MM-DD)
		#[arg(long)]
		cutoff: String,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
	Auto,
	Legacy,
	Yaml,
}

impl From<FormatArg> for DocumentFormat {
	fn from(arg: FormatArg) -> Self {
		match arg {
			FormatArg::Auto => DocumentFormat::Auto,
			FormatArg::Legacy => DocumentFormat::Legacy,
			FormatArg::Yaml => DocumentFormat::Yaml,
		}
	}
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.try_init()
		.ok();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Get {
			file,
			key,
			list,
			cs,
			format,
		} => handle_get(&file, &key, list, cs, format.into()),
		Commands::Queues {
			file,
			locked,
			format,
		} => handle_queues(&file, locked, format.into()),
		Commands::Scores { file, format } => handle_scores(&file, format.into()),
		Commands::Level {
			page,
			config,
			cutoff,
		} => handle_level(&page, &config, &cutoff),
	}
}

fn load(path: &Path, format: DocumentFormat) -> Result<ConfigDocument> {
	parse_document_file(path, format)
		.with_context(|| format!("Failed to load config {}", path.display()))
}

fn handle_get(
	path: &Path,
	key: &str,
	list: bool,
	cs: bool,
	format: DocumentFormat,
) -> Result<ExitCode> {
	let doc = load(path, format)?;

	if list {
		for item in doc.list(key, cs) {
			println!("{}", item);
		}
		return Ok(ExitCode::SUCCESS);
	}

	match doc.scalar(key) {
		Some(value) => {
			println!("{}", value);
			Ok(ExitCode::SUCCESS)
		}
		None => {
			eprintln!("{}: no value for '{}'", path.display(), key);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_queues(path: &Path, locked: bool, format: DocumentFormat) -> Result<ExitCode> {
	let doc = load(path, format)?;
	let filters = doc.queue_filters(locked);

	if filters.is_empty() {
		println!("No queues defined.");
		return Ok(ExitCode::SUCCESS);
	}

	let yaml = serde_yaml::to_string(&filters).context("Failed to serialize queue filters")?;
	print!("{}", yaml);
	Ok(ExitCode::SUCCESS)
}

fn handle_scores(path: &Path, format: DocumentFormat) -> Result<ExitCode> {
	let doc = load(path, format)?;
	let site = doc.load_site(&path.display().to_string());

	for category in ScoreCategory::ALL {
		let rules = site.scores.table(category);
		println!("# {}: {}", category.config_key(), rules.len());
		for rule in rules {
			println!("  {:>6}  {}", rule.score, rule.text);
		}
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_level(page_path: &Path, config_path: &Path, cutoff: &str) -> Result<ExitCode> {
	let cutoff = NaiveDate::parse_from_str(cutoff, "%Y-%m-%d")
		.with_context(|| format!("Invalid cutoff date '{}', expected YYYY-MM-DD", cutoff))?;
	let doc = load(config_path, DocumentFormat::Auto)?;
	let site = doc.load_site(&config_path.display().to_string());
	let page = std::fs::read_to_string(page_path)
		.with_context(|| format!("Failed to read {}", page_path.display()))?;

	match get_level(&page, cutoff, &site) {
		Some(level) => println!("{}", level),
		None => println!("none"),
	}
	Ok(ExitCode::SUCCESS)
}
