use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use asset_replace::config::{CONFIG_FILE_NAME, LoadedConfig, generate_init_template, resolve_config};
use asset_replace::loader::{load_assets, write_assets};
use asset_replace::processor::{AssetReplaceProcessor, Pipeline, ProcessContext};
use asset_replace::rules::Strategy;

#[derive(Parser)]
#[command(name = "asset-replace")]
#[command(
	author,
	version,
	about = "Rewrite asset URLs and paths in HTML, CSS and JS files"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Config file (default: nearest .asset-replace.toml)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Report files that would change without writing them
	#[arg(long)]
	dry_run: bool,

	/// Enable debug logging
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Create a template .asset-replace.toml in DIR
	#[arg(long)]
	init: bool,

	/// Overwrite existing .asset-replace.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Asset directory
	#[arg(value_name = "DIR", default_value = ".")]
	dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration
	Show,
	/// Check the config file for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logger(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logger(verbose: bool) {
	let level = if verbose {
		LevelFilter::Debug
	} else {
		LevelFilter::Info
	};

	env_logger::Builder::new()
		.filter_level(level)
		.parse_default_env()
		.format_timestamp(None)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if cli.init {
		return handle_init(&cli.dir, cli.force);
	}

	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&cli.dir, cli.config.as_deref()),
				ConfigAction::Validate => handle_config_validate(&cli.dir, cli.config.as_deref()),
			},
		};
	}

	handle_rewrite(&cli.dir, cli.config.as_deref(), cli.dry_run)
}

fn handle_init(dir: &Path, force: bool) -> Result<ExitCode> {
	let config_path = dir.join(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {}", config_path.display());
	Ok(ExitCode::SUCCESS)
}

fn load(dir: &Path, explicit: Option<&Path>) -> Result<Option<LoadedConfig>> {
	// Discovery walks up, so start from the absolute directory
	let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	resolve_config(&start, explicit).context("Failed to load configuration")
}

fn handle_config_show(dir: &Path, explicit: Option<&Path>) -> Result<ExitCode> {
	let Some(loaded) = load(dir, explicit)? else {
		println!("No configuration file found.");
		return Ok(ExitCode::SUCCESS);
	};

	let processor = AssetReplaceProcessor::from_config(&loaded.config)
		.context("Failed to compile replacers")?;

	println!("# Source: {}", loaded.path.display());
	println!("# parse-inline: {}", loaded.config.parse_inline);
	println!("# replacers: {}", processor.replacers().len());
	println!();

	for (i, replacer) in processor.replacers().iter().enumerate() {
		println!("  Replacer {}:", i + 1);
		println!("    type: {}", replacer.rule_type());
		println!("    strategy: {}", describe_strategy(replacer.strategy()));
		if replacer.files().is_some() {
			println!("    files: restricted");
		}
		if replacer.path() {
			println!("    path: true");
		}
		for rule in replacer.rules() {
			if let Some(ref tag) = rule.tag {
				if tag.rewrites_content() {
					println!("    tag: {} (content)", tag.tag);
				} else {
					println!("    tag: {} [{}]", tag.tag, tag.attrs.join(", "));
				}
			}
			if let Some(ref sub) = rule.substitution {
				println!("    substitution: {} -> {}", sub.pattern, sub.replacement);
			}
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn describe_strategy(strategy: Strategy) -> &'static str {
	match strategy {
		Strategy::Specialized(_) => "url rewriter",
		Strategy::RuleBased => "rules",
		Strategy::Custom => "custom replacer",
		Strategy::Noop => "none",
	}
}

fn handle_config_validate(dir: &Path, explicit: Option<&Path>) -> Result<ExitCode> {
	let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	let loaded = match resolve_config(&start, explicit) {
		Ok(Some(loaded)) => loaded,
		Ok(None) => {
			println!("No configuration file found.");
			return Ok(ExitCode::SUCCESS);
		}
		Err(e) => {
			eprintln!("Configuration error: {e}");
			return Ok(ExitCode::FAILURE);
		}
	};

	match AssetReplaceProcessor::from_config(&loaded.config) {
		Ok(processor) => {
			println!(
				"Configuration is valid: {} ({} replacers)",
				loaded.path.display(),
				processor.replacers().len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_rewrite(dir: &Path, explicit: Option<&Path>, dry_run: bool) -> Result<ExitCode> {
	let config = match load(dir, explicit)? {
		Some(loaded) => {
			info!("Using {}", loaded.path.display());
			loaded.config
		}
		None => {
			info!("No {CONFIG_FILE_NAME} found, nothing to rewrite");
			Default::default()
		}
	};

	let mut processor =
		AssetReplaceProcessor::from_config(&config).context("Failed to compile replacers")?;

	let files = load_assets(dir).with_context(|| format!("Failed to load {}", dir.display()))?;
	let context = ProcessContext {
		root: Some(dir.to_path_buf()),
	};
	let mut pipeline = Pipeline::new(files, context);

	let report = pipeline
		.run(&mut processor)
		.context("Failed to rewrite assets")?;

	for &index in &report.changed {
		let path = &pipeline.files()[index].path;
		if dry_run {
			println!("would rewrite {path}");
		} else {
			println!("rewrote {path}");
		}
	}

	if !dry_run {
		write_assets(dir, pipeline.files(), &report.changed).context("Failed to write assets")?;
	}

	Ok(ExitCode::SUCCESS)
}
