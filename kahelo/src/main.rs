mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use kahelo::config::Config;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// YAML configuration file. Default: kahelo.yml in the working directory, when present
	#[arg(long, global = true, value_name = "FILE", display_order = 90)]
	config: Option<PathBuf>,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Create or update the properties of a tile store
	Describe(tools::describe::Subcommand),

	/// Count the tiles of a tileset that are up to date, expired or missing in a store
	Count(tools::count::Subcommand),

	/// Download the tiles of a tileset into a store
	Insert(tools::insert::Subcommand),

	/// Copy the tiles of a tileset from another store into a store
	Import(tools::transfer::ImportSubcommand),

	/// Copy the tiles of a tileset from a store into another store
	Export(tools::transfer::ExportSubcommand),

	/// Delete the tiles of a tileset from a store
	Delete(tools::delete::Subcommand),

	/// Draw the tiles of a tileset into a single image
	View(tools::view::Subcommand),

	/// Show tile counts, sizes and extents per zoom level
	Stat(tools::stat::Subcommand),

	#[clap(alias = "server")]
	/// Serve the tiles of a store via http
	Serve(tools::serve::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	let config = Config::load(cli.config.as_deref())?;
	// progress bars would interleave with debug traces
	let show_progress = matches!(
		cli.verbose.log_level_filter(),
		LevelFilter::Error | LevelFilter::Warn | LevelFilter::Info
	);
	let session = tools::Session::new(config, show_progress);

	match &cli.command {
		Commands::Describe(arguments) => tools::describe::run(arguments),
		Commands::Count(arguments) => tools::count::run(arguments, &session),
		Commands::Insert(arguments) => tools::insert::run(arguments, &session),
		Commands::Import(arguments) => tools::transfer::run_import(arguments, &session),
		Commands::Export(arguments) => tools::transfer::run_export(arguments, &session),
		Commands::Delete(arguments) => tools::delete::run(arguments, &session),
		Commands::View(arguments) => tools::view::run(arguments, &session),
		Commands::Stat(arguments) => tools::stat::run(arguments, &session),
		Commands::Serve(arguments) => tools::serve::run(arguments, &session),
	}
}
