use super::Session;
use anyhow::Result;
use kahelo::{fetch::HttpFetcher, operations::insert, tileset::TilesetArgs};
use kahelo_container::{SyncMode, open_store};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// tile store: a database file or a folder
	#[arg(required = true)]
	pub store: PathBuf,

	#[command(flatten)]
	pub tileset: TilesetArgs,

	/// download every tile, even the ones up to date
	#[arg(long, display_order = 20)]
	pub force: bool,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, session: &Session) -> Result<()> {
	let spec = arguments.tileset.to_spec()?;
	let store = open_store(&arguments.store)?;
	let fetcher = HttpFetcher::new()?;
	let context = session.context();

	let mode = if arguments.force { SyncMode::Force } else { SyncMode::Update };
	let tiles = context.tileset_builder(store.as_ref()).build(&spec).await?;
	let summary = insert(&context, store.as_ref(), tiles, &fetcher, mode).await?;
	session.print_report(&summary);
	Ok(())
}
