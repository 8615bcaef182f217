use super::Session;
use anyhow::Result;
use kahelo::{operations::count, tileset::TilesetArgs};
use kahelo_container::open_store;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// tile store: a database file or a folder
	#[arg(required = true)]
	pub store: PathBuf,

	#[command(flatten)]
	pub tileset: TilesetArgs,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, session: &Session) -> Result<()> {
	let spec = arguments.tileset.to_spec()?;
	let store = open_store(&arguments.store)?;
	let context = session.context();

	let tiles = context.tileset_builder(store.as_ref()).build(&spec).await?;
	let summary = count(&context, store.as_ref(), tiles).await?;
	session.print_report(&summary);
	Ok(())
}
