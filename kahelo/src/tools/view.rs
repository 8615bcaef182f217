use super::Session;
use anyhow::{Context, Result};
use kahelo::{
	operations::{DEFAULT_VIEW_IMAGE, view},
	tileset::TilesetArgs,
};
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

	/// output image, PNG or JPG by extension
	#[arg(long, value_name = "FILE", default_value = DEFAULT_VIEW_IMAGE, display_order = 20)]
	pub image: PathBuf,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, session: &Session) -> Result<()> {
	let spec = arguments.tileset.to_spec()?;
	let store = open_store(&arguments.store)?;
	let context = session.context();

	let (image, summary) = view(&context, store.as_ref(), &spec).await?;
	image
		.save(&arguments.image)
		.with_context(|| format!("unable to save {:?}", arguments.image))?;
	log::info!("image saved to {:?}", arguments.image);
	session.print_report(&summary);
	Ok(())
}
