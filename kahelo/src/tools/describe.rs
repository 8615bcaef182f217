use anyhow::Result;
use kahelo::operations::{describe, display_properties};
use kahelo_container::{DeclaredFormat, StoreFormat};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// tile store: a database file or a folder
	#[arg(required = true)]
	pub store: PathBuf,

	/// storage layout: PRIMARY, LEGACY, FOLDER or FOLDER_VARIANT (kahelo, rmaps, folder, maverick)
	#[arg(long, value_name = "FORMAT")]
	pub db_format: Option<StoreFormat>,

	/// tile encoding: JPG, PNG, or SERVER to keep tiles as downloaded
	#[arg(long, value_name = "FORMAT")]
	pub tile_format: Option<DeclaredFormat>,

	/// tile server url with {x}, {y} and {z} placeholders, or OpenStreetMap / MapQuest
	#[arg(long, value_name = "URL")]
	pub url_template: Option<String>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let properties = describe(
		&arguments.store,
		arguments.db_format,
		arguments.tile_format,
		arguments.url_template.as_deref(),
	)?;
	println!("{}", display_properties(&properties));
	Ok(())
}
