//! `import` and `export`: the same copy, seen from either store.
//!
//! The tileset is always resolved against the store named first, so `--records`
//! and `--inside` refer to the destination on import and to the source on export.

use super::Session;
use anyhow::Result;
use kahelo::{operations::transfer, tileset::TilesetArgs};
use kahelo_container::{SyncMode, TileStore, open_store};
use std::path::{Path, PathBuf};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct ImportSubcommand {
	/// tile store receiving the tiles
	#[arg(required = true)]
	pub store: PathBuf,

	/// tile store the tiles are read from
	#[arg(long, value_name = "STORE", required = true, display_order = 1)]
	pub source: PathBuf,

	#[command(flatten)]
	pub tileset: TilesetArgs,

	/// copy every tile, even the ones up to date
	#[arg(long, display_order = 20)]
	pub force: bool,
}

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct ExportSubcommand {
	/// tile store the tiles are read from
	#[arg(required = true)]
	pub store: PathBuf,

	/// tile store receiving the tiles
	#[arg(long, value_name = "STORE", required = true, display_order = 1)]
	pub dest: PathBuf,

	#[command(flatten)]
	pub tileset: TilesetArgs,

	/// copy every tile, even the ones up to date
	#[arg(long, display_order = 20)]
	pub force: bool,
}

#[derive(Clone, Copy)]
enum Anchor {
	Source,
	Dest,
}

pub fn run_import(arguments: &ImportSubcommand, session: &Session) -> Result<()> {
	copy(
		&arguments.source,
		&arguments.store,
		Anchor::Dest,
		&arguments.tileset,
		arguments.force,
		session,
	)
}

pub fn run_export(arguments: &ExportSubcommand, session: &Session) -> Result<()> {
	copy(
		&arguments.store,
		&arguments.dest,
		Anchor::Source,
		&arguments.tileset,
		arguments.force,
		session,
	)
}

#[tokio::main]
async fn copy(
	source: &Path,
	dest: &Path,
	anchor: Anchor,
	tileset: &TilesetArgs,
	force: bool,
	session: &Session,
) -> Result<()> {
	let spec = tileset.to_spec()?;
	let source = open_store(source)?;
	let dest = open_store(dest)?;
	let context = session.context();

	let anchor: &dyn TileStore = match anchor {
		Anchor::Source => source.as_ref(),
		Anchor::Dest => dest.as_ref(),
	};
	let mode = if force { SyncMode::Force } else { SyncMode::Update };
	let tiles = context.tileset_builder(anchor).build(&spec).await?;
	let summary = transfer(&context, source.as_ref(), dest.as_ref(), tiles, mode).await?;
	session.print_report(&summary);
	Ok(())
}
