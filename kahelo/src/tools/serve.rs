use super::Session;
use anyhow::Result;
use kahelo::server::TileServer;
use kahelo_container::{TileStore, open_store};
use std::{path::PathBuf, sync::Arc};
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// tile store: a database file or a folder
	#[arg(required = true)]
	pub store: PathBuf,

	/// Serve via port on 127.0.0.1. Default: server.port of the configuration, 80
	#[arg(short, long)]
	pub port: Option<u16>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, session: &Session) -> Result<()> {
	let mut server_config = session.config().server.clone();
	server_config.override_optional_port(&arguments.port);

	let store: Arc<dyn TileStore> = Arc::from(open_store(&arguments.store)?);
	let jpeg_quality = session.config().tiles.jpeg_quality;
	let mut server = TileServer::new("127.0.0.1", server_config.port, store, jpeg_quality);
	let port = server.start().await?;
	eprintln!("serving {:?} at http://127.0.0.1:{port}/{{zoom}}/{{x}}/{{y}}.jpg", arguments.store);

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		tokio::signal::ctrl_c().await?;
	}
	server.stop().await;
	Ok(())
}
