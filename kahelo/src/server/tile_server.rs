use anyhow::{Context, Result};
use axum::{
	Router,
	extract::{Path, State},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
	routing::get,
};
use kahelo_container::{TileFormat, TileStore, encode};
use kahelo_core::TileCoord;
use std::sync::Arc;
use tokio::sync::{Mutex, oneshot::Sender};

/// Serves `GET /{zoom}/{x}/{y}.jpg` from a store, one request at a time.
pub struct TileServer {
	ip: String,
	port: u16,
	store: Arc<dyn TileStore>,
	jpeg_quality: u8,
	exit_signal: Option<Sender<()>>,
}

#[derive(Clone)]
struct ServerState {
	store: Arc<dyn TileStore>,
	jpeg_quality: u8,
	serial: Arc<Mutex<()>>,
}

impl TileServer {
	pub fn new(ip: &str, port: u16, store: Arc<dyn TileStore>, jpeg_quality: u8) -> TileServer {
		TileServer {
			ip: ip.to_owned(),
			port,
			store,
			jpeg_quality,
			exit_signal: None,
		}
	}

	/// Start listening; port 0 picks a free port. Returns the bound port.
	pub async fn start(&mut self) -> Result<u16> {
		if self.exit_signal.is_some() {
			self.stop().await;
		}

		let state = ServerState {
			store: Arc::clone(&self.store),
			jpeg_quality: self.jpeg_quality,
			serial: Arc::new(Mutex::new(())),
		};
		let router = Router::new()
			.route("/{zoom}/{x}/{file}", get(serve_tile))
			.with_state(state);

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = tokio::net::TcpListener::bind(&addr)
			.await
			.with_context(|| format!("unable to listen on {addr}"))?;
		self.port = listener.local_addr()?.port();
		log::info!("tile server listening on {}:{}", self.ip, self.port);

		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		tokio::spawn(async move {
			let served = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await;
			if let Err(e) = served {
				log::error!("tile server failed: {e}");
			}
		});

		self.exit_signal = Some(tx);
		Ok(self.port)
	}

	pub async fn stop(&mut self) {
		let Some(exit_signal) = self.exit_signal.take() else {
			return;
		};
		log::info!("stopping tile server");
		exit_signal.send(()).ok();
	}

	#[must_use]
	pub fn port(&self) -> u16 {
		self.port
	}
}

fn parse_tile_path(zoom: &str, x: &str, file: &str) -> Option<TileCoord> {
	let y = file.strip_suffix(".jpg")?;
	TileCoord::new(zoom.parse().ok()?, x.parse().ok()?, y.parse().ok()?).ok()
}

async fn serve_tile(State(state): State<ServerState>, Path((zoom, x, file)): Path<(String, String, String)>) -> Response {
	let Some(coord) = parse_tile_path(&zoom, &x, &file) else {
		return error_404();
	};
	let _serial = state.serial.lock().await;

	let image = match state.store.retrieve(&coord).await {
		Ok(Some((_, image))) => image,
		Ok(None) => {
			log::debug!("tile {coord}: not found");
			return error_404();
		}
		Err(e) => {
			log::debug!("tile {coord}: {e:#}");
			return error_404();
		}
	};
	match encode(&image, TileFormat::JPG, state.jpeg_quality) {
		Ok(blob) => {
			log::debug!("tile {coord}: served");
			(StatusCode::OK, [(header::CONTENT_TYPE, "image/jpeg")], blob.into_vec()).into_response()
		}
		Err(e) => {
			log::warn!("tile {coord}: {e:#}");
			(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
		}
	}
}

fn error_404() -> Response {
	(StatusCode::NOT_FOUND, "file not found").into_response()
}
