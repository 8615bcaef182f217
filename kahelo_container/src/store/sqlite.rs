//! Connection handling shared by the SQLite stores.
//!
//! Writes are grouped into one transaction that stays open until [`SqliteDatabase::commit`].
//! The pool holds exactly one connection that is never recycled, so the open
//! transaction always belongs to the connection handed out next.

use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::{
	path::{Path, PathBuf},
	sync::{Mutex, PoisonError},
};

pub(super) struct SqliteDatabase {
	path: PathBuf,
	pool: Pool<SqliteConnectionManager>,
	in_transaction: Mutex<bool>,
}

impl SqliteDatabase {
	pub fn open(path: &Path, schema: &str) -> Result<SqliteDatabase> {
		log::debug!("open SQLite {path:?}");

		if let Some(dir) = path.parent()
			&& !dir.as_os_str().is_empty()
		{
			std::fs::create_dir_all(dir).with_context(|| format!("creating directory {dir:?}"))?;
		}

		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder()
			.max_size(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.build(manager)
			.with_context(|| format!("opening SQLite database {path:?}"))?;
		pool.get()?.execute_batch(schema)?;

		Ok(SqliteDatabase {
			path: path.to_path_buf(),
			pool,
			in_transaction: Mutex::new(false),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Connection for reading.
	pub fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
		Ok(self.pool.get()?)
	}

	/// Connection for writing, inside the pending transaction.
	pub fn write_conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
		let conn = self.pool.get()?;
		let mut in_transaction = self.in_transaction.lock().unwrap_or_else(PoisonError::into_inner);
		if !*in_transaction {
			conn.execute_batch("BEGIN")?;
			*in_transaction = true;
		}
		Ok(conn)
	}

	pub fn commit(&self) -> Result<()> {
		let mut in_transaction = self.in_transaction.lock().unwrap_or_else(PoisonError::into_inner);
		if *in_transaction {
			log::trace!("commit {:?}", self.path);
			self.pool.get()?.execute_batch("COMMIT")?;
			*in_transaction = false;
		}
		Ok(())
	}

	pub fn vacuum(&self) -> Result<()> {
		self.commit()?;
		log::debug!("vacuum {:?}", self.path);
		self.pool.get()?.execute_batch("VACUUM")?;
		Ok(())
	}
}

impl std::fmt::Debug for SqliteDatabase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SqliteDatabase").field("path", &self.path).finish()
	}
}
