//! A bounded [`deadpool_sqlite`] pool with the store's connection setup.
//!
//! At most `size` connections exist; a caller waits for one at most
//! `acquire_timeout` and then fails with [`Error::PoolTimeout`]. Work runs on
//! a blocking thread through [`Pool::run`], and the connection goes back to
//! the pool when it returns, on success or failure alike.

use std::{path::Path, time::Duration};

use deadpool_sqlite::{Config, Object, PoolConfig, PoolError, Runtime};

use crate::{
  Error, Result,
  schema::{CONNECTION_PRAGMAS, SCHEMA},
};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Sizing for [`Pool`].
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
  /// Upper bound on open connections.
  pub size:            usize,
  /// Longest a caller waits for a free connection.
  pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
  fn default() -> Self {
    Self { size: 10, acquire_timeout: Duration::from_secs(5) }
  }
}

#[derive(Clone)]
pub struct Pool {
  inner:           deadpool_sqlite::Pool,
  acquire_timeout: Duration,
}

impl Pool {
  /// Build a pool over the database file at `path` and apply the schema.
  pub async fn open(path: &Path, options: PoolOptions) -> Result<Self> {
    let pool = Self::build(Config::new(path), options)?;
    pool.run(|conn| conn.execute_batch(SCHEMA)).await?;
    tracing::debug!(
      size = options.size,
      path = %path.display(),
      "opened sqlite pool"
    );
    Ok(pool)
  }

  /// A single-connection pool over a private in-memory database. The one
  /// connection is kept for the pool's lifetime, and with it the data.
  pub async fn open_in_memory(acquire_timeout: Duration) -> Result<Self> {
    let options = PoolOptions { size: 1, acquire_timeout };
    let pool = Self::build(Config::new(":memory:"), options)?;
    pool.run(|conn| conn.execute_batch(SCHEMA)).await?;
    Ok(pool)
  }

  fn build(mut config: Config, options: PoolOptions) -> Result<Self> {
    let mut pool_config = PoolConfig::new(options.size.max(1));
    pool_config.timeouts.wait = Some(options.acquire_timeout);
    config.pool = Some(pool_config);

    let inner = config
      .create_pool(Runtime::Tokio1)
      .map_err(|e| Error::Build(e.to_string()))?;
    Ok(Self { inner, acquire_timeout: options.acquire_timeout })
  }

  /// Check out a connection. It returns to the pool when dropped.
  pub async fn acquire(&self) -> Result<Object> {
    self.inner.get().await.map_err(|e| match e {
      PoolError::Timeout(_) => {
        tracing::warn!(
          timeout = ?self.acquire_timeout,
          "timed out waiting for a database connection"
        );
        Error::PoolTimeout(self.acquire_timeout)
      }
      PoolError::Closed => Error::PoolClosed,
      other => Error::Pool(other.to_string()),
    })
  }

  /// Run `f` against a pooled connection on a blocking thread.
  pub async fn run<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let conn = self.acquire().await?;
    let value = conn
      .interact(move |conn| {
        configure(conn)?;
        f(conn)
      })
      .await
      .map_err(|e| Error::Interact(format!("{e:?}")))??;
    Ok(value)
  }

  /// Number of open connections not currently checked out.
  pub fn idle_count(&self) -> usize {
    let available = self.inner.status().available;
    usize::try_from(available).unwrap_or(0)
  }
}

/// Settings that live on the connection rather than in the file. Cheap, and
/// applied before every unit of work so a freshly opened connection is never
/// used bare.
fn configure(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.busy_timeout(BUSY_TIMEOUT)?;
  conn.execute_batch(CONNECTION_PRAGMAS)
}
