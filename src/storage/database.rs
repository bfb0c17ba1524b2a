//! SQLite database holding the results table
//!
//! [`Database`] owns at most one connection. Everything tied to it (the
//! busy timeout used as the statement timeout, the cached insert statement)
//! lives and dies with that connection.

use rusqlite::{params, Connection, ErrorCode};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{self, ConnectionSettings, DbConfig, SQLITE_MEMORY_TARGET, SQLITE_SCHEME};
use crate::model::{MatchResult, ValidationError};

/// Longest time a statement waits on a locked database
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

const SQL_CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS Resultados (\
    nombre_local TEXT NOT NULL, \
    nombre_visitante TEXT NOT NULL, \
    resultado TEXT NOT NULL)";

const SQL_INSERT: &str = "INSERT INTO Resultados VALUES (?1, ?2, ?3)";

const SQL_SELECT_ALL: &str =
    "SELECT nombre_local, nombre_visitante, resultado FROM Resultados ORDER BY rowid";

const SQL_DELETE_ALL: &str = "DELETE FROM Resultados";

const SQL_VACUUM: &str = "VACUUM";

/// Coarse classification of a [`DataAccessError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConnectionFailed,
    NotOpen,
    Query,
    Timeout,
    Validation,
    Close,
}

/// Errors raised by [`Database`] operations
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("{target}: unsupported connection target")]
    UnsupportedTarget { target: String },

    #[error("{target}: connection failed: {source}")]
    ConnectionFailed {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database connection is not open")]
    NotOpen,

    #[error("error {context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("timed out {context}: {source}")]
    Timeout {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid stored match: {0}")]
    Validation(#[from] ValidationError),

    #[error("error closing connection: {0}")]
    Close(#[source] rusqlite::Error),
}

impl DataAccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataAccessError::UnsupportedTarget { .. } | DataAccessError::ConnectionFailed { .. } => {
                ErrorKind::ConnectionFailed
            }
            DataAccessError::NotOpen => ErrorKind::NotOpen,
            DataAccessError::Query { .. } => ErrorKind::Query,
            DataAccessError::Timeout { .. } => ErrorKind::Timeout,
            DataAccessError::Validation(_) => ErrorKind::Validation,
            DataAccessError::Close(_) => ErrorKind::Close,
        }
    }

    /// Wrap a driver error, separating lock timeouts from other failures
    fn driver(context: &'static str, source: rusqlite::Error) -> Self {
        match source.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                DataAccessError::Timeout { context, source }
            }
            _ => DataAccessError::Query { context, source },
        }
    }
}

/// Open the store named by `settings.target` and create the results table
fn connect(settings: &ConnectionSettings) -> Result<Connection, DataAccessError> {
    let target = settings.target.as_str();
    let failed = |source| DataAccessError::ConnectionFailed {
        target: target.to_string(),
        source,
    };

    let conn = if target == SQLITE_MEMORY_TARGET {
        Connection::open_in_memory().map_err(failed)?
    } else {
        match target.strip_prefix(SQLITE_SCHEME) {
            Some(path) if !path.is_empty() => Connection::open(path).map_err(failed)?,
            _ => {
                return Err(DataAccessError::UnsupportedTarget {
                    target: target.to_string(),
                })
            }
        }
    };

    if !settings.user.is_empty() || !settings.password.is_empty() {
        debug!("SQLite ignores credentials configured for {}", target);
    }

    conn.busy_timeout(QUERY_TIMEOUT).map_err(failed)?;
    conn.execute_batch(SQL_CREATE_TABLE).map_err(failed)?;
    info!("Opened database {}", target);

    Ok(conn)
}

/// Access to the `Resultados` table.
///
/// Lifecycle is `new` → [`open`](Self::open) → any number of reads and
/// writes → [`close`](Self::close). Operations after `close` fail with
/// [`ErrorKind::NotOpen`]. Dropping the value closes it as well.
///
/// Not meant to be shared between threads without external locking.
pub struct Database {
    config: DbConfig,
    /// Live connection; its statement cache holds the insert statement
    conn: Option<Connection>,
}

impl Database {
    /// Load the configuration at `config_path`, or create one pointing at
    /// `database` when it cannot be loaded. Never fails.
    pub fn new(config_path: &Path, database: &Path) -> Self {
        let config = match config::load_config(config_path) {
            Ok(config) => {
                debug!("Loaded configuration from {:?}", config_path);
                config
            }
            Err(e) => {
                warn!("Error loading configuration: {}", e);
                config::create_config(config_path, database)
            }
        };
        Self::with_config(config)
    }

    /// Use an already loaded configuration
    pub fn with_config(config: DbConfig) -> Self {
        Self { config, conn: None }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the connection and create the results table if absent.
    ///
    /// Calling it again while open returns the existing connection.
    pub fn open(&mut self) -> Result<&Connection, DataAccessError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => connect(&self.config.connection)?,
        };
        Ok(&*self.conn.insert(conn))
    }

    fn connection(&self) -> Result<&Connection, DataAccessError> {
        self.conn.as_ref().ok_or(DataAccessError::NotOpen)
    }

    /// Replace the contents of `into` with every stored match, in insertion
    /// order, and return how many there are.
    ///
    /// On error `into` is left empty.
    pub fn read(&self, into: &mut Vec<MatchResult>) -> Result<usize, DataAccessError> {
        into.clear();
        let results = load_all(self.connection()?)?;
        into.extend(results);
        Ok(into.len())
    }

    /// Insert one match, returning the number of rows affected
    pub fn insert(&mut self, record: &MatchResult) -> Result<usize, DataAccessError> {
        let mut stmt = self
            .connection()?
            .prepare_cached(SQL_INSERT)
            .map_err(|e| DataAccessError::driver("preparing insert", e))?;

        let rows = stmt
            .execute(params![
                record.home_team(),
                record.away_team(),
                record.outcome().token()
            ])
            .map_err(|e| DataAccessError::driver("inserting match", e))?;
        Ok(rows)
    }

    /// Insert every record in order, returning the total rows affected.
    ///
    /// Stops at the first failure. Rows inserted before it are kept: there
    /// is no enclosing transaction.
    pub fn write_batch(&mut self, records: &[MatchResult]) -> Result<usize, DataAccessError> {
        self.connection()?;

        let mut rows = 0;
        for record in records {
            rows += self.insert(record)?;
        }
        Ok(rows)
    }

    /// Delete every stored match, returning the number removed
    pub fn clear(&self) -> Result<usize, DataAccessError> {
        self.connection()?
            .execute(SQL_DELETE_ALL, [])
            .map_err(|e| DataAccessError::driver("clearing results", e))
    }

    /// Reclaim unused space in the database file
    pub fn compact(&self) -> Result<(), DataAccessError> {
        self.connection()?
            .execute_batch(SQL_VACUUM)
            .map_err(|e| DataAccessError::driver("compacting database", e))
    }

    /// Close the connection. Does nothing if it is not open.
    ///
    /// The handle counts as closed even when this returns an error.
    pub fn close(&mut self) -> Result<(), DataAccessError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        debug!("Closing database {}", self.config.connection.target);
        conn.close()
            .map_err(|(_conn, e)| DataAccessError::Close(e))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("{}", e);
        }
    }
}

fn load_all(conn: &Connection) -> Result<Vec<MatchResult>, DataAccessError> {
    let read_error = |e| DataAccessError::driver("reading results", e);

    let mut stmt = conn.prepare(SQL_SELECT_ALL).map_err(read_error)?;
    let mut rows = stmt.query([]).map_err(read_error)?;

    let mut results = Vec::new();
    while let Some(row) = rows.next().map_err(read_error)? {
        let home: String = row.get(0).map_err(read_error)?;
        let away: String = row.get(1).map_err(read_error)?;
        let token: String = row.get(2).map_err(read_error)?;
        results.push(MatchResult::from_strings(&home, &away, &token)?);
    }
    Ok(results)
}
