/*!
 * Database connection management.
 *
 * Dictionary stores are opened read-only. Access goes through a mutex so
 * one connection (and its statement cache) can be shared by all requests,
 * with `execute_async` moving the work onto tokio's blocking pool.
 *
 * Every connection gets a Unicode-aware collation and lowercase function.
 * SQLite's own NOCASE and LIKE only fold ASCII.
 */

use log::{debug, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::models::value_to_text;
use crate::errors::RepositoryError;

/// Collation ordering text by its lowercase form
pub const TERM_COLLATION: &str = "LEXIS_NOCASE";

/// Scalar function lowercasing with full Unicode case mapping
pub const LOWER_FUNCTION: &str = "lexis_lower";

/// Default dictionary filename
const DEFAULT_DB_FILENAME: &str = "dictionary.db";

/// Default directory name under the user's data directory
const DEFAULT_DB_DIRNAME: &str = "lexis";

/// Prepared statements kept per connection
const STATEMENT_CACHE_CAPACITY: usize = 16;

/// Read-only database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open an existing dictionary file read-only
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, RepositoryError> {
        let db_path = db_path.as_ref().to_path_buf();

        if !db_path.is_file() {
            return Err(RepositoryError::Open(format!(
                "{:?} does not exist",
                db_path
            )));
        }

        info!("Opening dictionary at: {:?}", db_path);

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| RepositoryError::Open(format!("{:?}: {}", db_path, e)))?;

        Self::from_connection(conn, db_path)
    }

    /// Wrap an already open connection (in-memory fixtures, tests)
    pub fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self, RepositoryError> {
        conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);
        register_text_functions(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an empty in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, RepositoryError> {
        debug!("Creating in-memory database");
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::Open(e.to_string()))?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    /// Get the default dictionary path
    pub fn default_database_path() -> PathBuf {
        dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .map(|base| base.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a database operation with the connection
    pub fn execute<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| RepositoryError::Lock(e.to_string()))?;

        f(&conn)
    }

    /// Execute a database operation asynchronously using spawn_blocking
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| RepositoryError::Lock(e.to_string()))?;

            f(&conn)
        })
        .await
        .map_err(|e| RepositoryError::Task(e.to_string()))?
    }
}

/// Ordinal comparison of the lowercase forms, raw text breaking ties
pub fn compare_lowercase(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn register_text_functions(conn: &Connection) -> Result<(), RepositoryError> {
    conn.create_collation(TERM_COLLATION, compare_lowercase)?;
    conn.create_scalar_function(
        LOWER_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(value_to_text(ctx.get_raw(0)).map(|text| text.to_lowercase())),
    )?;
    Ok(())
}
