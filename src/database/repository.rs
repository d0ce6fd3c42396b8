/*!
 * Repository layer for dictionary lookups.
 *
 * All queries are read-only. The SQL is generated once from the schema
 * binding when the context is built and executed through the connection's
 * prepared statement cache afterwards.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use super::connection::{DatabaseConnection, LOWER_FUNCTION, TERM_COLLATION};
use super::models::{value_to_text, TermRecord};
use super::schema::{self, quote_identifier, SchemaBinding, SchemaOverride};
use crate::errors::{AppError, RepositoryError, SchemaError};

/// Upper bound on the number of terms a listing returns
pub const MAX_LIST_RESULTS: usize = 10_000;

/// Escape character used in LIKE patterns
const LIKE_ESCAPE: char = '\\';

/// SQL generated for a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQueries {
    /// Every non-null term, sorted
    pub list_all: String,
    /// Terms matching an escaped LIKE pattern, sorted
    pub search: String,
    /// One full record by exact term
    pub get_one: String,
}

impl TermQueries {
    /// Build the statements for a binding
    pub fn for_binding(binding: &SchemaBinding) -> Self {
        let table = quote_identifier(binding.table_name());
        let term = quote_identifier(binding.term_column());
        let definition = quote_identifier(binding.definition_column());
        let audio = quote_identifier(binding.audio_column());
        let link = binding
            .link_column()
            .map(quote_identifier)
            .unwrap_or_else(|| "NULL".to_string());

        Self {
            list_all: format!(
                "SELECT {term} FROM {table} WHERE {term} IS NOT NULL \
                 ORDER BY {term} COLLATE {TERM_COLLATION} ASC LIMIT ?1"
            ),
            search: format!(
                "SELECT {term} FROM {table} \
                 WHERE {LOWER_FUNCTION}({term}) LIKE ?1 ESCAPE '{LIKE_ESCAPE}' \
                 ORDER BY {term} COLLATE {TERM_COLLATION} ASC LIMIT ?2"
            ),
            get_one: format!(
                "SELECT {term}, {definition}, {audio}, {link} FROM {table} \
                 WHERE {term} = ?1 LIMIT 1"
            ),
        }
    }
}

/// Store handle, binding and prepared queries, built once at startup
#[derive(Clone)]
pub struct RepositoryContext {
    db: DatabaseConnection,
    binding: Arc<SchemaBinding>,
    queries: Arc<TermQueries>,
}

impl RepositoryContext {
    /// Create a context for an already resolved binding
    pub fn new(db: DatabaseConnection, binding: SchemaBinding) -> Self {
        let queries = TermQueries::for_binding(&binding);
        debug!("Prepared dictionary queries: {:?}", queries);

        Self {
            db,
            binding: Arc::new(binding),
            queries: Arc::new(queries),
        }
    }

    /// Resolve the binding against a connection and build the context
    pub fn with_connection(
        db: DatabaseConnection,
        schema_override: &SchemaOverride,
    ) -> Result<Self, SchemaError> {
        let binding = db.execute(|conn| schema::resolve(conn, schema_override))?;
        Ok(Self::new(db, binding))
    }

    /// Open a dictionary file and resolve its binding
    pub fn open<P: AsRef<Path>>(
        db_path: P,
        schema_override: &SchemaOverride,
    ) -> Result<Self, AppError> {
        let db = DatabaseConnection::open(db_path)?;
        Ok(Self::with_connection(db, schema_override)?)
    }

    pub fn binding(&self) -> &SchemaBinding {
        &self.binding
    }

}

/// Read-only query surface over the bound dictionary table
#[derive(Clone)]
pub struct TermRepository {
    context: RepositoryContext,
}

impl TermRepository {
    /// Create a repository over a context
    pub fn new(context: RepositoryContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RepositoryContext {
        &self.context
    }

    /// List terms, optionally filtered by a case-insensitive substring
    ///
    /// An empty query lists every term. Results are sorted ascending by their
    /// lowercase form and capped at [`MAX_LIST_RESULTS`]. Case folding covers
    /// all of Unicode, not only ASCII.
    pub async fn list_terms(&self, query: &str) -> Result<Vec<String>, RepositoryError> {
        let queries = self.context.queries.clone();
        let query = query.to_string();

        self.context
            .db
            .execute_async(move |conn| Self::list_terms_sync(conn, &queries, &query))
            .await
    }

    /// Fetch one record by exact (case-sensitive) term
    pub async fn get_term(&self, term: &str) -> Result<Option<TermRecord>, RepositoryError> {
        let queries = self.context.queries.clone();
        let term = term.to_string();

        self.context
            .db
            .execute_async(move |conn| Self::get_term_sync(conn, &queries, &term))
            .await
    }

    /// Listing on an already locked connection
    pub fn list_terms_sync(
        conn: &Connection,
        queries: &TermQueries,
        query: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let limit = MAX_LIST_RESULTS as i64;

        let terms = if query.is_empty() {
            let mut stmt = conn.prepare_cached(&queries.list_all)?;
            let rows = stmt
                .query_map(params![limit], |row| Ok(value_to_text(row.get_ref(0)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        } else {
            let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
            let mut stmt = conn.prepare_cached(&queries.search)?;
            let rows = stmt
                .query_map(params![pattern, limit], |row| Ok(value_to_text(row.get_ref(0)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let terms: Vec<String> = terms.into_iter().flatten().collect();
        debug!("Listed {} term(s) for query {:?}", terms.len(), query);
        Ok(terms)
    }

    /// Lookup on an already locked connection
    pub fn get_term_sync(
        conn: &Connection,
        queries: &TermQueries,
        term: &str,
    ) -> Result<Option<TermRecord>, RepositoryError> {
        let mut stmt = conn.prepare_cached(&queries.get_one)?;
        let record = stmt
            .query_row([term], |row| {
                Ok(TermRecord {
                    term: value_to_text(row.get_ref(0)?).unwrap_or_default(),
                    definition: value_to_text(row.get_ref(1)?).unwrap_or_default(),
                    audio_ref: value_to_text(row.get_ref(2)?),
                    link_ref: value_to_text(row.get_ref(3)?),
                })
            })
            .optional()?;

        debug!("Lookup of {:?} found: {}", term, record.is_some());
        Ok(record)
    }
}

/// Escape LIKE metacharacters so user input only ever matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
