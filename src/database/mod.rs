/*!
 * Database module for read-only dictionary access.
 *
 * This module provides the SQLite side of the dictionary:
 * - Schema inference over an arbitrary table
 * - Read-only connection handling
 * - Term listing, substring search and exact lookup
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::TermRecord;
pub use repository::{RepositoryContext, TermRepository, MAX_LIST_RESULTS};
pub use schema::{SchemaBinding, SchemaOverride};
