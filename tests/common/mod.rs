/*!
 * Common test utilities for the lexis test suite
 */

use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

use lexis::{Dictionary, SchemaOverride};

/// A dictionary file living in its own temporary directory
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn open(&self) -> Result<Dictionary> {
        Ok(Dictionary::open(&self.path, &SchemaOverride::default())?)
    }
}

/// Creates a dictionary database from raw SQL
pub fn create_dictionary(sql: &str) -> Result<Fixture> {
    let dir = TempDir::new()?;
    let path = dir.path().join("dictionary.db");
    let conn = Connection::open(&path)?;
    conn.execute_batch(sql)?;
    drop(conn);
    Ok(Fixture { dir, path })
}

/// Creates the standard physics glossary used across tests
pub fn create_glossary() -> Result<Fixture> {
    create_dictionary(
        r#"
        CREATE TABLE glossary (term TEXT, definition TEXT, audio TEXT, link TEXT);
        INSERT INTO glossary VALUES
            ('Force', 'Force ($F$) equals mass times acceleration: $$F = ma$$', 'force.mp3  force-slow.mp3', 'https://en.wikipedia.org/wiki/Force'),
            ('acceleration', 'Rate of change of *velocity*.', NULL, NULL),
            ('Mass', 'Amount of matter.', '   ', ''),
            ('50% rule', 'Half of the whole.', NULL, NULL),
            ('half_life', 'Time for half a sample to decay.', NULL, NULL),
            ('velocity', NULL, NULL, NULL),
            ('<b>bold</b>', 'Escaped heading', NULL, NULL),
            ('מהירות', 'Velocity in Hebrew.', NULL, NULL),
            (NULL, 'Row without a term', NULL, NULL);
        CREATE TABLE zeta_unused (a TEXT, b TEXT, c TEXT);
        "#,
    )
}
