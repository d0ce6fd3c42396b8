/*!
 * Schema inference for dictionary stores.
 *
 * The dictionary has no fixed table contract. The first user table (in
 * lexical order) is taken and its first four columns are read positionally
 * as term, definition, audio reference and external link. An explicit
 * override skips inference entirely.
 *
 * Column roles are assigned by ordinal position, not by name, so reordering
 * the columns of the backing table silently changes which column means what.
 */

use log::{debug, info};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// Resolved mapping from dictionary roles to concrete table and columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaBinding {
    table_name: String,
    term_column: String,
    definition_column: String,
    audio_column: String,
    link_column: Option<String>,
}

impl SchemaBinding {
    /// Build a binding, rejecting roles that share a column
    pub fn new(
        table_name: impl Into<String>,
        term_column: impl Into<String>,
        definition_column: impl Into<String>,
        audio_column: impl Into<String>,
        link_column: Option<String>,
    ) -> Result<Self, SchemaError> {
        let binding = Self {
            table_name: table_name.into(),
            term_column: term_column.into(),
            definition_column: definition_column.into(),
            audio_column: audio_column.into(),
            link_column,
        };

        let mut seen: Vec<&str> = Vec::with_capacity(4);
        for column in binding.columns() {
            if seen.contains(&column) {
                return Err(SchemaError::DuplicateColumn(column.to_string()));
            }
            seen.push(column);
        }

        Ok(binding)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn term_column(&self) -> &str {
        &self.term_column
    }

    pub fn definition_column(&self) -> &str {
        &self.definition_column
    }

    pub fn audio_column(&self) -> &str {
        &self.audio_column
    }

    pub fn link_column(&self) -> Option<&str> {
        self.link_column.as_deref()
    }

    /// Bound columns in role order, link last when present
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.term_column.as_str()),
            Some(self.definition_column.as_str()),
            Some(self.audio_column.as_str()),
            self.link_column.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

impl std::fmt::Display for SchemaBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(term={}, definition={}, audio={}, link={})",
            self.table_name,
            self.term_column,
            self.definition_column,
            self.audio_column,
            self.link_column.as_deref().unwrap_or("-")
        )
    }
}

/// Explicitly supplied table and column names
///
/// Table, term, definition and audio must be supplied together or not at
/// all. The link column is always optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOverride {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub term_column: Option<String>,
    #[serde(default)]
    pub definition_column: Option<String>,
    #[serde(default)]
    pub audio_column: Option<String>,
    #[serde(default)]
    pub link_column: Option<String>,
}

impl SchemaOverride {
    /// Resolve the override into a binding
    ///
    /// Returns `Ok(None)` when no override value was supplied, so inference
    /// should run. Blank values count as not supplied. Logs nothing.
    pub fn resolve(&self) -> Result<Option<SchemaBinding>, SchemaError> {
        let required = [
            ("table", present(&self.table)),
            ("term column", present(&self.term_column)),
            ("definition column", present(&self.definition_column)),
            ("audio column", present(&self.audio_column)),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        if missing.len() == required.len() {
            if present(&self.link_column).is_some() {
                return Err(SchemaError::IncompleteOverride { missing });
            }
            return Ok(None);
        }
        if !missing.is_empty() {
            return Err(SchemaError::IncompleteOverride { missing });
        }

        let [table, term, definition, audio] = required.map(|(_, value)| value.unwrap_or_default());
        let binding = SchemaBinding::new(
            table,
            term,
            definition,
            audio,
            present(&self.link_column).map(str::to_string),
        )?;

        Ok(Some(binding))
    }

    /// Whether any value was supplied
    pub fn is_empty(&self) -> bool {
        [
            &self.table,
            &self.term_column,
            &self.definition_column,
            &self.audio_column,
            &self.link_column,
        ]
        .into_iter()
        .all(|value| present(value).is_none())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Infer a binding from a table name and its columns in declared order
///
/// Tables are expected in lexical order already; only the first is used.
pub fn infer_from_tables<T, C>(tables: &[(T, Vec<C>)]) -> Result<SchemaBinding, SchemaError>
where
    T: AsRef<str>,
    C: AsRef<str>,
{
    let (table, columns) = tables.first().ok_or(SchemaError::NoTables)?;
    let table = table.as_ref();

    if columns.len() < 3 {
        return Err(SchemaError::TooFewColumns {
            table: table.to_string(),
            found: columns.len(),
        });
    }

    SchemaBinding::new(
        table,
        columns[0].as_ref(),
        columns[1].as_ref(),
        columns[2].as_ref(),
        columns.get(3).map(|c| c.as_ref().to_string()),
    )
}

/// Infer the binding by reading SQLite metadata
pub fn infer(conn: &Connection) -> Result<SchemaBinding, SchemaError> {
    let table = first_user_table(conn)?.ok_or(SchemaError::NoTables)?;
    let columns = table_columns(conn, &table)?;
    debug!("Inspecting table '{}' with columns {:?}", table, columns);

    let binding = infer_from_tables(&[(table, columns)])?;
    info!("Inferred schema binding {}", binding);
    Ok(binding)
}

/// Use the override when supplied, otherwise infer from the store
pub fn resolve(conn: &Connection, schema_override: &SchemaOverride) -> Result<SchemaBinding, SchemaError> {
    match schema_override.resolve()? {
        Some(binding) => {
            info!("Using explicit schema binding {}", binding);
            Ok(binding)
        }
        None => infer(conn),
    }
}

fn first_user_table(conn: &Connection) -> Result<Option<String>, SchemaError> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             ORDER BY name",
        )
        .map_err(metadata_error)?;

    let mut rows = stmt.query([]).map_err(metadata_error)?;
    match rows.next().map_err(metadata_error)? {
        Some(row) => Ok(Some(row.get(0).map_err(metadata_error)?)),
        None => Ok(None),
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, SchemaError> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
        .map_err(metadata_error)?;

    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(metadata_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(metadata_error)?;

    Ok(columns)
}

fn metadata_error(error: rusqlite::Error) -> SchemaError {
    SchemaError::Metadata(error.to_string())
}

/// Quote an identifier for use in generated SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
