/*!
 * Dictionary entity models.
 */

use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};

/// One dictionary row as seen through the schema binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Headword
    pub term: String,
    /// Raw markdown + math definition text
    pub definition: String,
    /// Space separated audio references
    pub audio_ref: Option<String>,
    /// External reference link
    pub link_ref: Option<String>,
}

/// Convert a column value to text
///
/// Stores created by hand often hold numbers in text columns, so integers
/// and reals are rendered rather than rejected. NULL and blobs map to None.
pub fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(r) => Some(r.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}
