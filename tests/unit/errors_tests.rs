/*!
 * Tests for error types and conversions
 */

use lexis::{AppError, PlaybackFailure, RepositoryError, SchemaError};

#[test]
fn test_schemaError_incompleteOverride_shouldListMissingValues() {
    let error = SchemaError::IncompleteOverride {
        missing: vec!["audio column", "table"],
    };
    let display = format!("{}", error);
    assert!(display.contains("audio column, table"));
}

#[test]
fn test_schemaError_tooFewColumns_shouldDisplayTableAndCount() {
    let error = SchemaError::TooFewColumns {
        table: "pairs".to_string(),
        found: 2,
    };
    let display = format!("{}", error);
    assert!(display.contains("pairs"));
    assert!(display.contains('2'));
}

#[test]
fn test_appError_fromSchemaError_shouldWrapCorrectly() {
    let app_error: AppError = SchemaError::NoTables.into();
    assert!(format!("{}", app_error).contains("Schema error"));
}

#[test]
fn test_appError_fromRepositoryError_shouldWrapCorrectly() {
    let app_error: AppError = RepositoryError::Lock("poisoned".to_string()).into();
    let display = format!("{}", app_error);
    assert!(display.contains("Repository error"));
    assert!(display.contains("poisoned"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_playbackFailure_shouldNameReference() {
    let failure = PlaybackFailure {
        reference: "a.mp3".to_string(),
        reason: "decode error".to_string(),
    };
    assert_eq!(format!("{}", failure), "Failed to play 'a.mp3': decode error");
}
