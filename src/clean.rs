use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Keys stripped from every event by the cleaning pass: identifiers and
/// bookkeeping fields that downstream consumers of the slimmed document do
/// not want.
const STRIPPED_KEYS: [&str; 9] = [
    "alarms",
    "availability",
    "calendarItemExternalIdentifier",
    "calendarItemIdentifier",
    "timeZoneIdentifier",
    "isAllDay",
    "recurrenceRules",
    "creationDate",
    "lastModifiedDate",
];

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("Failed to read export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse export file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Expected a JSON array of events, got {0}")]
    NotAnArray(&'static str),
    #[error("Expected each event to be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub path: PathBuf,
    pub count: usize,
}

/// Post-export cleaning pass.
///
/// Loads an exported document, validates it is an array of event objects,
/// strips the fixed key list from each one, and writes the result next to
/// the source as `cleaned-<name>`. Keys the document never had are simply
/// not there to strip; everything else passes through untouched.
pub fn clean(export_path: &Path) -> Result<CleanSummary, CleanError> {
    let content = fs::read_to_string(export_path)?;
    let document: Value = serde_json::from_str(&content)?;

    let events = match document {
        Value::Array(events) => events,
        other => return Err(CleanError::NotAnArray(json_type_name(&other))),
    };

    let count = events.len();
    let mut cleaned = Vec::with_capacity(count);
    for event in events {
        let mut object = match event {
            Value::Object(object) => object,
            other => return Err(CleanError::NotAnObject(json_type_name(&other))),
        };
        for key in STRIPPED_KEYS {
            object.remove(key);
        }
        cleaned.push(Value::Object(object));
    }

    let path = cleaned_path(export_path);
    let mut document = serde_json::to_vec_pretty(&Value::Array(cleaned))?;
    document.push(b'\n');
    fs::write(&path, document)?;

    Ok(CleanSummary { path, count })
}

/// Sibling path carrying a `cleaned-` prefix, e.g. `events.json` →
/// `cleaned-events.json`.
pub fn cleaned_path(export_path: &Path) -> PathBuf {
    let name = export_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    export_path.with_file_name(format!("cleaned-{}", name))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Availability, EventRecord};
    use crate::export;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn create_test_record(id: &str) -> EventRecord {
        EventRecord {
            alarms: vec![],
            attendees: vec!["Ada".to_string()],
            availability: Availability::Free,
            calendar_item_external_identifier: Some("shared-1".to_string()),
            calendar_item_identifier: id.to_string(),
            calendar_title: Some("Work".to_string()),
            creation_date: DateTime::parse_from_rfc3339("2024-03-01T08:00:00+00:00").ok(),
            end_date: None,
            is_all_day: false,
            last_modified_date: None,
            location: Some("Room 2".to_string()),
            notes: None,
            recurrence_rules: vec![],
            start_date: DateTime::parse_from_rfc3339("2024-03-15T09:00:00+00:00").ok(),
            time_zone_identifier: Some("Europe/London".to_string()),
            title: Some("Standup".to_string()),
            url: None,
        }
    }

    #[test]
    fn strips_identifier_and_bookkeeping_keys() {
        let dir = TempDir::new().unwrap();
        let export_path = dir.path().join("events.json");
        export::export(&[create_test_record("a")], &export_path).unwrap();

        let summary = clean(&export_path).unwrap();

        assert_eq!(summary.count, 1);
        let parsed: Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.path).unwrap()).unwrap();
        let object = parsed.as_array().unwrap()[0].as_object().unwrap();

        for key in STRIPPED_KEYS {
            assert!(!object.contains_key(key), "'{}' should be stripped", key);
        }
        assert_eq!(object["title"], "Standup");
        assert_eq!(object["location"], "Room 2");
        assert_eq!(object["calendarTitle"], "Work");
        assert!(object.contains_key("startDate"));
        assert!(object.contains_key("attendees"));
    }

    #[test]
    fn writes_cleaned_sibling_of_the_export() {
        let dir = TempDir::new().unwrap();
        let export_path = dir.path().join("events.json");
        export::export(&[], &export_path).unwrap();

        let summary = clean(&export_path).unwrap();

        assert_eq!(summary.path, dir.path().join("cleaned-events.json"));
        assert!(summary.path.exists());
        assert!(export_path.exists());
    }

    #[test]
    fn counts_every_event_in_the_document() {
        let dir = TempDir::new().unwrap();
        let export_path = dir.path().join("events.json");
        let records = vec![
            create_test_record("a"),
            create_test_record("b"),
            create_test_record("c"),
        ];
        export::export(&records, &export_path).unwrap();

        let summary = clean(&export_path).unwrap();

        assert_eq!(summary.count, 3);
        let parsed: Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }

    #[test]
    fn empty_export_cleans_to_empty_array() {
        let dir = TempDir::new().unwrap();
        let export_path = dir.path().join("events.json");
        export::export(&[], &export_path).unwrap();

        let summary = clean(&export_path).unwrap();

        assert_eq!(summary.count, 0);
        let content = std::fs::read_to_string(&summary.path).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn missing_export_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let result = clean(&dir.path().join("events.json"));
        assert!(matches!(result, Err(CleanError::Io(_))));
    }

    #[test]
    fn rejects_document_that_is_not_an_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{}").unwrap();

        let result = clean(&path);
        assert!(matches!(result, Err(CleanError::NotAnArray("an object"))));
    }

    #[test]
    fn rejects_event_that_is_not_an_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let result = clean(&path);
        assert!(matches!(result, Err(CleanError::NotAnObject("a number"))));
    }

    #[test]
    fn cleaned_path_prefixes_the_file_name() {
        assert_eq!(
            cleaned_path(Path::new("/tmp/out/events.json")),
            PathBuf::from("/tmp/out/cleaned-events.json")
        );
        assert_eq!(
            cleaned_path(Path::new("export.json")),
            PathBuf::from("cleaned-export.json")
        );
    }
}
