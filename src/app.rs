use std::path::Path;

use thiserror::Error;

use crate::calendar::DateWindow;
use crate::export::{self, ExportError, WriteSummary};
use crate::source::{CalendarSource, SourceError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(WriteSummary),
    AccessNotGranted,
}

/// Runs one export: request access, fetch everything in the window, write
/// the JSON document.
///
/// Access denial is an outcome, not an error: no fetch happens and no file
/// is written. The fetched collection is a plain return value; nothing is
/// accumulated in shared state.
pub async fn run_export(
    source: &dyn CalendarSource,
    window: DateWindow,
    output: &Path,
) -> Result<ExportOutcome, RunError> {
    match source.request_access().await {
        Ok(()) => tracing::debug!("calendar access granted"),
        Err(SourceError::AccessDenied) => {
            tracing::warn!("calendar access denied");
            return Ok(ExportOutcome::AccessNotGranted);
        }
        Err(err) => return Err(err.into()),
    }

    let records = source.events_in(window).await?;
    if records.is_empty() {
        tracing::info!("no events in window");
    }

    let summary = export::export(&records, output)?;
    tracing::info!(count = summary.count, path = %summary.path.display(), "export written");
    Ok(ExportOutcome::Written(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Availability, EventRecord};
    use crate::source::MockCalendarSource;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn test_window() -> DateWindow {
        DateWindow {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
        }
    }

    fn create_test_record(id: &str) -> EventRecord {
        EventRecord {
            alarms: vec![],
            attendees: vec![],
            availability: Availability::Busy,
            calendar_item_external_identifier: None,
            calendar_item_identifier: id.to_string(),
            calendar_title: None,
            creation_date: None,
            end_date: None,
            is_all_day: false,
            last_modified_date: None,
            location: None,
            notes: None,
            recurrence_rules: vec![],
            start_date: None,
            time_zone_identifier: None,
            title: None,
            url: None,
        }
    }

    #[tokio::test]
    async fn exports_fetched_events() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("events.json");

        let mut source = MockCalendarSource::new();
        source.expect_request_access().times(1).returning(|| Ok(()));
        source
            .expect_events_in()
            .times(1)
            .returning(|_| Ok(vec![create_test_record("a"), create_test_record("b")]));

        let outcome = run_export(&source, test_window(), &output).await.unwrap();

        match outcome {
            ExportOutcome::Written(summary) => {
                assert_eq!(summary.count, 2);
                assert!(output.exists());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn denial_skips_fetch_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("events.json");

        let mut source = MockCalendarSource::new();
        source
            .expect_request_access()
            .times(1)
            .returning(|| Err(SourceError::AccessDenied));
        source.expect_events_in().times(0);

        let outcome = run_export(&source, test_window(), &output).await.unwrap();

        assert_eq!(outcome, ExportOutcome::AccessNotGranted);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn access_error_propagates_without_fetch() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("events.json");

        let mut source = MockCalendarSource::new();
        source
            .expect_request_access()
            .times(1)
            .returning(|| Err(SourceError::Access("restricted".to_string())));
        source.expect_events_in().times(0);

        let err = run_export(&source, test_window(), &output)
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Source(SourceError::Access(_))));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn zero_events_still_write_a_valid_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("events.json");

        let mut source = MockCalendarSource::new();
        source.expect_request_access().times(1).returning(|| Ok(()));
        source.expect_events_in().times(1).returning(|_| Ok(vec![]));

        let outcome = run_export(&source, test_window(), &output).await.unwrap();

        match outcome {
            ExportOutcome::Written(summary) => assert_eq!(summary.count, 0),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_export_error() {
        let output = std::path::PathBuf::from("/nonexistent/dir/events.json");

        let mut source = MockCalendarSource::new();
        source.expect_request_access().times(1).returning(|| Ok(()));
        source
            .expect_events_in()
            .times(1)
            .returning(|_| Ok(vec![create_test_record("a")]));

        let err = run_export(&source, test_window(), &output)
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Export(ExportError::Io(_))));
    }
}
