use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::calendar::{
    AlarmProximity, AlarmRecord, Availability, DateWindow, EventRecord, RecurrenceFrequency,
    RecurrenceRuleRecord,
};
use crate::source::{CalendarSource, SourceError};

/// Calendar source backed by a local JSON store file.
pub struct LocalStore {
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    calendars: Vec<StoredCalendar>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCalendar {
    title: String,
    #[serde(default)]
    events: Vec<StoredEvent>,
}

/// Native event shape as the store persists it. Mapped field-by-field into
/// `EventRecord`; the mapping is total, absent fields stay absent.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEvent {
    id: String,
    external_id: Option<String>,
    title: Option<String>,
    location: Option<String>,
    notes: Option<String>,
    url: Option<String>,
    time_zone: Option<String>,
    created: Option<DateTime<FixedOffset>>,
    modified: Option<DateTime<FixedOffset>>,
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    all_day: bool,
    #[serde(default)]
    availability: Availability,
    #[serde(default)]
    attendees: Vec<String>,
    #[serde(default)]
    alarms: Vec<StoredAlarm>,
    #[serde(default)]
    recurrence: Vec<StoredRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAlarm {
    date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    offset_seconds: f64,
    #[serde(default)]
    proximity: AlarmProximity,
    location_title: Option<String>,
    location_radius: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRule {
    frequency: RecurrenceFrequency,
    #[serde(default = "default_interval")]
    interval: u32,
    until: Option<DateTime<FixedOffset>>,
    count: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calexport")
            .join("store.json")
    }

    fn load(&self) -> Result<StoreDocument, SourceError> {
        let content = std::fs::read_to_string(&self.path)?;
        let document: StoreDocument = serde_json::from_str(&content)?;
        Ok(document)
    }
}

fn map_event(calendar_title: &str, event: &StoredEvent) -> EventRecord {
    EventRecord {
        alarms: event.alarms.iter().map(map_alarm).collect(),
        attendees: event.attendees.clone(),
        availability: event.availability,
        calendar_item_external_identifier: event.external_id.clone(),
        calendar_item_identifier: event.id.clone(),
        calendar_title: Some(calendar_title.to_string()),
        creation_date: event.created,
        end_date: event.end,
        is_all_day: event.all_day,
        last_modified_date: event.modified,
        location: event.location.clone(),
        notes: event.notes.clone(),
        recurrence_rules: event.recurrence.iter().map(map_rule).collect(),
        start_date: event.start,
        time_zone_identifier: event.time_zone.clone(),
        title: event.title.clone(),
        url: event.url.clone(),
    }
}

fn map_alarm(alarm: &StoredAlarm) -> AlarmRecord {
    AlarmRecord {
        absolute_date: alarm.date,
        proximity: alarm.proximity,
        relative_offset: alarm.offset_seconds,
        structured_location_radius: alarm.location_radius,
        structured_location_title: alarm.location_title.clone(),
    }
}

fn map_rule(rule: &StoredRule) -> RecurrenceRuleRecord {
    RecurrenceRuleRecord {
        end_date: rule.until,
        frequency: rule.frequency,
        interval: rule.interval,
        occurrence_count: rule.count,
    }
}

#[async_trait]
impl CalendarSource for LocalStore {
    async fn request_access(&self) -> Result<(), SourceError> {
        let path = self.path.clone();
        let probe = task::spawn_blocking(move || std::fs::metadata(&path).map(|_| ()));

        match probe.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) if err.kind() == ErrorKind::PermissionDenied => {
                Err(SourceError::AccessDenied)
            }
            Ok(Err(err)) => Err(SourceError::Access(err.to_string())),
            Err(err) => Err(SourceError::Access(err.to_string())),
        }
    }

    async fn events_in(&self, window: DateWindow) -> Result<Vec<EventRecord>, SourceError> {
        let document = self.load()?;

        let mut records = Vec::new();
        for calendar in &document.calendars {
            for event in &calendar.events {
                let record = map_event(&calendar.title, event);
                if record.overlaps(window) {
                    records.push(record);
                }
            }
        }

        tracing::debug!(count = records.len(), "events matched window");
        Ok(records)
    }
}
