use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::range::DateWindow;

/// One exported calendar event.
///
/// Fields are declared in the alphabetical order of their serialized keys so
/// serde_json emits a stable, sorted document without a canonicalization pass.
/// Absent optional values are omitted from the output, never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alarms: Vec<AlarmRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<String>,
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_item_external_identifier: Option<String>,
    pub calendar_item_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    pub is_all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_rules: Vec<RecurrenceRuleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EventRecord {
    /// Whether the event falls inside `window`, bounds inclusive.
    ///
    /// A missing start or end falls back to the other bound; an event with
    /// neither bound always matches.
    pub fn overlaps(&self, window: DateWindow) -> bool {
        let start = self.start_date.or(self.end_date);
        let end = self.end_date.or(self.start_date);
        match (start, end) {
            (Some(start), Some(end)) => {
                start.with_timezone(&Utc) <= window.end && end.with_timezone(&Utc) >= window.start
            }
            _ => true,
        }
    }
}

/// Busy/free status, serialized as the source's raw integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Availability {
    Busy,
    Free,
    Tentative,
    Unavailable,
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Busy
    }
}

impl From<Availability> for i64 {
    fn from(value: Availability) -> i64 {
        match value {
            Availability::Busy => 0,
            Availability::Free => 1,
            Availability::Tentative => 2,
            Availability::Unavailable => 3,
        }
    }
}

impl TryFrom<i64> for Availability {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Availability::Busy),
            1 => Ok(Availability::Free),
            2 => Ok(Availability::Tentative),
            3 => Ok(Availability::Unavailable),
            other => Err(format!("unknown availability value: {}", other)),
        }
    }
}

/// One reminder attached to an event.
///
/// Either the absolute trigger date or the relative offset is meaningful per
/// source convention; both fields are always present in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_date: Option<DateTime<FixedOffset>>,
    pub proximity: AlarmProximity,
    pub relative_offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_location_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_location_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum AlarmProximity {
    None,
    Enter,
    Leave,
}

impl Default for AlarmProximity {
    fn default() -> Self {
        AlarmProximity::None
    }
}

impl From<AlarmProximity> for i64 {
    fn from(value: AlarmProximity) -> i64 {
        match value {
            AlarmProximity::None => 0,
            AlarmProximity::Enter => 1,
            AlarmProximity::Leave => 2,
        }
    }
}

impl TryFrom<i64> for AlarmProximity {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AlarmProximity::None),
            1 => Ok(AlarmProximity::Enter),
            2 => Ok(AlarmProximity::Leave),
            other => Err(format!("unknown alarm proximity value: {}", other)),
        }
    }
}

/// One recurrence rule attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRuleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    pub frequency: RecurrenceFrequency,
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrence_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<RecurrenceFrequency> for i64 {
    fn from(value: RecurrenceFrequency) -> i64 {
        match value {
            RecurrenceFrequency::Daily => 0,
            RecurrenceFrequency::Weekly => 1,
            RecurrenceFrequency::Monthly => 2,
            RecurrenceFrequency::Yearly => 3,
        }
    }
}

impl TryFrom<i64> for RecurrenceFrequency {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RecurrenceFrequency::Daily),
            1 => Ok(RecurrenceFrequency::Weekly),
            2 => Ok(RecurrenceFrequency::Monthly),
            3 => Ok(RecurrenceFrequency::Yearly),
            other => Err(format!("unknown recurrence frequency value: {}", other)),
        }
    }
}
