pub mod event;
pub mod range;

pub use event::{
    AlarmProximity, AlarmRecord, Availability, EventRecord, RecurrenceFrequency,
    RecurrenceRuleRecord,
};
pub use range::{DateUnit, DateWindow, RangeError};
