pub mod app;
pub mod calendar;
pub mod clean;
pub mod export;
pub mod report;
pub mod source;
pub mod storage;

pub use app::{ExportOutcome, RunError, run_export};
pub use calendar::{DateUnit, DateWindow, EventRecord, RangeError};
pub use clean::{CleanError, CleanSummary};
pub use export::{ExportError, WriteSummary};
pub use source::{CalendarSource, LocalStore, SourceError};
