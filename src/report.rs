use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;

use crate::calendar::DateWindow;
use crate::clean::CleanSummary;
use crate::export::WriteSummary;

/// Renders range and result summaries on stdout. Formatting is pure; the
/// printer only decides colors and does the writing.
pub struct ReportPrinter {
    color: bool,
}

impl ReportPrinter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn print_window(&self, window: &DateWindow, reference: DateTime<Utc>) {
        println!("{}", self.cyan("Export window"));
        println!(
            "  start: {}  ({})",
            self.green(&window.start.to_rfc3339()),
            format_offset(window.start - reference, "back")
        );
        println!(
            "  end:   {}  ({})",
            self.green(&window.end.to_rfc3339()),
            format_offset(window.end - reference, "ahead")
        );
        println!("  span:  {}", self.yellow(&humanize(window.span())));
    }

    pub fn print_summary(&self, summary: &WriteSummary) {
        if summary.count == 0 {
            println!("{}", self.yellow("No events found in the export window."));
        }
        println!(
            "Wrote {} event(s) to {}",
            self.green(&summary.count.to_string()),
            summary.path.display()
        );
    }

    pub fn print_clean_summary(&self, summary: &CleanSummary) {
        println!(
            "Cleaned {} event(s) to {}",
            self.green(&summary.count.to_string()),
            summary.path.display()
        );
    }

    pub fn print_access_not_granted(&self) {
        eprintln!("{}", self.red("Calendar access not granted; nothing exported."));
    }

    fn cyan(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn yellow(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Offset of a window boundary from the reference instant, e.g.
/// "2 days back" or "1 day 12 hours ahead". A zero offset reads "now".
pub fn format_offset(offset: Duration, direction: &str) -> String {
    if offset == Duration::zero() {
        return "now".to_string();
    }
    format!("{} {}", humanize(offset.abs()), direction)
}

/// Human-readable duration: days/hours/minutes/seconds, largest unit first,
/// zero components omitted.
pub fn humanize(duration: Duration) -> String {
    let total = duration.num_seconds().abs();
    if total == 0 {
        return "0 seconds".to_string();
    }

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    for (amount, name) in [
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
        (seconds, "second"),
    ] {
        if amount == 0 {
            continue;
        }
        let plural = if amount == 1 { "" } else { "s" };
        parts.push(format!("{} {}{}", amount, name, plural));
    }
    parts.join(" ")
}
