//! CSV and JSON renderings of stored records.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Event;
use crate::error::{AppError, Result};

const EVENT_CSV_HEADER: [&str; 8] = [
    "Title",
    "Description",
    "Category",
    "Start Time",
    "End Time",
    "Location",
    "Contact Person",
    "Status",
];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// e.g. `academy-events-2024-02-15.csv`
    pub fn events_filename(&self, date: NaiveDate) -> String {
        format!("academy-events-{}.{}", date.format("%Y-%m-%d"), self.extension())
    }
}

pub fn export_events(events: &[Event], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => events_to_csv(events),
        ExportFormat::Json => to_pretty_json(events),
    }
}

pub fn events_to_csv(events: &[Event]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EVENT_CSV_HEADER).map_err(csv_error)?;

    for event in events {
        let start = event.start_time.format(TIME_FORMAT).to_string();
        let end = event.effective_end().format(TIME_FORMAT).to_string();
        writer
            .write_record([
                event.title.as_str(),
                event.description.as_str(),
                event.category.as_str(),
                start.as_str(),
                end.as_str(),
                event.location.as_deref().unwrap_or("N/A"),
                event.contact_person.as_deref().unwrap_or("N/A"),
                event.status.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV export: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV export is not UTF-8: {}", e)))
}

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(format!("Failed to encode export: {}", e)))
}

fn csv_error(err: csv::Error) -> AppError {
    AppError::Internal(format!("Failed to write CSV export: {}", err))
}
