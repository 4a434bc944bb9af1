use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire and form format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How densely the date range is sampled by the crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CadenceMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl CadenceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CadenceMode::Daily => "daily",
            CadenceMode::Weekly => "weekly",
            CadenceMode::Monthly => "monthly",
        }
    }
}

impl FromStr for CadenceMode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "daily" => Ok(CadenceMode::Daily),
            "weekly" => Ok(CadenceMode::Weekly),
            "monthly" => Ok(CadenceMode::Monthly),
            _ => Err(ValidationError::UnknownMode(raw.to_string())),
        }
    }
}

impl fmt::Display for CadenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Excel,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "csv" => Ok(OutputFormat::Csv),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ValidationError::UnknownOutputFormat(raw.to_string())),
        }
    }
}

/// Raw, unvalidated form fields as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub store_name: String,
    pub start_date: String,
    pub end_date: String,
    pub mode: String,
    pub output_format: String,
    pub google_sheets: bool,
    pub sheets_url: String,
}

impl FormInput {
    /// The form as a fresh page presents it: both dates set to `today`.
    pub fn for_today(today: NaiveDate) -> Self {
        let mut form = Self::default();
        form.set_dates(today, today);
        form
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = start.format(DATE_FORMAT).to_string();
        self.end_date = end.format(DATE_FORMAT).to_string();
    }

    /// Mode as entered; unknown values fall back to daily for advisory use only.
    pub fn mode_or_default(&self) -> CadenceMode {
        self.mode.parse().unwrap_or_default()
    }
}

/// A validated job submission. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    /// Omitted on the wire when blank so the server applies its default store.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub store_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mode: CadenceMode,
    pub output_format: OutputFormat,
    pub google_sheets: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a spreadsheet URL to export results to a spreadsheet.")]
    MissingSheetsUrl,
    #[error("Enter both a start date and an end date.")]
    MissingDate,
    #[error("Invalid {field} date '{value}' (expected YYYY-MM-DD).")]
    InvalidDate { field: &'static str, value: String },
    #[error("The start date must not be after the end date.")]
    StartAfterEnd,
    #[error("Unknown crawl mode '{0}'.")]
    UnknownMode(String),
    #[error("Unknown output format '{0}'.")]
    UnknownOutputFormat(String),
}

/// Checks the form and builds the request that would be sent.
///
/// The spreadsheet check runs before the date checks, matching the order in
/// which the page reports problems.
pub fn validate(input: &FormInput) -> Result<JobRequest, ValidationError> {
    let sheets_url = input.sheets_url.trim();
    if input.google_sheets && sheets_url.is_empty() {
        return Err(ValidationError::MissingSheetsUrl);
    }

    let start_date = parse_date("start", &input.start_date)?;
    let end_date = parse_date("end", &input.end_date)?;
    if start_date > end_date {
        return Err(ValidationError::StartAfterEnd);
    }

    let mode: CadenceMode = input.mode.parse()?;
    let output_format: OutputFormat = input.output_format.parse()?;

    Ok(JobRequest {
        store_name: input.store_name.trim().to_string(),
        start_date,
        end_date,
        mode,
        output_format,
        google_sheets: input.google_sheets,
        sheets_url: input.google_sheets.then(|| sheets_url.to_string()),
    })
}

/// Parses a `YYYY-MM-DD` field; blank fields are `Ok(None)`.
pub fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map(Some)
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    match parse_optional_date(raw) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err(ValidationError::MissingDate),
        Err(_) => Err(ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        }),
    }
}
