//! Attendance model and status derivation.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{flexible_date, EntityRef, RecordId, Timestamp};
use crate::validation::validate_form;

/// Hours at or above which a day counts as fully present.
pub const FULL_DAY_HOURS: f64 = 8.0;

/// Maximum number of entries accepted by one `POST /attendance/bulk`.
pub const MAX_BULK_ENTRIES: usize = 500;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Attendance status for one labourer on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
    Holiday,
    Unknown,
}

impl AttendanceStatus {
    /// Parse a status string as stored by the backend or typed by a user.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "present" | "p" => Some(Self::Present),
            "absent" | "a" => Some(Self::Absent),
            "halfday" | "half" | "h" => Some(Self::HalfDay),
            "leave" | "l" => Some(Self::Leave),
            "holiday" | "hol" => Some(Self::Holiday),
            _ => None,
        }
    }

    /// Derive a status from a record's raw fields.
    ///
    /// Precedence: a recognised `status` string, then the `isPresent` flag,
    /// then `hoursWorked` against [`FULL_DAY_HOURS`].
    pub fn derive(status: Option<&str>, is_present: Option<bool>, hours: Option<f64>) -> Self {
        if let Some(parsed) = status.and_then(Self::parse) {
            return parsed;
        }
        if let Some(present) = is_present {
            return if present { Self::Present } else { Self::Absent };
        }
        match hours {
            Some(h) if h >= FULL_DAY_HOURS => Self::Present,
            Some(h) if h > 0.0 => Self::HalfDay,
            Some(_) => Self::Absent,
            None => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::HalfDay => "Half Day",
            Self::Leave => "Leave",
            Self::Holiday => "Holiday",
            Self::Unknown => "Unknown",
        }
    }

    /// Short code shown in grid cells.
    pub fn code(self) -> &'static str {
        match self {
            Self::Present => "P",
            Self::Absent => "A",
            Self::HalfDay => "H",
            Self::Leave => "L",
            Self::Holiday => "HOL",
            Self::Unknown => "?",
        }
    }

    /// Fraction of a working day this status pays for.
    pub fn payable_fraction(self) -> f64 {
        match self {
            Self::Present => 1.0,
            Self::HalfDay => 0.5,
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A daily attendance record returned by `/attendance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(alias = "labourer", alias = "labourId")]
    pub labour: EntityRef,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "present")]
    pub is_present: Option<bool>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
    #[serde(default)]
    pub project: Option<EntityRef>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl AttendanceRecord {
    pub fn derived_status(&self) -> AttendanceStatus {
        AttendanceStatus::derive(self.status.as_deref(), self.is_present, self.hours_worked)
    }
}

impl Record for AttendanceRecord {
    const ENTITY: &'static str = "attendance";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for AttendanceRecord {
    const COLUMNS: &'static [&'static str] =
        &["date", "labour", "status", "hoursWorked", "project"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.labour.name().unwrap_or(self.labour.id())];
        fields.push(self.derived_status().label());
        fields.extend(self.remarks.as_deref());
        fields.extend(self.project.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "date" => SortValue::Date(self.date),
            "labour" => SortValue::text(self.labour.name().unwrap_or(self.labour.id())),
            "status" => SortValue::text(self.derived_status().label()),
            "hoursWorked" => self.hours_worked.map_or(SortValue::Missing, SortValue::Number),
            "project" => SortValue::opt_text(self.project.as_ref().and_then(EntityRef::name)),
            _ => SortValue::Missing,
        }
    }
}

/// One entry of the per-site attendance percentage report
/// (`GET /attendance/stats/site-percentages`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAttendance {
    #[serde(default, alias = "_id", alias = "projectId", alias = "siteId")]
    pub site_id: Option<RecordId>,
    #[serde(alias = "site", alias = "siteName", alias = "projectName")]
    pub name: String,
    pub percentage: f64,
    #[serde(default, alias = "present")]
    pub present_count: Option<u32>,
    #[serde(default, alias = "total")]
    pub total_count: Option<u32>,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload for `POST /attendance` and the entries of `POST /attendance/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub labour: RecordId,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 24.0, message = "hours worked must be 0-24"))]
    pub hours_worked: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 16.0, message = "overtime must be 0-16 hours"))]
    pub overtime_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}

/// Payload for `PUT /attendance/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 24.0, message = "hours worked must be 0-24"))]
    pub hours_worked: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 16.0, message = "overtime must be 0-16 hours"))]
    pub overtime_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}

/// Validate a bulk attendance submission.
///
/// Each entry must pass its own form rules, and no (labourer, date) pair may
/// appear twice: the backend holds a unique index on that pair and would
/// reject the whole batch.
pub fn validate_bulk(entries: &[CreateAttendance]) -> Result<(), CoreError> {
    if entries.is_empty() {
        return Err(CoreError::Validation(
            "bulk attendance requires at least one entry".into(),
        ));
    }
    if entries.len() > MAX_BULK_ENTRIES {
        return Err(CoreError::Validation(format!(
            "bulk attendance accepts at most {MAX_BULK_ENTRIES} entries, got {}",
            entries.len()
        )));
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        validate_form(entry).map_err(|e| match e {
            CoreError::Validation(msg) => CoreError::Validation(format!("entry {index}: {msg}")),
            other => other,
        })?;
        if !seen.insert((entry.labour.as_str(), entry.date)) {
            return Err(CoreError::Validation(format!(
                "duplicate attendance for labourer {} on {}",
                entry.labour, entry.date
            )));
        }
    }
    Ok(())
}
