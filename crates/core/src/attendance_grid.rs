//! Monthly attendance grid.
//!
//! Maps daily attendance records onto one row per labourer with one cell per
//! day of the month, which is how the attendance sheet is displayed.

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;

use crate::error::CoreError;
use crate::models::{AttendanceRecord, AttendanceStatus, Labourer};
use crate::types::{days_in_month, RecordId};

/// One filled grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceCell {
    pub record_id: RecordId,
    pub status: AttendanceStatus,
    pub overtime_hours: f64,
}

impl AttendanceCell {
    pub fn label(&self) -> &'static str {
        self.status.label()
    }
}

/// Per-row totals for the month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthSummary {
    pub present: u32,
    pub absent: u32,
    pub half_days: u32,
    pub leave: u32,
    pub holidays: u32,
    pub unmarked: u32,
    /// Present days plus half of the half days.
    pub payable_days: f64,
    pub overtime_hours: f64,
}

/// One labourer's month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    pub labourer_id: RecordId,
    pub name: String,
    /// Index `d - 1` holds day `d`; `None` when no record exists that day.
    pub days: Vec<Option<AttendanceCell>>,
    pub summary: MonthSummary,
}

/// The whole month for all known labourers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceGrid {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub rows: Vec<AttendanceRow>,
    /// Records skipped because they belong to no known labourer.
    pub unmatched_records: usize,
}

impl AttendanceGrid {
    pub fn row(&self, labourer_id: &str) -> Option<&AttendanceRow> {
        self.rows.iter().find(|r| r.labourer_id == labourer_id)
    }
}

/// Build the display grid for `year`/`month`.
///
/// Every distinct labourer id in `labourers` gets exactly one row, in input
/// order, whose `days` vector is as long as the month. A repeated id keeps
/// its first entry. Records for unknown labourers or
/// for other months are skipped. When two records land on the same
/// (labourer, day) the later one in `records` wins.
pub fn process_attendance_for_display(
    labourers: &[Labourer],
    records: &[AttendanceRecord],
    year: i32,
    month: u32,
) -> Result<AttendanceGrid, CoreError> {
    let day_count = days_in_month(year, month).ok_or_else(|| {
        CoreError::Validation(format!("invalid month {month} for year {year}"))
    })?;

    let mut rows: Vec<AttendanceRow> = Vec::with_capacity(labourers.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(labourers.len());
    for labourer in labourers {
        if index.contains_key(labourer.id.as_str()) {
            continue;
        }
        index.insert(labourer.id.as_str(), rows.len());
        rows.push(AttendanceRow {
            labourer_id: labourer.id.clone(),
            name: labourer.name.clone(),
            days: vec![None; day_count as usize],
            summary: MonthSummary::default(),
        });
    }

    let mut unmatched_records = 0;
    for record in records {
        if record.date.year() != year || record.date.month() != month {
            continue;
        }
        let Some(&row) = index.get(record.labour.id()) else {
            unmatched_records += 1;
            continue;
        };
        let day = record.date.day0() as usize;
        rows[row].days[day] = Some(AttendanceCell {
            record_id: record.id.clone(),
            status: record.derived_status(),
            overtime_hours: record.overtime_hours.unwrap_or(0.0).max(0.0),
        });
    }

    for row in &mut rows {
        row.summary = summarize(&row.days);
    }

    Ok(AttendanceGrid {
        year,
        month,
        days_in_month: day_count,
        rows,
        unmatched_records,
    })
}

fn summarize(days: &[Option<AttendanceCell>]) -> MonthSummary {
    let mut summary = MonthSummary::default();
    for cell in days {
        let Some(cell) = cell else {
            summary.unmarked += 1;
            continue;
        };
        match cell.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::HalfDay => summary.half_days += 1,
            AttendanceStatus::Leave => summary.leave += 1,
            AttendanceStatus::Holiday => summary.holidays += 1,
            AttendanceStatus::Unknown => summary.unmarked += 1,
        }
        summary.payable_days += cell.status.payable_fraction();
        summary.overtime_hours += cell.overtime_hours;
    }
    summary
}
