//! Attendance endpoints beyond plain CRUD.

use serde::Serialize;
use serde_json::Value;
use sitebook_core::attendance_grid::{process_attendance_for_display, AttendanceGrid};
use sitebook_core::models::attendance::validate_bulk;
use sitebook_core::models::{AttendanceRecord, CreateAttendance, Labourer, SiteAttendance};

use super::{Attendance, CrudService};
use crate::error::ApiResult;
use crate::services::LabourService;

#[derive(Serialize)]
struct BulkBody<'a> {
    records: &'a [CreateAttendance],
}

/// Result of a bulk submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Number of records the server reports as saved.
    pub saved: usize,
}

impl CrudService<Attendance> {
    /// Submit a day's attendance for many labourers in one request.
    ///
    /// The batch is checked locally first: every entry must be valid and no
    /// (labourer, date) pair may repeat.
    pub async fn bulk_create(&self, entries: &[CreateAttendance]) -> ApiResult<BulkOutcome> {
        validate_bulk(entries)?;
        let body = self
            .client()
            .post_value("/attendance/bulk", &BulkBody { records: entries })
            .await?;
        let saved = saved_count(&body).unwrap_or(entries.len());
        tracing::info!(submitted = entries.len(), saved, "Bulk attendance saved");
        Ok(BulkOutcome { saved })
    }

    /// Attendance percentage per site (`GET /attendance/stats/site-percentages`).
    pub async fn site_percentages(&self) -> ApiResult<Vec<SiteAttendance>> {
        self.client()
            .get_list("/attendance/stats/site-percentages")
            .await
    }

    /// Fetch labourers and attendance concurrently and build the month grid.
    pub async fn monthly_grid(
        &self,
        labour: &LabourService,
        year: i32,
        month: u32,
    ) -> ApiResult<AttendanceGrid> {
        let (labourers, records): (Vec<Labourer>, Vec<AttendanceRecord>) =
            tokio::try_join!(labour.list(), self.list())?;
        Ok(process_attendance_for_display(
            &labourers, &records, year, month,
        )?)
    }
}

/// Count of saved records in a bulk response: an explicit count field, or
/// the length of the returned list.
fn saved_count(body: &Value) -> Option<usize> {
    if let Some(arr) = body.as_array() {
        return Some(arr.len());
    }
    let obj = body.as_object()?;
    for key in ["count", "insertedCount", "saved"] {
        if let Some(n) = obj.get(key).and_then(Value::as_u64) {
            return usize::try_from(n).ok();
        }
    }
    obj.values()
        .find_map(Value::as_array)
        .map(|arr| arr.len())
}
