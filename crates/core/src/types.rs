//! Shared primitive types and serde helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned record identifier (MongoDB ObjectId hex string).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// A reference to another record.
///
/// The API returns references either as a bare id or, when the backend
/// populated the relation, as an object carrying at least the id and a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(RecordId),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: RecordId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl EntityRef {
    /// The referenced record's id regardless of shape.
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Populated { id, .. } => id,
        }
    }

    /// The populated name, if the backend included one.
    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Populated { name, .. } => name.as_deref(),
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id() == id
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef::Id(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a calendar date from either `YYYY-MM-DD` or a full timestamp.
///
/// Timestamps with an offset are converted to UTC before the date part is
/// taken, so `2024-03-05T00:00:00.000Z` is the 5th of March.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Serde adapter for `NaiveDate` fields that the backend may send either as
/// a plain date or as an ISO timestamp. Always serializes as `YYYY-MM-DD`.
pub mod flexible_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }

    /// The same adapter for `Option<NaiveDate>`; `null` and `""` read as `None`.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::super::parse_date(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}"))),
            }
        }
    }
}
