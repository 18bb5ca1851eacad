//! Project / site model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{flexible_date, EntityRef, RecordId, Timestamp};

/// A construction job returned by `/projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(alias = "projectName")]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default, with = "flexible_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date::option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default, alias = "client")]
    pub customer: Option<EntityRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Project {
    /// Planned duration in days, when both ends of the schedule are known.
    pub fn planned_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start).num_days()),
            _ => None,
        }
    }
}

impl Record for Project {
    const ENTITY: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Project {
    const COLUMNS: &'static [&'static str] =
        &["name", "location", "budget", "startDate", "endDate", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.location.as_deref());
        fields.extend(self.status.as_deref());
        fields.extend(self.supervisor.as_deref());
        fields.extend(self.customer.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(&self.name),
            "location" => SortValue::opt_text(self.location.as_deref()),
            "budget" => SortValue::Number(self.budget),
            "startDate" => SortValue::opt_date(self.start_date),
            "endDate" => SortValue::opt_date(self.end_date),
            "status" => SortValue::opt_text(self.status.as_deref()),
            _ => SortValue::Missing,
        }
    }
}

fn schedule_in_order(form: &CreateProject) -> Result<(), ValidationError> {
    if let Some(end) = form.end_date {
        if end < form.start_date {
            return Err(ValidationError::new("schedule")
                .with_message("end date must not be before start date".into()));
        }
    }
    Ok(())
}

/// Payload for `POST /projects`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "schedule_in_order"))]
pub struct CreateProject {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "location must be 1-200 characters"))]
    pub location: String,
    #[validate(range(min = 0.0, max = 100000000000.0, message = "budget must be non-negative"))]
    pub budget: f64,
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "supervisor must be at most 100 characters"))]
    pub supervisor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Payload for `PUT /projects/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "location must be 1-200 characters"))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100000000000.0, message = "budget must be non-negative"))]
    pub budget: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "supervisor must be at most 100 characters"))]
    pub supervisor: Option<String>,
}
