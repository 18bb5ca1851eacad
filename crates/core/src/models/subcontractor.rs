//! Subcontractor model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{EntityRef, RecordId, Timestamp};
use crate::validation::PHONE_RE;

/// An external contracted party returned by `/subcontractors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcontractor {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default, alias = "companyName")]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "workType")]
    pub specialization: Option<String>,
    #[serde(default)]
    pub project: Option<EntityRef>,
    #[serde(default, alias = "cost")]
    pub contract_cost: f64,
    #[serde(default, alias = "duration")]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Record for Subcontractor {
    const ENTITY: &'static str = "subcontractor";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Subcontractor {
    const COLUMNS: &'static [&'static str] =
        &["name", "company", "specialization", "contractCost", "durationDays"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.company.as_deref());
        fields.extend(self.specialization.as_deref());
        fields.extend(self.project.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(&self.name),
            "company" => SortValue::opt_text(self.company.as_deref()),
            "specialization" => SortValue::opt_text(self.specialization.as_deref()),
            "contractCost" => SortValue::Number(self.contract_cost),
            "durationDays" => self
                .duration_days
                .map_or(SortValue::Missing, |d| SortValue::Number(d.into())),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /subcontractors`.
///
/// Appointing a subcontractor to a project sets `project`, `contract_cost`
/// and `duration_days` together.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcontractor {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "company must be at most 100 characters"))]
    pub company: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "phone must be 10-15 digits"))]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "specialization must be at most 100 characters"))]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<RecordId>,
    #[validate(range(min = 0.0, max = 1000000000.0, message = "contract cost must be 0-1,000,000,000"))]
    pub contract_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 3650, message = "duration must be 1-3650 days"))]
    pub duration_days: Option<u32>,
}

/// Payload for `PUT /subcontractors/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubcontractor {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_RE, message = "phone must be 10-15 digits"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1000000000.0, message = "contract cost must be 0-1,000,000,000"))]
    pub contract_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 3650, message = "duration must be 1-3650 days"))]
    pub duration_days: Option<u32>,
}
