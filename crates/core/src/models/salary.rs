//! Salary model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{flexible_date, EntityRef, RecordId, Timestamp};
use crate::validation::MONTH_RE;

/// A monthly salary record returned by `/salary` and `/labour/salaries/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(alias = "labourer", alias = "labourId")]
    pub labour: EntityRef,
    /// `YYYY-MM`.
    pub month: String,
    #[serde(alias = "amount")]
    pub base_amount: f64,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default)]
    pub deductions: f64,
    #[serde(default)]
    pub net_amount: Option<f64>,
    #[serde(default, alias = "isPaid")]
    pub paid: bool,
    #[serde(default, with = "flexible_date::option")]
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Salary {
    /// Net pay: the stored figure when the backend computed one, otherwise
    /// base plus bonus minus deductions.
    pub fn net(&self) -> f64 {
        self.net_amount
            .unwrap_or(self.base_amount + self.bonus - self.deductions)
    }
}

impl Record for Salary {
    const ENTITY: &'static str = "salary";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Salary {
    const COLUMNS: &'static [&'static str] = &["labour", "month", "net", "paid"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.month.as_str()];
        fields.extend(self.labour.name());
        fields.extend(self.remarks.as_deref());
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "labour" => SortValue::opt_text(self.labour.name()),
            "month" => SortValue::text(&self.month),
            "net" => SortValue::Number(self.net()),
            "paid" => SortValue::Number(if self.paid { 1.0 } else { 0.0 }),
            _ => SortValue::Missing,
        }
    }
}

fn deductions_within_gross(form: &CreateSalary) -> Result<(), ValidationError> {
    if form.deductions > form.base_amount + form.bonus {
        return Err(ValidationError::new("deductions")
            .with_message("deductions cannot exceed base amount plus bonus".into()));
    }
    Ok(())
}

/// Payload for `POST /salary`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "deductions_within_gross"))]
pub struct CreateSalary {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub labour: RecordId,
    #[validate(regex(path = *MONTH_RE, message = "month must be YYYY-MM"))]
    pub month: String,
    #[validate(range(min = 0.0, max = 10000000.0, message = "base amount must be 0-10,000,000"))]
    pub base_amount: f64,
    #[validate(range(min = 0.0, max = 10000000.0, message = "bonus must be 0-10,000,000"))]
    pub bonus: f64,
    #[validate(range(min = 0.0, max = 10000000.0, message = "deductions must be 0-10,000,000"))]
    pub deductions: f64,
    pub paid: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub paid_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}

impl CreateSalary {
    pub fn net(&self) -> f64 {
        self.base_amount + self.bonus - self.deductions
    }
}

/// Payload for `PUT /salary/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalary {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10000000.0, message = "base amount must be 0-10,000,000"))]
    pub base_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10000000.0, message = "bonus must be 0-10,000,000"))]
    pub bonus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10000000.0, message = "deductions must be 0-10,000,000"))]
    pub deductions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub paid_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}
