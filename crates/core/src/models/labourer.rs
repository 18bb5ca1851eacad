//! Labourer model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{flexible_date, EntityRef, RecordId, Timestamp};
use crate::validation::PHONE_RE;

/// Skill grading used for wage bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    #[serde(rename = "skilled", alias = "Skilled")]
    Skilled,
    #[serde(rename = "semi-skilled", alias = "Semi-skilled", alias = "Semi-Skilled")]
    SemiSkilled,
    #[serde(rename = "unskilled", alias = "Unskilled")]
    Unskilled,
    #[serde(other)]
    Other,
}

impl SkillLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Skilled => "Skilled",
            Self::SemiSkilled => "Semi-skilled",
            Self::Unskilled => "Unskilled",
            Self::Other => "Other",
        }
    }
}

/// A worker record returned by `/labour`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Labourer {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub base_salary: f64,
    #[serde(default)]
    pub project: Option<EntityRef>,
    #[serde(default, with = "flexible_date::option")]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Labourer {
    /// Labourers without an explicit status are treated as active.
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case("active"))
    }
}

impl Record for Labourer {
    const ENTITY: &'static str = "labourer";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Labourer {
    const COLUMNS: &'static [&'static str] =
        &["name", "phone", "skillLevel", "baseSalary", "joiningDate", "project"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.phone.as_deref());
        fields.extend(self.address.as_deref());
        fields.extend(self.skill_level.map(SkillLevel::label));
        fields.extend(self.project.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(&self.name),
            "phone" => SortValue::opt_text(self.phone.as_deref()),
            "skillLevel" => SortValue::opt_text(self.skill_level.map(SkillLevel::label)),
            "baseSalary" => SortValue::Number(self.base_salary),
            "joiningDate" => SortValue::opt_date(self.joining_date),
            "project" => SortValue::opt_text(self.project.as_ref().and_then(EntityRef::name)),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /labour`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabourer {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[validate(regex(path = *PHONE_RE, message = "phone must be 10-15 digits"))]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
    pub skill_level: SkillLevel,
    #[validate(range(min = 0.0, max = 1000000.0, message = "base salary must be 0-1,000,000"))]
    pub base_salary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub joining_date: Option<NaiveDate>,
}

/// Payload for `PUT /labour/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabourer {
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
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1000000.0, message = "base salary must be 0-1,000,000"))]
    pub base_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
