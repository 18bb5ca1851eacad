//! Site material model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{flexible_date, EntityRef, RecordId, Timestamp};

/// A material delivery/stock entry returned by `/site-materials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(alias = "materialName")]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, alias = "price")]
    pub unit_price: f64,
    #[serde(default)]
    pub supplier: Option<EntityRef>,
    #[serde(default, alias = "site")]
    pub project: Option<EntityRef>,
    #[serde(default, with = "flexible_date::option")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Material {
    pub fn total_cost(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

impl Record for Material {
    const ENTITY: &'static str = "material";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Material {
    const COLUMNS: &'static [&'static str] =
        &["name", "quantity", "unitPrice", "totalCost", "supplier", "purchaseDate"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.unit.as_deref());
        fields.extend(self.supplier.as_ref().and_then(EntityRef::name));
        fields.extend(self.project.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(&self.name),
            "quantity" => SortValue::Number(self.quantity),
            "unitPrice" => SortValue::Number(self.unit_price),
            "totalCost" => SortValue::Number(self.total_cost()),
            "supplier" => SortValue::opt_text(self.supplier.as_ref().and_then(EntityRef::name)),
            "purchaseDate" => SortValue::opt_date(self.purchase_date),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /site-materials`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterial {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[validate(range(min = 0.0, max = 10000000.0, message = "quantity must be 0-10,000,000"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20, message = "unit must be 1-20 characters"))]
    pub unit: String,
    #[validate(range(min = 0.0, max = 10000000.0, message = "unit price must be 0-10,000,000"))]
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub purchase_date: Option<NaiveDate>,
}

/// Payload for `PUT /site-materials/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterial {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10000000.0, message = "quantity must be 0-10,000,000"))]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "unit must be 1-20 characters"))]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10000000.0, message = "unit price must be 0-10,000,000"))]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<RecordId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    #[test]
    fn total_cost_multiplies() {
        let material: Material = serde_json::from_str(
            r#"{"_id":"m1","materialName":"Cement","quantity":50,"unit":"bag","price":380}"#,
        )
        .unwrap();
        assert_eq!(material.name, "Cement");
        assert_eq!(material.total_cost(), 19000.0);
    }

    #[test]
    fn empty_unit_rejected() {
        let form = CreateMaterial {
            name: "Sand".into(),
            quantity: 2.0,
            unit: String::new(),
            unit_price: 1200.0,
            supplier: None,
            project: None,
            purchase_date: None,
        };
        let err = validate_form(&form).unwrap_err().to_string();
        assert!(err.contains("unit"));
    }
}
