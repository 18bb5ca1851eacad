//! Customer model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{EntityRef, RecordId, Timestamp};
use crate::validation::PHONE_RE;

/// A client of the company returned by `/customers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub projects: Vec<EntityRef>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Record for Customer {
    const ENTITY: &'static str = "customer";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Customer {
    const COLUMNS: &'static [&'static str] = &["name", "phone", "email", "projects"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.phone.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.address.as_deref());
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(&self.name),
            "phone" => SortValue::opt_text(self.phone.as_deref()),
            "email" => SortValue::opt_text(self.email.as_deref()),
            "projects" => SortValue::Number(self.projects.len() as f64),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /customers`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[validate(regex(path = *PHONE_RE, message = "phone must be 10-15 digits"))]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
}

/// Payload for `PUT /customers/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
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
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    #[test]
    fn projects_accept_mixed_reference_shapes() {
        let customer: Customer = serde_json::from_str(
            r#"{"_id":"c1","name":"Mehta","projects":["p1",{"_id":"p2","name":"Villa"}]}"#,
        )
        .unwrap();
        assert_eq!(customer.projects.len(), 2);
        assert_eq!(customer.projects[1].name(), Some("Villa"));
    }

    #[test]
    fn optional_email_skipped_when_absent() {
        let form = CreateCustomer {
            name: "Mehta".into(),
            phone: "+919876543210".into(),
            email: None,
            address: None,
        };
        assert!(validate_form(&form).is_ok());
    }
}
