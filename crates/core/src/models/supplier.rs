//! Supplier model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{RecordId, Timestamp};
use crate::validation::PHONE_RE;

/// A material supplier returned by `/suppliers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "materialsSupplied")]
    pub materials: Vec<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Record for Supplier {
    const ENTITY: &'static str = "supplier";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Supplier {
    const COLUMNS: &'static [&'static str] = &["name", "contactPerson", "phone", "email"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.contact_person.as_deref());
        fields.extend(self.phone.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.materials.iter().map(String::as_str));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(&self.name),
            "contactPerson" => SortValue::opt_text(self.contact_person.as_deref()),
            "phone" => SortValue::opt_text(self.phone.as_deref()),
            "email" => SortValue::opt_text(self.email.as_deref()),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /suppliers`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplier {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "contact person must be at most 100 characters"))]
    pub contact_person: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "phone must be 10-15 digits"))]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
}

/// Payload for `PUT /suppliers/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplier {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "contact person must be at most 100 characters"))]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_RE, message = "phone must be 10-15 digits"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    #[test]
    fn bad_email_rejected() {
        let form = CreateSupplier {
            name: "Shree Cements".into(),
            contact_person: None,
            phone: "9876543210".into(),
            email: Some("not-an-email".into()),
            address: None,
            materials: vec!["cement".into()],
        };
        let err = validate_form(&form).unwrap_err().to_string();
        assert!(err.contains("email is not valid"));
    }

    #[test]
    fn materials_default_to_empty() {
        let supplier: Supplier = serde_json::from_str(r#"{"_id":"s1","name":"Acme"}"#).unwrap();
        assert!(supplier.materials.is_empty());
    }
}
