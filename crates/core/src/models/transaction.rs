//! Transaction and expense models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Record;
use crate::table::{SortValue, Tabular};
use crate::types::{flexible_date, EntityRef, RecordId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "Income", alias = "INCOME", alias = "credit")]
    Income,
    #[serde(alias = "Expense", alias = "EXPENSE", alias = "debit")]
    Expense,
}

/// Expense bucket used by the site financial summary.
///
/// Unknown category strings read as [`TransactionCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    #[serde(alias = "materials", alias = "Material", alias = "material")]
    Materials,
    #[serde(alias = "labor", alias = "Labour", alias = "labour")]
    Labor,
    #[serde(alias = "subcontractor", alias = "Subcontractors")]
    Subcontractor,
    #[serde(alias = "equipment")]
    Equipment,
    #[serde(alias = "transport", alias = "Transportation")]
    Transport,
    #[serde(alias = "utilities")]
    Utilities,
    #[serde(alias = "salary", alias = "Salaries")]
    Salary,
    #[serde(other)]
    Other,
}

impl TransactionCategory {
    pub const ALL: [TransactionCategory; 8] = [
        Self::Materials,
        Self::Labor,
        Self::Subcontractor,
        Self::Equipment,
        Self::Transport,
        Self::Utilities,
        Self::Salary,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Materials => "Materials",
            Self::Labor => "Labor",
            Self::Subcontractor => "Subcontractor",
            Self::Equipment => "Equipment",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Salary => "Salary",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_category() -> TransactionCategory {
    TransactionCategory::Other
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An income or expense entry returned by `/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default, alias = "site", alias = "projectId")]
    pub project: Option<EntityRef>,
    #[serde(rename = "type", alias = "transactionType")]
    pub kind: TransactionKind,
    #[serde(default = "default_category")]
    pub category: TransactionCategory,
    pub amount: f64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Transaction {
    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.project.as_ref().is_some_and(|p| p.is(project_id))
    }
}

impl Record for Transaction {
    const ENTITY: &'static str = "transaction";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Transaction {
    const COLUMNS: &'static [&'static str] = &["date", "type", "category", "amount", "project"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.category.label()];
        fields.extend(self.description.as_deref());
        fields.extend(self.payment_method.as_deref());
        fields.extend(self.project.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "date" => SortValue::Date(self.date),
            "type" => SortValue::text(match self.kind {
                TransactionKind::Income => "income",
                TransactionKind::Expense => "expense",
            }),
            "category" => SortValue::text(self.category.label()),
            "amount" => SortValue::Number(self.amount),
            "project" => SortValue::opt_text(self.project.as_ref().and_then(EntityRef::name)),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub project: RecordId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: TransactionCategory,
    #[validate(range(min = 0.01, max = 1000000000.0, message = "amount must be greater than zero"))]
    pub amount: f64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "payment method must be at most 50 characters"))]
    pub payment_method: Option<String>,
}

/// Payload for `PUT /transactions/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransaction {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TransactionCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.01, max = 1000000000.0, message = "amount must be greater than zero"))]
    pub amount: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Expense
// ---------------------------------------------------------------------------

/// A standalone site expense returned by `/expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default, alias = "site", alias = "projectId")]
    pub project: Option<EntityRef>,
    #[serde(default = "default_category")]
    pub category: TransactionCategory,
    pub amount: f64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Expense {
    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.project.as_ref().is_some_and(|p| p.is(project_id))
    }
}

impl Record for Expense {
    const ENTITY: &'static str = "expense";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Tabular for Expense {
    const COLUMNS: &'static [&'static str] = &["date", "category", "amount", "project"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.category.label()];
        fields.extend(self.description.as_deref());
        fields.extend(self.project.as_ref().and_then(EntityRef::name));
        fields
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "date" => SortValue::Date(self.date),
            "category" => SortValue::text(self.category.label()),
            "amount" => SortValue::Number(self.amount),
            "project" => SortValue::opt_text(self.project.as_ref().and_then(EntityRef::name)),
            _ => SortValue::Missing,
        }
    }
}

/// Payload for `POST /expenses`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpense {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub project: RecordId,
    pub category: TransactionCategory,
    #[validate(range(min = 0.01, max = 1000000000.0, message = "amount must be greater than zero"))]
    pub amount: f64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Payload for `PUT /expenses/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TransactionCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.01, max = 1000000000.0, message = "amount must be greater than zero"))]
    pub amount: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    #[test]
    fn category_aliases_and_fallback() {
        let parse = |s: &str| -> TransactionCategory {
            serde_json::from_value(serde_json::Value::String(s.into())).unwrap()
        };
        assert_eq!(parse("Materials"), TransactionCategory::Materials);
        assert_eq!(parse("labour"), TransactionCategory::Labor);
        assert_eq!(parse("Permits"), TransactionCategory::Other);
    }

    #[test]
    fn transaction_reads_type_field() {
        let tx: Transaction = serde_json::from_str(
            r#"{"_id":"t1","project":"p1","type":"Income","amount":50000,"date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.category, TransactionCategory::Other);
        assert!(tx.belongs_to("p1"));
        assert!(!tx.belongs_to("p2"));
    }

    #[test]
    fn create_serializes_type_key() {
        let form = CreateTransaction {
            project: "p1".into(),
            kind: TransactionKind::Expense,
            category: TransactionCategory::Equipment,
            amount: 1200.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            description: None,
            payment_method: Some("cash".into()),
        };
        assert!(validate_form(&form).is_ok());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["category"], "Equipment");
        assert_eq!(json["paymentMethod"], "cash");
    }

    #[test]
    fn zero_amount_rejected() {
        let form = CreateExpense {
            project: "p1".into(),
            category: TransactionCategory::Transport,
            amount: 0.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            description: None,
        };
        assert!(validate_form(&form).is_err());
    }
}
