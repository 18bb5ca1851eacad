//! Site financial summary.
//!
//! Income minus category-bucketed expenses for one project, as shown on the
//! site details screen.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Expense, Project, Transaction, TransactionCategory, TransactionKind};
use crate::types::RecordId;

/// Financial position of one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub project_id: RecordId,
    pub budget: f64,
    pub total_income: f64,
    /// Every category appears, with zero when nothing was spent on it.
    pub expenses_by_category: BTreeMap<TransactionCategory, f64>,
    pub total_expenses: f64,
    /// Income minus expenses; negative for a loss.
    pub profit: f64,
    /// Profit as a percentage of income; `None` without income.
    pub profit_margin: Option<f64>,
    /// Expenses as a percentage of budget; `None` without a budget.
    pub budget_utilization: Option<f64>,
    pub transaction_count: usize,
}

impl FinancialSummary {
    pub fn expense(&self, category: TransactionCategory) -> f64 {
        self.expenses_by_category
            .get(&category)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }

    pub fn remaining_budget(&self) -> f64 {
        self.budget - self.total_expenses
    }
}

/// Summarize a project's transactions and standalone expenses.
///
/// Records tied to other projects (or to none) are ignored.
pub fn summarize_site(
    project: &Project,
    transactions: &[Transaction],
    expenses: &[Expense],
) -> FinancialSummary {
    let mut buckets: BTreeMap<TransactionCategory, f64> = TransactionCategory::ALL
        .iter()
        .map(|c| (*c, 0.0))
        .collect();

    let mut total_income = 0.0;
    let mut transaction_count = 0;

    for tx in transactions.iter().filter(|t| t.belongs_to(&project.id)) {
        transaction_count += 1;
        match tx.kind {
            TransactionKind::Income => total_income += tx.amount,
            TransactionKind::Expense => *buckets.entry(tx.category).or_insert(0.0) += tx.amount,
        }
    }

    for expense in expenses.iter().filter(|e| e.belongs_to(&project.id)) {
        transaction_count += 1;
        *buckets.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let total_expenses: f64 = buckets.values().sum();
    let profit = total_income - total_expenses;

    FinancialSummary {
        project_id: project.id.clone(),
        budget: project.budget,
        total_income,
        expenses_by_category: buckets,
        total_expenses,
        profit,
        profit_margin: percentage(profit, total_income),
        budget_utilization: percentage(total_expenses, project.budget),
        transaction_count,
    }
}

fn percentage(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part * 100.0 / whole)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn project(budget: f64) -> Project {
        serde_json::from_value(serde_json::json!({"_id": "p1", "name": "Tower A", "budget": budget}))
            .unwrap()
    }

    fn tx(project: &str, kind: &str, category: &str, amount: f64) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "_id": format!("t-{amount}"),
            "project": project,
            "type": kind,
            "category": category,
            "amount": amount,
            "date": "2024-03-01",
        }))
        .unwrap()
    }

    fn expense(project: &str, category: TransactionCategory, amount: f64) -> Expense {
        Expense {
            id: format!("e-{amount}"),
            project: Some(project.into()),
            category,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            description: None,
            created_at: None,
        }
    }

    #[test]
    fn profit_is_income_minus_buckets() {
        let transactions = vec![
            tx("p1", "income", "Other", 100_000.0),
            tx("p1", "expense", "Materials", 30_000.0),
            tx("p1", "expense", "Labor", 20_000.0),
        ];
        let expenses = vec![expense("p1", TransactionCategory::Materials, 5_000.0)];
        let summary = summarize_site(&project(200_000.0), &transactions, &expenses);

        assert_eq!(summary.total_income, 100_000.0);
        assert_eq!(summary.expense(TransactionCategory::Materials), 35_000.0);
        assert_eq!(summary.expense(TransactionCategory::Labor), 20_000.0);
        assert_eq!(summary.expense(TransactionCategory::Equipment), 0.0);
        assert_eq!(summary.total_expenses, 55_000.0);
        assert_eq!(summary.profit, 45_000.0);
        assert_eq!(summary.profit_margin, Some(45.0));
        assert_eq!(summary.budget_utilization, Some(27.5));
        assert_eq!(summary.remaining_budget(), 145_000.0);
        assert_eq!(summary.transaction_count, 4);
        assert!(summary.is_profitable());
    }

    #[test]
    fn other_projects_are_ignored() {
        let transactions = vec![
            tx("p2", "income", "Other", 999.0),
            tx("p1", "expense", "Transport", 10.0),
        ];
        let expenses = vec![expense("p2", TransactionCategory::Labor, 50.0)];
        let summary = summarize_site(&project(0.0), &transactions, &expenses);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 10.0);
        assert_eq!(summary.profit, -10.0);
        assert_eq!(summary.profit_margin, None);
        assert_eq!(summary.budget_utilization, None);
        assert!(!summary.is_profitable());
    }

    #[test]
    fn every_category_has_a_bucket() {
        let summary = summarize_site(&project(1.0), &[], &[]);
        assert_eq!(
            summary.expenses_by_category.len(),
            TransactionCategory::ALL.len()
        );
    }
}
