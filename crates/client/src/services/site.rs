//! Site (project) details: the project plus its money flows.

use sitebook_core::finance::{summarize_site, FinancialSummary};
use sitebook_core::models::{Expense, Project, Transaction};

use super::{ExpenseService, ProjectService, TransactionService};
use crate::error::ApiResult;
use crate::http::ApiClient;

/// Everything the site details view shows for one project.
#[derive(Debug, Clone)]
pub struct SiteDetails {
    pub project: Project,
    pub transactions: Vec<Transaction>,
    pub expenses: Vec<Expense>,
    pub summary: FinancialSummary,
}

#[derive(Clone)]
pub struct SiteService {
    projects: ProjectService,
    transactions: TransactionService,
    expenses: ExpenseService,
}

impl SiteService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            projects: ProjectService::new(client.clone()),
            transactions: TransactionService::new(client.clone()),
            expenses: ExpenseService::new(client),
        }
    }

    /// Load a project with its transactions and expenses (fetched
    /// concurrently) and compute its financial summary.
    ///
    /// Only records belonging to the project are kept.
    pub async fn site_details(&self, project_id: &str) -> ApiResult<SiteDetails> {
        let (project, transactions, expenses) = tokio::try_join!(
            self.projects.get(project_id),
            self.transactions.list(),
            self.expenses.list(),
        )?;

        let summary = summarize_site(&project, &transactions, &expenses);
        let transactions: Vec<Transaction> = transactions
            .into_iter()
            .filter(|t| t.belongs_to(&project.id))
            .collect();
        let expenses: Vec<Expense> = expenses
            .into_iter()
            .filter(|e| e.belongs_to(&project.id))
            .collect();

        tracing::debug!(
            project_id,
            transactions = transactions.len(),
            expenses = expenses.len(),
            profit = summary.profit,
            "Site details loaded"
        );
        Ok(SiteDetails {
            project,
            transactions,
            expenses,
            summary,
        })
    }
}
