//! Labour endpoints beyond plain CRUD.

use sitebook_core::models::Salary;

use super::{CrudService, Labour};
use crate::error::ApiResult;

impl CrudService<Labour> {
    /// Salary records of every labourer (`GET /labour/salaries/all`).
    pub async fn all_salaries(&self) -> ApiResult<Vec<Salary>> {
        self.client().get_list("/labour/salaries/all").await
    }

    /// Salary history of one labourer (`GET /labour/salaries/:id`).
    pub async fn salaries_for(&self, labourer_id: &str) -> ApiResult<Vec<Salary>> {
        self.client()
            .get_list(&format!("/labour/salaries/{labourer_id}"))
            .await
    }
}
