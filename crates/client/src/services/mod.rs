//! Typed services, one per REST resource.
//!
//! Every entity shares the same CRUD shape, so a single generic
//! [`CrudService`] covers them; resource-specific endpoints live in
//! `impl CrudService<Marker>` blocks in the submodules.

pub mod attendance;
pub mod auth;
pub mod labour;
pub mod site;

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sitebook_core::models::{self, Record};
use sitebook_core::optimistic::OptimisticList;
use sitebook_core::validation::validate_form;
use validator::Validate;

use crate::error::{get_error_message, ApiResult};
use crate::http::ApiClient;

pub use auth::AuthService;
pub use site::{SiteDetails, SiteService};

/// A REST collection and the types flowing through it.
pub trait Resource {
    /// Collection path relative to the API base URL.
    const PATH: &'static str;

    type Record: DeserializeOwned + Record + Clone + Send;
    type Create: Serialize + Validate + Clone + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;
}

/// Generic CRUD service over one [`Resource`].
pub struct CrudService<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> CrudService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::PATH, id)
    }

    pub async fn list(&self) -> ApiResult<Vec<R::Record>> {
        self.client.get_list(R::PATH).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<R::Record> {
        self.client.get_one(&Self::item_path(id)).await
    }

    /// Validate and submit a create form. Invalid forms never reach the
    /// network.
    pub async fn create(&self, form: &R::Create) -> ApiResult<R::Record> {
        validate_form(form)?;
        let record: R::Record = self.client.post(R::PATH, form).await?;
        tracing::info!(entity = R::Record::ENTITY, id = record.id(), "Record created");
        Ok(record)
    }

    pub async fn update(&self, id: &str, form: &R::Update) -> ApiResult<R::Record> {
        validate_form(form)?;
        let record: R::Record = self.client.put(&Self::item_path(id), form).await?;
        tracing::info!(entity = R::Record::ENTITY, id, "Record updated");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&Self::item_path(id)).await?;
        tracing::info!(entity = R::Record::ENTITY, id, "Record deleted");
        Ok(())
    }

    /// Create a record with an optimistic placeholder in `list`.
    ///
    /// The placeholder is shown until the server answers. On success it is
    /// replaced by the saved record; on failure it is rolled back and the
    /// readable error is kept as the list's last error. Either way the saved
    /// rows are then refetched; a failed refetch leaves them as they were.
    pub async fn create_optimistic(
        &self,
        list: &mut OptimisticList<R::Record, R::Create>,
        form: R::Create,
    ) -> ApiResult<R::Record> {
        let temp_id = list.insert_pending(form.clone());
        let result = self.create(&form).await;
        match &result {
            Ok(record) => list.resolve(temp_id, record.clone())?,
            Err(err) => {
                list.reject(temp_id, get_error_message(err));
            }
        }
        self.refresh(list).await;
        result
    }

    async fn refresh(&self, list: &mut OptimisticList<R::Record, R::Create>) {
        match self.list().await {
            Ok(records) => list.replace_saved(records),
            Err(err) => {
                tracing::warn!(entity = R::Record::ENTITY, error = %err, "List refetch failed");
            }
        }
    }
}

/// `/labour`
pub enum Labour {}
/// `/attendance`
pub enum Attendance {}
/// `/salary`
pub enum Salaries {}
/// `/site-materials`
pub enum SiteMaterials {}
/// `/suppliers`
pub enum Suppliers {}
/// `/subcontractors`
pub enum Subcontractors {}
/// `/customers`
pub enum Customers {}
/// `/transactions`
pub enum Transactions {}
/// `/expenses`
pub enum Expenses {}
/// `/projects`
pub enum Projects {}

macro_rules! resource {
    ($marker:ty, $path:literal, $record:ty, $create:ty, $update:ty) => {
        impl Resource for $marker {
            const PATH: &'static str = $path;
            type Record = $record;
            type Create = $create;
            type Update = $update;
        }
    };
}

resource!(Labour, "/labour", models::Labourer, models::CreateLabourer, models::UpdateLabourer);
resource!(
    Attendance,
    "/attendance",
    models::AttendanceRecord,
    models::CreateAttendance,
    models::UpdateAttendance
);
resource!(Salaries, "/salary", models::Salary, models::CreateSalary, models::UpdateSalary);
resource!(
    SiteMaterials,
    "/site-materials",
    models::Material,
    models::CreateMaterial,
    models::UpdateMaterial
);
resource!(Suppliers, "/suppliers", models::Supplier, models::CreateSupplier, models::UpdateSupplier);
resource!(
    Subcontractors,
    "/subcontractors",
    models::Subcontractor,
    models::CreateSubcontractor,
    models::UpdateSubcontractor
);
resource!(Customers, "/customers", models::Customer, models::CreateCustomer, models::UpdateCustomer);
resource!(
    Transactions,
    "/transactions",
    models::Transaction,
    models::CreateTransaction,
    models::UpdateTransaction
);
resource!(Expenses, "/expenses", models::Expense, models::CreateExpense, models::UpdateExpense);
resource!(Projects, "/projects", models::Project, models::CreateProject, models::UpdateProject);

pub type LabourService = CrudService<Labour>;
pub type AttendanceService = CrudService<Attendance>;
pub type SalaryService = CrudService<Salaries>;
pub type MaterialService = CrudService<SiteMaterials>;
pub type SupplierService = CrudService<Suppliers>;
pub type SubcontractorService = CrudService<Subcontractors>;
pub type CustomerService = CrudService<Customers>;
pub type TransactionService = CrudService<Transactions>;
pub type ExpenseService = CrudService<Expenses>;
pub type ProjectService = CrudService<Projects>;
