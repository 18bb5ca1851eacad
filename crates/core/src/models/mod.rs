//! Domain record types and form payloads.
//!
//! Each submodule contains:
//! - A `Deserialize` record struct matching what the REST API returns
//! - A `Validate` create payload submitted from the "new" form
//! - A `Validate` update payload (all `Option` fields) for edits

pub mod attendance;
pub mod customer;
pub mod labourer;
pub mod material;
pub mod project;
pub mod salary;
pub mod subcontractor;
pub mod supplier;
pub mod transaction;

pub use attendance::{
    AttendanceRecord, AttendanceStatus, CreateAttendance, SiteAttendance, UpdateAttendance,
};
pub use customer::{CreateCustomer, Customer, UpdateCustomer};
pub use labourer::{CreateLabourer, Labourer, SkillLevel, UpdateLabourer};
pub use material::{CreateMaterial, Material, UpdateMaterial};
pub use project::{CreateProject, Project, UpdateProject};
pub use salary::{CreateSalary, Salary, UpdateSalary};
pub use subcontractor::{CreateSubcontractor, Subcontractor, UpdateSubcontractor};
pub use supplier::{CreateSupplier, Supplier, UpdateSupplier};
pub use transaction::{
    CreateExpense, CreateTransaction, Expense, Transaction, TransactionCategory, TransactionKind,
    UpdateExpense, UpdateTransaction,
};

/// A server-owned record with a stable id.
pub trait Record {
    /// Singular entity name used in messages and logs.
    const ENTITY: &'static str;

    fn id(&self) -> &str;
}
