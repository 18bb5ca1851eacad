//! Well-known role names and what each may do.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_SUPERVISOR: &str = "supervisor";
pub const ROLE_ACCOUNTANT: &str = "accountant";

/// Role carried by the signed-in user. Names are matched case-insensitively;
/// unrecognised names map to [`Role::Unknown`], which has no privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    Admin,
    Manager,
    Supervisor,
    Accountant,
    Unknown,
}

/// Broad areas a role may write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Labourers, suppliers, subcontractors, customers, materials, projects.
    Records,
    Attendance,
    /// Transactions, expenses and salaries.
    Accounts,
}

impl Role {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            ROLE_ADMIN => Self::Admin,
            ROLE_MANAGER => Self::Manager,
            ROLE_SUPERVISOR => Self::Supervisor,
            ROLE_ACCOUNTANT => Self::Accountant,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Manager => ROLE_MANAGER,
            Self::Supervisor => ROLE_SUPERVISOR,
            Self::Accountant => ROLE_ACCOUNTANT,
            Self::Unknown => "unknown",
        }
    }

    /// Edit and delete are reserved for admins and managers.
    pub fn can_modify(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    pub fn can_create(self, area: Area) -> bool {
        match self {
            Self::Admin | Self::Manager => true,
            Self::Supervisor => area == Area::Attendance,
            Self::Accountant => area == Area::Accounts,
            Self::Unknown => false,
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Role::from_name("Admin"), Role::Admin);
        assert_eq!(Role::from_name(" MANAGER "), Role::Manager);
        assert_eq!(Role::from_name("intern"), Role::Unknown);
    }

    #[test]
    fn only_admin_and_manager_modify() {
        assert!(Role::Admin.can_modify());
        assert!(Role::Manager.can_modify());
        assert!(!Role::Supervisor.can_modify());
        assert!(!Role::Accountant.can_modify());
        assert!(!Role::Unknown.can_modify());
    }

    #[test]
    fn create_permissions_by_area() {
        assert!(Role::Supervisor.can_create(Area::Attendance));
        assert!(!Role::Supervisor.can_create(Area::Accounts));
        assert!(Role::Accountant.can_create(Area::Accounts));
        assert!(!Role::Accountant.can_create(Area::Records));
        assert!(!Role::Unknown.can_create(Area::Attendance));
    }

    #[test]
    fn capitalized_role_deserializes() {
        let role: Role = serde_json::from_str(r#""Admin""#).unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_value(Role::Manager).unwrap(), "manager");
    }

    #[test]
    fn unknown_role_deserializes() {
        let role: Role = serde_json::from_str(r#""contractor""#).unwrap();
        assert_eq!(role, Role::Unknown);
    }
}
