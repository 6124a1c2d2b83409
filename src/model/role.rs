use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role a user holds inside a company, as stored in `company_members.role`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// Owners and admins receive anomaly notifications.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    /// Roles allowed to read insights of other employees.
    pub fn can_review_employees(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin | Role::Manager)
    }
}
