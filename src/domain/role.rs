use serde::{Deserialize, Serialize};

use crate::domain::types::{RoleId, RoleName};

/// Name of the role that unlocks the admin area.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub description: Option<String>,
}

/// Role reference embedded in user payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: RoleName,
}

impl RoleSummary {
    pub fn is_admin(&self) -> bool {
        self.name.as_str() == ADMIN_ROLE
    }
}
