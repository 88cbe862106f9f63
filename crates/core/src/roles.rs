//! Console roles.
//!
//! Role names are stored verbatim in `users.role` and embedded in JWT claims;
//! they must match the CHECK constraint in the users migration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// All valid role names, most privileged first.
pub const VALID_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_EDITOR, ROLE_VIEWER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Editor,
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Editor => ROLE_EDITOR,
            Role::Viewer => ROLE_VIEWER,
        }
    }

    /// Editors and super admins may create, update, and delete content.
    pub fn can_write(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Editor)
    }

    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SUPER_ADMIN => Ok(Role::SuperAdmin),
            ROLE_EDITOR => Ok(Role::Editor),
            ROLE_VIEWER => Ok(Role::Viewer),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_valid_role() {
        for name in VALID_ROLES {
            let role: Role = name.parse().expect("valid role");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("super_admin, editor, viewer"));
    }

    #[test]
    fn write_permissions() {
        assert!(Role::SuperAdmin.can_write());
        assert!(Role::Editor.can_write());
        assert!(!Role::Viewer.can_write());
        assert!(!Role::Editor.is_super_admin());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
    }
}
