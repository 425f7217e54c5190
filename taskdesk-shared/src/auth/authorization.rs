/// Role-based access control
///
/// Roles are free-text strings on the user record. A [`RoleHierarchy`] ranks
/// them; it is built once at startup and shared read-only through the API
/// state. All comparisons are case-insensitive, and a role missing from the
/// hierarchy ranks lowest.
///
/// # Standard hierarchy
///
/// ```text
/// superuser 4 > admin 3 > manager 2 > user 1 > guest 0
/// ```
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::authorization::{check_min_role, is_admin, RoleHierarchy};
/// use taskdesk_shared::auth::middleware::AuthContext;
///
/// let roles = RoleHierarchy::standard();
/// let manager = AuthContext {
///     user_id: 1,
///     username: "mia".to_string(),
///     role: "Manager".to_string(),
/// };
///
/// assert!(check_min_role(&roles, &manager, "user"));
/// assert!(!check_min_role(&roles, &manager, "admin"));
/// assert!(!is_admin(&manager));
/// ```

use std::collections::HashMap;

use super::middleware::AuthContext;
use crate::models::user::User;

/// Roles allowed into the admin view
pub const ADMIN_ROLES: [&str; 2] = ["admin", "superuser"];

/// Role assumed when a user record carries none
pub const DEFAULT_ROLE: &str = "user";

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not allowed
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole { required: String, actual: String },
}

/// Error parsing a role hierarchy definition
#[derive(Debug, thiserror::Error)]
#[error("Invalid role hierarchy entry: {0}")]
pub struct RoleHierarchyParseError(pub String);

/// Anything that carries a role
pub trait HasRole {
    fn role(&self) -> &str;
}

impl HasRole for AuthContext {
    fn role(&self) -> &str {
        &self.role
    }
}

impl HasRole for User {
    fn role(&self) -> &str {
        &self.role
    }
}

/// Immutable role → rank table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    ranks: HashMap<String, u8>,
}

impl RoleHierarchy {
    /// guest 0, user 1, manager 2, admin 3, superuser 4
    pub fn standard() -> Self {
        Self::new([
            ("guest", 0),
            ("user", 1),
            ("manager", 2),
            ("admin", 3),
            ("superuser", 4),
        ])
    }

    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, u8)>) -> Self {
        Self {
            ranks: entries
                .into_iter()
                .map(|(role, rank)| (role.trim().to_lowercase(), rank))
                .collect(),
        }
    }

    /// Parses `"guest=0,user=1,admin=3"`
    pub fn parse(definition: &str) -> Result<Self, RoleHierarchyParseError> {
        let mut ranks = HashMap::new();

        for entry in definition.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (role, rank) = entry
                .split_once('=')
                .ok_or_else(|| RoleHierarchyParseError(entry.to_string()))?;
            let rank: u8 = rank
                .trim()
                .parse()
                .map_err(|_| RoleHierarchyParseError(entry.to_string()))?;
            let role = role.trim().to_lowercase();
            if role.is_empty() {
                return Err(RoleHierarchyParseError(entry.to_string()));
            }
            ranks.insert(role, rank);
        }

        if ranks.is_empty() {
            return Err(RoleHierarchyParseError(definition.to_string()));
        }

        Ok(Self { ranks })
    }

    /// Rank of a role; unknown roles rank 0
    pub fn rank(&self, role: &str) -> u8 {
        self.ranks
            .get(&role.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Normalized role: lowercased, `"user"` when blank
pub fn get_user_role(user: &impl HasRole) -> String {
    let role = user.role().trim();
    if role.is_empty() {
        DEFAULT_ROLE.to_string()
    } else {
        role.to_lowercase()
    }
}

/// True iff the user's role is one of `allowed_roles`
pub fn check_role_access(user: &impl HasRole, allowed_roles: &[&str]) -> bool {
    let role = get_user_role(user);
    allowed_roles
        .iter()
        .any(|allowed| allowed.trim().eq_ignore_ascii_case(&role))
}

/// True iff the user's rank is at least the rank of `min_role`
pub fn check_min_role(hierarchy: &RoleHierarchy, user: &impl HasRole, min_role: &str) -> bool {
    hierarchy.rank(&get_user_role(user)) >= hierarchy.rank(min_role)
}

/// Admin or superuser
pub fn is_admin(user: &impl HasRole) -> bool {
    check_role_access(user, &ADMIN_ROLES)
}

pub fn is_manager_or_above(hierarchy: &RoleHierarchy, user: &impl HasRole) -> bool {
    check_min_role(hierarchy, user, "manager")
}

/// Result-returning form of [`check_role_access`]
pub fn require_role(user: &impl HasRole, allowed_roles: &[&str]) -> Result<(), AuthzError> {
    if check_role_access(user, allowed_roles) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required: allowed_roles.join(" or "),
            actual: get_user_role(user),
        })
    }
}

/// Result-returning form of [`check_min_role`]
pub fn require_min_role(
    hierarchy: &RoleHierarchy,
    user: &impl HasRole,
    min_role: &str,
) -> Result<(), AuthzError> {
    if check_min_role(hierarchy, user, min_role) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required: format!("{} or above", min_role.to_lowercase()),
            actual: get_user_role(user),
        })
    }
}
