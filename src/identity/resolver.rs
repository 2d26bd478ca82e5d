//! Pure permission resolution. Every function here is a function of its arguments only:
//! same role table + same user snapshot, same answer.
//!
//! Effective set = (role defaults ∪ added) \ removed. Removal is applied last, so a tag
//! present in both override lists is never granted.

use serde::Serialize;
use tracing::warn;

use super::user::User;
use crate::permissions::{Permission, PermissionSet, RolePermissionMap};

pub fn effective_permissions(roles: &RolePermissionMap, user: Option<&User>) -> PermissionSet {
    let Some(user) = user else { return PermissionSet::new(); };
    let mut out = roles.permissions_for_role(user.role);
    out.extend(user.added_permissions.iter().copied());
    out.retain(|p| !user.removed_permissions.contains(p));
    out
}

/// Single-permission check without materializing the whole set.
pub fn has_permission(roles: &RolePermissionMap, user: Option<&User>, permission: Permission) -> bool {
    let Some(user) = user else { return false; };
    if user.removed_permissions.contains(&permission) { return false; }
    let by_role = match roles.get(user.role) {
        Some(defaults) => defaults.contains(&permission),
        None => {
            warn!(target: "ispdash::authz", role = %user.role, "role has no permission mapping; granting no defaults");
            false
        }
    };
    by_role || user.added_permissions.contains(&permission)
}

/// False for an empty list: nothing was required, so nothing was satisfied.
pub fn has_any_permission(roles: &RolePermissionMap, user: Option<&User>, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(roles, user, *p))
}

/// True for an empty list: no requirement was violated.
pub fn has_all_permissions(roles: &RolePermissionMap, user: Option<&User>, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| has_permission(roles, user, *p))
}

// ---- Tag-string forms: unknown tags are never granted ----

pub fn has_permission_tag(roles: &RolePermissionMap, user: Option<&User>, tag: &str) -> bool {
    Permission::from_tag(tag).map(|p| has_permission(roles, user, p)).unwrap_or(false)
}

pub fn has_any_tag<S: AsRef<str>>(roles: &RolePermissionMap, user: Option<&User>, tags: &[S]) -> bool {
    tags.iter().any(|t| has_permission_tag(roles, user, t.as_ref()))
}

pub fn has_all_tags<S: AsRef<str>>(roles: &RolePermissionMap, user: Option<&User>, tags: &[S]) -> bool {
    tags.iter().all(|t| has_permission_tag(roles, user, t.as_ref()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    NoSession,
    UnknownPermission,
    RoleDefault,
    CustomAdded,
    CustomRemoved,
    NotGranted,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::NoSession => "no_session",
            Reason::UnknownPermission => "unknown_permission",
            Reason::RoleDefault => "role_default",
            Reason::CustomAdded => "custom_added",
            Reason::CustomRemoved => "custom_removed",
            Reason::NotGranted => "not_granted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allow: bool,
    pub reason: Reason,
}

impl Decision {
    fn allow(reason: Reason) -> Self { Self { allow: true, reason } }
    fn deny(reason: Reason) -> Self { Self { allow: false, reason } }
}

/// Why `tag` is or is not granted. Agrees with `has_permission_tag` on `allow`.
pub fn explain(roles: &RolePermissionMap, user: Option<&User>, tag: &str) -> Decision {
    let Some(user) = user else { return Decision::deny(Reason::NoSession); };
    let Some(p) = Permission::from_tag(tag) else { return Decision::deny(Reason::UnknownPermission); };
    if user.removed_permissions.contains(&p) { return Decision::deny(Reason::CustomRemoved); }
    if roles.contains(user.role, p) { return Decision::allow(Reason::RoleDefault); }
    if user.added_permissions.contains(&p) { return Decision::allow(Reason::CustomAdded); }
    Decision::deny(Reason::NotGranted)
}
