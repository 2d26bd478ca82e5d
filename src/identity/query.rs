//! Permission query surface bound to one session snapshot.
//!
//! A `PermissionQuery` is cheap to build per request/render: the effective set comes from
//! the context's memo and is only recomputed when `(role, added, removed)` changes.
//!
//! Vacuous cases: `can_any(&[])` is false, `can_all(&[])` is true, with or without a user.

use std::sync::Arc;

use super::request_context::AuthzContext;
use super::resolver::{self, Decision};
use super::session::Session;
use super::user::User;
use crate::permissions::{Permission, PermissionSet, RolePermissionMap};

#[derive(Debug, Clone)]
pub struct PermissionQuery {
    roles: Arc<RolePermissionMap>,
    user: Option<Arc<User>>,
    effective: Arc<PermissionSet>,
    baseline: Arc<PermissionSet>,
}

impl PermissionQuery {
    pub fn new(ctx: &AuthzContext, session: &Session) -> Self {
        let user = session.snapshot();
        let (effective, baseline) = match user.as_deref() {
            Some(u) => (ctx.memo.get_or_compute(&ctx.roles, u), Arc::new(ctx.roles.permissions_for_role(u.role))),
            None => (Arc::new(PermissionSet::new()), Arc::new(PermissionSet::new())),
        };
        Self { roles: ctx.roles.clone(), user, effective, baseline }
    }

    pub fn user(&self) -> Option<&User> { self.user.as_deref() }

    pub fn is_authenticated(&self) -> bool { self.user.is_some() }

    pub fn can(&self, permission: Permission) -> bool { self.effective.contains(&permission) }

    pub fn can_any(&self, permissions: &[Permission]) -> bool { permissions.iter().any(|p| self.can(*p)) }

    pub fn can_all(&self, permissions: &[Permission]) -> bool { permissions.iter().all(|p| self.can(*p)) }

    /// Unknown tags are not granted.
    pub fn can_tag(&self, tag: &str) -> bool {
        Permission::from_tag(tag).map(|p| self.can(p)).unwrap_or(false)
    }

    pub fn can_any_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool { tags.iter().any(|t| self.can_tag(t.as_ref())) }

    pub fn can_all_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool { tags.iter().all(|t| self.can_tag(t.as_ref())) }

    pub fn effective_permissions(&self) -> &PermissionSet { &self.effective }

    /// The role's baseline before overrides, for "default vs custom" displays.
    pub fn role_permissions(&self) -> &PermissionSet { &self.baseline }

    pub fn is_role_default(&self, permission: Permission) -> bool { self.baseline.contains(&permission) }

    /// Granted only because of an explicit addition.
    pub fn is_custom_added(&self, permission: Permission) -> bool {
        let Some(u) = self.user() else { return false; };
        u.added_permissions.contains(&permission)
            && !self.baseline.contains(&permission)
            && !u.removed_permissions.contains(&permission)
    }

    pub fn is_custom_removed(&self, permission: Permission) -> bool {
        self.user().map(|u| u.removed_permissions.contains(&permission)).unwrap_or(false)
    }

    pub fn explain(&self, tag: &str) -> Decision { resolver::explain(&self.roles, self.user(), tag) }
}
