use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::UnknownTagPolicy;
use crate::error::{AuthzError, AuthzResult};
use crate::permissions::{Permission, PermissionSet, Role};

/// Validated user snapshot as consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub role: Role,
    #[serde(default, alias = "added_permissions")]
    pub added_permissions: PermissionSet,
    #[serde(default, alias = "removed_permissions")]
    pub removed_permissions: PermissionSet,
}

impl User {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role, added_permissions: PermissionSet::new(), removed_permissions: PermissionSet::new() }
    }

    pub fn with_added<I: IntoIterator<Item = Permission>>(mut self, perms: I) -> Self {
        self.added_permissions.extend(perms);
        self
    }

    pub fn with_removed<I: IntoIterator<Item = Permission>>(mut self, perms: I) -> Self {
        self.removed_permissions.extend(perms);
        self
    }
}

/// Raw `CurrentUser` document as delivered by the session subsystem. Nothing here is trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserPayload {
    pub id: String,
    pub role: String,
    #[serde(default, alias = "added_permissions")]
    pub added_permissions: Vec<String>,
    #[serde(default, alias = "removed_permissions")]
    pub removed_permissions: Vec<String>,
}

impl CurrentUserPayload {
    /// Normalize into a `User`. Unknown roles are always rejected; unknown override tags
    /// follow `policy`.
    pub fn into_user(self, policy: UnknownTagPolicy) -> AuthzResult<User> {
        if self.id.trim().is_empty() {
            return Err(AuthzError::InvalidPayload("user id is empty".into()));
        }
        let role: Role = self.role.parse()?;
        let added = parse_tags(&self.id, "added", &self.added_permissions, policy)?;
        let removed = parse_tags(&self.id, "removed", &self.removed_permissions, policy)?;
        Ok(User { id: self.id, role, added_permissions: added, removed_permissions: removed })
    }
}

fn parse_tags(user_id: &str, list: &str, tags: &[String], policy: UnknownTagPolicy) -> AuthzResult<PermissionSet> {
    let mut out = PermissionSet::new();
    for tag in tags {
        match tag.parse::<Permission>() {
            Ok(p) => { out.insert(p); }
            Err(e) => match policy {
                UnknownTagPolicy::Reject => return Err(e),
                UnknownTagPolicy::Ignore => {
                    warn!(target: "ispdash::authz", user = user_id, list, tag = tag.as_str(), "dropping unknown permission tag");
                }
            },
        }
    }
    Ok(out)
}

/// Parse a `CurrentUser` JSON document; `null` means no session.
pub fn parse_current_user(json: &str, policy: UnknownTagPolicy) -> AuthzResult<Option<User>> {
    let payload: Option<CurrentUserPayload> =
        serde_json::from_str(json).map_err(|e| AuthzError::InvalidPayload(e.to_string()))?;
    payload.map(|p| p.into_user(policy)).transpose()
}
