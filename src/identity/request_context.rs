use std::sync::Arc;

use super::memo::EffectiveMemo;
use crate::config::AuthzConfig;
use crate::error::AuthzResult;
use crate::permissions::RolePermissionMap;

/// Everything the query layer needs besides the session: the frozen role table, the
/// shared memo and the settings. Built once at startup and passed around by reference.
#[derive(Debug, Clone)]
pub struct AuthzContext {
    pub roles: Arc<RolePermissionMap>,
    pub memo: Arc<EffectiveMemo>,
    pub config: Arc<AuthzConfig>,
}

impl AuthzContext {
    pub fn new(config: AuthzConfig) -> AuthzResult<Self> {
        let roles = config.role_map()?;
        Ok(Self::with_roles(roles, config))
    }

    /// Explicit role table; `config.role_defaults` is not applied.
    pub fn with_roles(roles: RolePermissionMap, config: AuthzConfig) -> Self {
        let memo = EffectiveMemo::with_capacity(config.memo_capacity);
        Self { roles: Arc::new(roles), memo: Arc::new(memo), config: Arc::new(config) }
    }
}

impl Default for AuthzContext {
    fn default() -> Self { Self::with_roles(RolePermissionMap::builtin(), AuthzConfig::default()) }
}
