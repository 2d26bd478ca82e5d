use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AuthzError, AuthzResult};
use crate::permissions::RolePermissionMap;

pub const CONFIG_PATH_ENV: &str = "ISPDASH_AUTHZ_CONFIG";
pub const UNKNOWN_TAGS_ENV: &str = "ISPDASH_UNKNOWN_TAGS";

/// What to do with override tags outside the catalog when a session payload is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTagPolicy {
    /// Drop the tag and log a warning.
    #[default]
    Ignore,
    /// Fail normalization with `UnknownPermission`.
    Reject,
}

impl std::str::FromStr for UnknownTagPolicy {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnknownTagPolicy::Ignore),
            "reject" => Ok(UnknownTagPolicy::Reject),
            other => Err(AuthzError::config(UNKNOWN_TAGS_ENV, format!("expected 'ignore' or 'reject', got '{}'", other))),
        }
    }
}

/// Authorization settings for the dashboard. Unspecified values take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthzConfig {
    /// Per-role replacement sets layered over the built-in table, keyed by role name.
    pub role_defaults: BTreeMap<String, Vec<String>>,
    pub unknown_tag_policy: UnknownTagPolicy,
    /// Max memoized effective sets before the memo is cleared.
    pub memo_capacity: usize,
    pub login_route: String,
    pub unauthorized_route: String,
    pub denied_tooltip: String,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            role_defaults: BTreeMap::new(),
            unknown_tag_policy: UnknownTagPolicy::Ignore,
            memo_capacity: 512,
            login_route: "/login".to_string(),
            unauthorized_route: "/unauthorized".to_string(),
            denied_tooltip: "You do not have permission to perform this action".to_string(),
        }
    }
}

impl AuthzConfig {
    /// Read a JSON config file. The role table is validated eagerly so a bad file fails at startup.
    pub fn load(path: &Path) -> AuthzResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: AuthzConfig = serde_json::from_str(&text)
            .map_err(|e| AuthzError::config(path.display().to_string(), e.to_string()))?;
        cfg.role_map()
            .map_err(|e| AuthzError::config(path.display().to_string(), e.to_string()))?;
        debug!(target: "ispdash::config", "loaded authz config from '{}' ({} role override(s))", path.display(), cfg.role_defaults.len());
        Ok(cfg)
    }

    /// `ISPDASH_AUTHZ_CONFIG` names an optional file; `ISPDASH_UNKNOWN_TAGS` overrides its policy.
    pub fn from_env() -> AuthzResult<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(p) if !p.trim().is_empty() => Self::load(Path::new(p.trim()))?,
            _ => Self::default(),
        };
        if let Ok(v) = std::env::var(UNKNOWN_TAGS_ENV) {
            cfg.unknown_tag_policy = v.parse()?;
        }
        info!(
            target: "ispdash::config",
            "authz config: unknown_tag_policy={:?}, memo_capacity={}, role_overrides={}",
            cfg.unknown_tag_policy, cfg.memo_capacity, cfg.role_defaults.len()
        );
        Ok(cfg)
    }

    /// Built-in table with this config's role overrides layered on top.
    pub fn role_map(&self) -> AuthzResult<RolePermissionMap> {
        RolePermissionMap::builtin().with_role_defaults(&self.role_defaults)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
