use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::catalog::{all_permissions, Permission, PermissionSet};
use crate::error::{AuthzError, AuthzResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Operator,
    Technician,
    Support,
    Finance,
    Viewer,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::SuperAdmin,
        Role::Admin,
        Role::Operator,
        Role::Technician,
        Role::Support,
        Role::Finance,
        Role::Viewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Operator => "OPERATOR",
            Role::Technician => "TECHNICIAN",
            Role::Support => "SUPPORT",
            Role::Finance => "FINANCE",
            Role::Viewer => "VIEWER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::Operator => "Operator",
            Role::Technician => "Technician",
            Role::Support => "Support",
            Role::Finance => "Finance",
            Role::Viewer => "Viewer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = AuthzError;

    /// Accepts `SUPER_ADMIN`, `super_admin` and `super-admin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace('-', "_");
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == norm)
            .ok_or_else(|| AuthzError::UnknownRole(s.to_string()))
    }
}

// Same leniency as `FromStr`, so every path that reads a role accepts the same spellings.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn set(perms: &[Permission]) -> PermissionSet { perms.iter().copied().collect() }

fn builtin_defaults(role: Role) -> PermissionSet {
    use Permission::*;
    match role {
        // Same additive mapping as every other role: removals still apply.
        Role::SuperAdmin => all_permissions(),
        Role::Admin => {
            let mut s = all_permissions();
            s.remove(&OperatorsManagePermissions);
            s.remove(&SettingsEdit);
            s
        }
        Role::Operator => set(&[
            CustomersView, CustomersCreate, CustomersEdit, CustomersSuspend,
            RoutersView,
            PppoeView, PppoeCreate, PppoeEdit, PppoeDisconnect,
            HotspotView, HotspotCreate, HotspotEdit,
            VouchersView, VouchersGenerate, VouchersPrint,
            FinanceView, FinanceRecordPayment,
            InvoicesView, InvoicesCreate,
            TicketsView, TicketsCreate, TicketsEdit,
            SmsView,
            MapView,
        ]),
        Role::Technician => set(&[
            CustomersView,
            RoutersView, RoutersEdit, RoutersReboot, RoutersSync,
            PppoeView, PppoeEdit, PppoeDisconnect,
            HotspotView, HotspotEdit,
            TicketsView, TicketsEdit, TicketsClose,
            MapView,
        ]),
        Role::Support => set(&[
            CustomersView,
            TicketsView, TicketsCreate, TicketsEdit, TicketsAssign, TicketsClose,
            SmsView, SmsSend,
            MapView,
        ]),
        Role::Finance => set(&[
            CustomersView,
            VouchersView,
            FinanceView, FinanceRecordPayment, FinanceRefund, FinanceExport,
            InvoicesView, InvoicesCreate, InvoicesVoid,
            ReportsView, ReportsExport,
        ]),
        Role::Viewer => Permission::ALL.iter().copied().filter(|p| p.is_view()).collect(),
    }
}

/// Immutable Role → default permission table. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionMap {
    entries: HashMap<Role, PermissionSet>,
}

impl RolePermissionMap {
    /// The dashboard's shipped defaults.
    pub fn builtin() -> Self {
        Self::from_entries(Role::ALL.iter().map(|r| (*r, builtin_defaults(*r))))
    }

    /// Explicit table; roles left out behave as unknown (empty defaults).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, PermissionSet)>,
    {
        Self { entries: entries.into_iter().collect() }
    }

    /// Layer configured per-role replacement sets over `self`. Role names and tags are
    /// validated strictly since a typo here would silently change every user's baseline.
    pub fn with_role_defaults(mut self, layered: &BTreeMap<String, Vec<String>>) -> AuthzResult<Self> {
        for (role_name, tags) in layered {
            let role: Role = role_name.parse()?;
            let perms = tags.iter().map(|t| t.parse::<Permission>()).collect::<AuthzResult<PermissionSet>>()?;
            self.entries.insert(role, perms);
        }
        Ok(self)
    }

    pub fn get(&self, role: Role) -> Option<&PermissionSet> { self.entries.get(&role) }

    /// Default set for `role`; a role missing from the table fails closed to the empty set.
    pub fn permissions_for_role(&self, role: Role) -> PermissionSet {
        match self.entries.get(&role) {
            Some(perms) => perms.clone(),
            None => {
                warn!(target: "ispdash::authz", role = %role, "role has no permission mapping; granting no defaults");
                PermissionSet::new()
            }
        }
    }

    /// Lookup by raw role name, for callers holding unvalidated strings.
    pub fn permissions_for_role_name(&self, name: &str) -> PermissionSet {
        match name.parse::<Role>() {
            Ok(role) => self.permissions_for_role(role),
            Err(_) => {
                warn!(target: "ispdash::authz", role = name, "unrecognized role; granting no defaults");
                PermissionSet::new()
            }
        }
    }

    pub fn contains(&self, role: Role, permission: Permission) -> bool {
        self.entries.get(&role).map(|s| s.contains(&permission)).unwrap_or(false)
    }

    /// Mapped roles in declaration order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.iter().copied().filter(move |r| self.entries.contains_key(r))
    }
}

impl Default for RolePermissionMap {
    fn default() -> Self { Self::builtin() }
}

static BUILTIN: Lazy<RolePermissionMap> = Lazy::new(RolePermissionMap::builtin);

/// Process-wide shipped table.
pub fn builtin_role_map() -> &'static RolePermissionMap { &BUILTIN }

pub fn permissions_for_role(role: Role) -> PermissionSet { BUILTIN.permissions_for_role(role) }
