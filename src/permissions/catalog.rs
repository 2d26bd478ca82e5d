//! Closed permission catalog. Every tag the dashboard can grant is a `Permission` variant;
//! strings only exist at the edges (payloads, config, CLI) and are parsed here.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AuthzError;

/// Ordered so that sets iterate deterministically and can be used as memo keys.
pub type PermissionSet = BTreeSet<Permission>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Customers,
    Routers,
    Pppoe,
    Hotspot,
    Vouchers,
    Finance,
    Invoices,
    Tickets,
    Sms,
    Operators,
    Reports,
    Settings,
    Map,
}

impl Resource {
    pub const ALL: &'static [Resource] = &[
        Resource::Customers,
        Resource::Routers,
        Resource::Pppoe,
        Resource::Hotspot,
        Resource::Vouchers,
        Resource::Finance,
        Resource::Invoices,
        Resource::Tickets,
        Resource::Sms,
        Resource::Operators,
        Resource::Reports,
        Resource::Settings,
        Resource::Map,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Routers => "routers",
            Resource::Pppoe => "pppoe",
            Resource::Hotspot => "hotspot",
            Resource::Vouchers => "vouchers",
            Resource::Finance => "finance",
            Resource::Invoices => "invoices",
            Resource::Tickets => "tickets",
            Resource::Sms => "sms",
            Resource::Operators => "operators",
            Resource::Reports => "reports",
            Resource::Settings => "settings",
            Resource::Map => "map",
        }
    }

    /// Catalog entries for this resource, in declaration order.
    pub fn permissions(self) -> impl Iterator<Item = Permission> {
        Permission::ALL.iter().copied().filter(move |p| p.resource() == self)
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

// One table drives the enum, its tags and its resource grouping so they cannot drift.
macro_rules! permission_catalog {
    ($( $resource:ident { $( $variant:ident => $tag:literal ),+ $(,)? } )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Permission {
            $( $( $variant, )+ )+
        }

        impl Permission {
            pub const ALL: &'static [Permission] = &[ $( $( Permission::$variant, )+ )+ ];

            /// Wire tag, `resource:action`.
            pub fn as_str(self) -> &'static str {
                match self { $( $( Permission::$variant => $tag, )+ )+ }
            }

            pub fn resource(self) -> Resource {
                match self { $( $( Permission::$variant => Resource::$resource, )+ )+ }
            }

            /// Catalog lookup by exact tag.
            pub fn from_tag(tag: &str) -> Option<Permission> {
                match tag {
                    $( $( $tag => Some(Permission::$variant), )+ )+
                    _ => None,
                }
            }
        }
    };
}

permission_catalog! {
    Customers {
        CustomersView => "customers:view",
        CustomersCreate => "customers:create",
        CustomersEdit => "customers:edit",
        CustomersDelete => "customers:delete",
        CustomersSuspend => "customers:suspend",
        CustomersExport => "customers:export",
    }
    Routers {
        RoutersView => "routers:view",
        RoutersCreate => "routers:create",
        RoutersEdit => "routers:edit",
        RoutersDelete => "routers:delete",
        RoutersReboot => "routers:reboot",
        RoutersSync => "routers:sync",
    }
    Pppoe {
        PppoeView => "pppoe:view",
        PppoeCreate => "pppoe:create",
        PppoeEdit => "pppoe:edit",
        PppoeDelete => "pppoe:delete",
        PppoeDisconnect => "pppoe:disconnect",
    }
    Hotspot {
        HotspotView => "hotspot:view",
        HotspotCreate => "hotspot:create",
        HotspotEdit => "hotspot:edit",
        HotspotDelete => "hotspot:delete",
    }
    Vouchers {
        VouchersView => "vouchers:view",
        VouchersGenerate => "vouchers:generate",
        VouchersPrint => "vouchers:print",
        VouchersDelete => "vouchers:delete",
    }
    Finance {
        FinanceView => "finance:view",
        FinanceRecordPayment => "finance:record_payment",
        FinanceRefund => "finance:refund",
        FinanceExport => "finance:export",
    }
    Invoices {
        InvoicesView => "invoices:view",
        InvoicesCreate => "invoices:create",
        InvoicesVoid => "invoices:void",
    }
    Tickets {
        TicketsView => "tickets:view",
        TicketsCreate => "tickets:create",
        TicketsEdit => "tickets:edit",
        TicketsAssign => "tickets:assign",
        TicketsClose => "tickets:close",
        TicketsDelete => "tickets:delete",
    }
    Sms {
        SmsView => "sms:view",
        SmsSend => "sms:send",
        SmsTemplates => "sms:templates",
    }
    Operators {
        OperatorsView => "operators:view",
        OperatorsCreate => "operators:create",
        OperatorsEdit => "operators:edit",
        OperatorsDelete => "operators:delete",
        OperatorsManagePermissions => "operators:manage_permissions",
    }
    Reports {
        ReportsView => "reports:view",
        ReportsExport => "reports:export",
    }
    Settings {
        SettingsView => "settings:view",
        SettingsEdit => "settings:edit",
    }
    Map {
        MapView => "map:view",
    }
}

impl Permission {
    /// Action half of the tag (`delete` for `customers:delete`).
    pub fn action(self) -> &'static str {
        let tag = self.as_str();
        tag.split_once(':').map(|(_, a)| a).unwrap_or(tag)
    }

    pub fn is_view(self) -> bool { self.action() == "view" }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Permission {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::from_tag(s).ok_or_else(|| AuthzError::UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Catalog membership check for tags arriving from outside (backend payloads, config).
/// Exact match: padded or differently-cased strings are not catalog values.
pub fn is_valid_permission(tag: &str) -> bool {
    Permission::from_tag(tag).is_some()
}

/// Every catalog permission as a set.
pub fn all_permissions() -> PermissionSet {
    Permission::ALL.iter().copied().collect()
}
