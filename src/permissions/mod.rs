//! Static permission catalog and the role → default-permission table.
//! Both are immutable once built; per-user variation lives in `identity`.

mod catalog;
mod roles;

pub use catalog::{all_permissions, is_valid_permission, Permission, PermissionSet, Resource};
pub use roles::{builtin_role_map, permissions_for_role, Role, RolePermissionMap};
