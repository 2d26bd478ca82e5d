//! Memo of effective permission sets keyed on `(role, added, removed)`.
//! Purely an optimization: a miss recomputes through the resolver and the result is
//! identical to what a hit would have returned.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::resolver;
use super::user::User;
use crate::permissions::{PermissionSet, Role, RolePermissionMap};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    role: Role,
    added: PermissionSet,
    removed: PermissionSet,
}

impl MemoKey {
    fn of(user: &User) -> Self {
        Self { role: user.role, added: user.added_permissions.clone(), removed: user.removed_permissions.clone() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    pub clears: u64,
    pub entries: usize,
}

/// Bound to one role table for its whole life; use a fresh memo for a different table.
#[derive(Debug)]
pub struct EffectiveMemo {
    entries: RwLock<HashMap<MemoKey, Arc<PermissionSet>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    clears: AtomicU64,
}

impl EffectiveMemo {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    pub fn get_or_compute(&self, roles: &RolePermissionMap, user: &User) -> Arc<PermissionSet> {
        let key = MemoKey::of(user);
        if let Some(hit) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = Arc::new(resolver::effective_permissions(roles, Some(user)));
        debug!(target: "ispdash::authz", user = user.id.as_str(), role = %user.role, size = computed.len(), "effective set computed");
        let mut w = self.entries.write();
        if w.len() >= self.capacity {
            w.clear();
            self.clears.fetch_add(1, Ordering::Relaxed);
        }
        w.insert(key, computed.clone());
        computed
    }

    /// Drops every entry; counted in `clears` like a capacity clear.
    pub fn clear(&self) {
        self.entries.write().clear();
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }
}

impl Default for EffectiveMemo {
    fn default() -> Self { Self::with_capacity(512) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permission;

    #[test]
    fn hit_returns_same_set_as_fresh_computation() {
        let roles = RolePermissionMap::builtin();
        let memo = EffectiveMemo::default();
        let user = User::new("t", Role::Technician).with_added([Permission::RoutersDelete]);

        let a = memo.get_or_compute(&roles, &user);
        let b = memo.get_or_compute(&roles, &user);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, resolver::effective_permissions(&roles, Some(&user)));

        let s = memo.stats();
        assert_eq!((s.hits, s.misses, s.entries), (1, 1, 1));
    }

    #[test]
    fn key_ignores_user_id_but_tracks_overrides() {
        let roles = RolePermissionMap::builtin();
        let memo = EffectiveMemo::default();
        memo.get_or_compute(&roles, &User::new("a", Role::Viewer));
        memo.get_or_compute(&roles, &User::new("b", Role::Viewer));
        assert_eq!(memo.stats().hits, 1);

        let changed = User::new("a", Role::Viewer).with_removed([Permission::MapView]);
        let eff = memo.get_or_compute(&roles, &changed);
        assert!(!eff.contains(&Permission::MapView));
        assert_eq!(memo.stats().misses, 2);
    }

    #[test]
    fn full_memo_is_cleared_not_grown() {
        let roles = RolePermissionMap::builtin();
        let memo = EffectiveMemo::with_capacity(2);
        for role in [Role::Admin, Role::Operator, Role::Support] {
            memo.get_or_compute(&roles, &User::new("x", role));
        }
        let s = memo.stats();
        assert_eq!(s.clears, 1);
        assert_eq!(s.entries, 1);
    }

    #[test]
    fn manual_clear_is_counted() {
        let roles = RolePermissionMap::builtin();
        let memo = EffectiveMemo::default();
        let user = User::new("f", Role::Finance);
        memo.get_or_compute(&roles, &user);
        memo.clear();
        let s = memo.stats();
        assert_eq!((s.clears, s.entries), (1, 0));

        memo.get_or_compute(&roles, &user);
        assert_eq!(memo.stats().misses, 2);
    }
}
