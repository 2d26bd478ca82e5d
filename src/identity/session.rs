use std::sync::Arc;

use crate::tprintln;

use super::user::User;

/// Session state handed to the query layer explicitly. The user is an immutable snapshot;
/// login, refresh and logout replace it wholesale, never mutate it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<Arc<User>>,
    generation: u64,
}

impl Session {
    pub fn anonymous() -> Self { Self::default() }

    pub fn for_user(user: User) -> Self { Self { user: Some(Arc::new(user)), generation: 1 } }

    pub fn current_user(&self) -> Option<&User> { self.user.as_deref() }

    pub fn snapshot(&self) -> Option<Arc<User>> { self.user.clone() }

    pub fn is_authenticated(&self) -> bool { self.user.is_some() }

    /// Bumped on every replacement, so consumers can tell a re-fetched snapshot apart.
    pub fn generation(&self) -> u64 { self.generation }

    pub fn login(&mut self, user: User) {
        tprintln!("session.login user={} role={}", user.id, user.role);
        self.replace(Some(user));
    }

    /// Swap in a re-fetched record (e.g. after an admin edited the overrides).
    pub fn refresh(&mut self, user: User) { self.replace(Some(user)); }

    pub fn logout(&mut self) {
        if let Some(u) = &self.user { tprintln!("session.logout user={}", u.id); }
        self.replace(None);
    }

    fn replace(&mut self, user: Option<User>) {
        self.user = user.map(Arc::new);
        self.generation += 1;
    }
}
