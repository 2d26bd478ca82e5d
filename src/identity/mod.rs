//! Per-user side of authorization: the user snapshot, the pure resolver, the memoized
//! query surface and the explicit session/context objects it is bound to.
//! Keep the public surface thin and split implementation across sub-modules.

mod user;
mod session;
mod request_context;
mod memo;
pub mod resolver;
mod query;

pub use user::{User, CurrentUserPayload, parse_current_user};
pub use session::Session;
pub use request_context::AuthzContext;
pub use memo::{EffectiveMemo, MemoStats};
pub use resolver::{
    effective_permissions, has_permission, has_any_permission, has_all_permissions,
    has_permission_tag, has_any_tag, has_all_tags, explain, Decision, Reason,
};
pub use query::PermissionQuery;
