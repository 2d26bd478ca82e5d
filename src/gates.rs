//! Enforcement surfaces: what an action gate or a route guard decides. Rendering and
//! navigation belong to the host UI; this module only produces the decision.
//! These decisions shape UI affordances. The backend API remains the access-control boundary.

use serde::Serialize;
use tracing::debug;

use crate::config::AuthzConfig;
use crate::identity::PermissionQuery;
use crate::permissions::Permission;

/// Seam between gates and whatever answers permission questions.
pub trait PermissionCheck {
    fn is_authenticated(&self) -> bool;
    fn can(&self, permission: Permission) -> bool;

    fn can_any(&self, permissions: &[Permission]) -> bool { permissions.iter().any(|p| self.can(*p)) }
    fn can_all(&self, permissions: &[Permission]) -> bool { permissions.iter().all(|p| self.can(*p)) }
}

impl PermissionCheck for PermissionQuery {
    fn is_authenticated(&self) -> bool { PermissionQuery::is_authenticated(self) }
    fn can(&self, permission: Permission) -> bool { PermissionQuery::can(self, permission) }
    fn can_any(&self, permissions: &[Permission]) -> bool { PermissionQuery::can_any(self, permissions) }
    fn can_all(&self, permissions: &[Permission]) -> bool { PermissionQuery::can_all(self, permissions) }
}

/// The one requirement a gate evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    None,
    Single(Permission),
    AnyOf(Vec<Permission>),
    AllOf(Vec<Permission>),
}

impl Requirement {
    pub fn is_met<C: PermissionCheck + ?Sized>(&self, check: &C) -> bool {
        match self {
            Requirement::None => true,
            Requirement::Single(p) => check.can(*p),
            Requirement::AnyOf(ps) => check.can_any(ps),
            Requirement::AllOf(ps) => check.can_all(ps),
        }
    }
}

/// Props of an action gate as a UI component would receive them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateProps {
    pub permission: Option<Permission>,
    pub any_of: Option<Vec<Permission>>,
    pub all_of: Option<Vec<Permission>>,
    pub tooltip: Option<String>,
}

impl GateProps {
    pub fn single(p: Permission) -> Self { Self { permission: Some(p), ..Default::default() } }
    pub fn any_of(ps: Vec<Permission>) -> Self { Self { any_of: Some(ps), ..Default::default() } }
    pub fn all_of(ps: Vec<Permission>) -> Self { Self { all_of: Some(ps), ..Default::default() } }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// `permission` beats `any_of`, which beats `all_of`.
    pub fn requirement(&self) -> Requirement {
        if let Some(p) = self.permission { return Requirement::Single(p); }
        if let Some(ps) = &self.any_of { return Requirement::AnyOf(ps.clone()); }
        if let Some(ps) = &self.all_of { return Requirement::AllOf(ps.clone()); }
        Requirement::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    Enabled,
    Disabled { tooltip: String },
}

impl GateState {
    pub fn is_enabled(&self) -> bool { matches!(self, GateState::Enabled) }
}

pub fn evaluate_gate<C: PermissionCheck + ?Sized>(check: &C, props: &GateProps, config: &AuthzConfig) -> GateState {
    let req = props.requirement();
    if req.is_met(check) { return GateState::Enabled; }
    debug!(target: "ispdash::gates", requirement = ?req, "action gate disabled");
    let tooltip = props.tooltip.clone().unwrap_or_else(|| config.denied_tooltip.clone());
    GateState::Disabled { tooltip }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    Unauthenticated,
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
    Proceed,
    Redirect { to: String, reason: RedirectReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    pub required: Permission,
    pub login_route: String,
    pub unauthorized_route: String,
}

impl RouteGuard {
    pub fn new(required: Permission, config: &AuthzConfig) -> Self {
        Self {
            required,
            login_route: config.login_route.clone(),
            unauthorized_route: config.unauthorized_route.clone(),
        }
    }

    pub fn check<C: PermissionCheck + ?Sized>(&self, check: &C) -> RouteDecision {
        if !check.is_authenticated() {
            debug!(target: "ispdash::gates", required = %self.required, "route guard: no session");
            return RouteDecision::Redirect { to: self.login_route.clone(), reason: RedirectReason::Unauthenticated };
        }
        if !check.can(self.required) {
            debug!(target: "ispdash::gates", required = %self.required, "route guard: not permitted");
            return RouteDecision::Redirect { to: self.unauthorized_route.clone(), reason: RedirectReason::Unauthorized };
        }
        RouteDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Fixed {
        authed: bool,
        granted: HashSet<Permission>,
    }

    impl PermissionCheck for Fixed {
        fn is_authenticated(&self) -> bool { self.authed }
        fn can(&self, p: Permission) -> bool { self.granted.contains(&p) }
    }

    fn fixed(perms: &[Permission]) -> Fixed { Fixed { authed: true, granted: perms.iter().copied().collect() } }

    #[test]
    fn single_permission_takes_priority() {
        let check = fixed(&[Permission::RoutersView]);
        let props = GateProps {
            permission: Some(Permission::RoutersDelete),
            any_of: Some(vec![Permission::RoutersView]),
            all_of: Some(vec![Permission::RoutersView]),
            tooltip: Some("Only admins can delete routers".into()),
        };
        assert_eq!(props.requirement(), Requirement::Single(Permission::RoutersDelete));
        assert_eq!(
            evaluate_gate(&check, &props, &AuthzConfig::default()),
            GateState::Disabled { tooltip: "Only admins can delete routers".into() }
        );
    }

    #[test]
    fn any_of_beats_all_of() {
        let check = fixed(&[Permission::TicketsView]);
        let props = GateProps {
            any_of: Some(vec![Permission::TicketsView, Permission::TicketsAssign]),
            all_of: Some(vec![Permission::TicketsView, Permission::TicketsAssign]),
            ..Default::default()
        };
        assert!(evaluate_gate(&check, &props, &AuthzConfig::default()).is_enabled());
    }

    #[test]
    fn default_tooltip_comes_from_config() {
        let cfg = AuthzConfig { denied_tooltip: "Ask your admin".into(), ..Default::default() };
        let state = evaluate_gate(&fixed(&[]), &GateProps::all_of(vec![Permission::SmsSend]), &cfg);
        assert_eq!(state, GateState::Disabled { tooltip: "Ask your admin".into() });
    }

    #[test]
    fn empty_lists_follow_vacuous_rules() {
        let cfg = AuthzConfig::default();
        let check = fixed(&[]);
        assert!(!evaluate_gate(&check, &GateProps::any_of(vec![]), &cfg).is_enabled());
        assert!(evaluate_gate(&check, &GateProps::all_of(vec![]), &cfg).is_enabled());
        assert!(evaluate_gate(&check, &GateProps::default(), &cfg).is_enabled());
    }

    #[test]
    fn route_guard_redirects() {
        let cfg = AuthzConfig::default();
        let guard = RouteGuard::new(Permission::FinanceView, &cfg);

        let anon = Fixed { authed: false, granted: HashSet::new() };
        assert_eq!(
            guard.check(&anon),
            RouteDecision::Redirect { to: "/login".into(), reason: RedirectReason::Unauthenticated }
        );
        assert_eq!(
            guard.check(&fixed(&[Permission::TicketsView])),
            RouteDecision::Redirect { to: "/unauthorized".into(), reason: RedirectReason::Unauthorized }
        );
        assert_eq!(guard.check(&fixed(&[Permission::FinanceView])), RouteDecision::Proceed);
    }

    #[test]
    fn decisions_serialize_for_the_ui() {
        let v = serde_json::to_value(GateState::Disabled { tooltip: "no".into() }).unwrap();
        assert_eq!(v, serde_json::json!({"state": "disabled", "tooltip": "no"}));
        let v = serde_json::to_value(RouteDecision::Proceed).unwrap();
        assert_eq!(v, serde_json::json!({"action": "proceed"}));
    }
}
