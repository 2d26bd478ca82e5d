use super::*;
use crate::permissions::{Permission, Role};
use std::io::Write;

#[test]
fn defaults() {
    let cfg = AuthzConfig::default();
    assert_eq!(cfg.unknown_tag_policy, UnknownTagPolicy::Ignore);
    assert_eq!(cfg.memo_capacity, 512);
    assert_eq!(cfg.login_route, "/login");
    assert_eq!(cfg.unauthorized_route, "/unauthorized");
    assert_eq!(cfg.role_map().unwrap(), RolePermissionMap::builtin());
}

#[test]
fn load_partial_file_keeps_defaults() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"{{ "unknown_tag_policy": "reject", "role_defaults": {{ "SUPPORT": ["tickets:view"] }} }}"#
    )
    .unwrap();
    let cfg = AuthzConfig::load(f.path()).unwrap();
    assert_eq!(cfg.unknown_tag_policy, UnknownTagPolicy::Reject);
    assert_eq!(cfg.memo_capacity, 512);
    let map = cfg.role_map().unwrap();
    assert_eq!(map.permissions_for_role(Role::Support).into_iter().collect::<Vec<_>>(), vec![Permission::TicketsView]);
}

#[test]
fn load_rejects_unknown_tags_in_role_table() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, r#"{{ "role_defaults": {{ "ADMIN": ["routers:launch"] }} }}"#).unwrap();
    let err = AuthzConfig::load(f.path()).unwrap_err();
    assert_eq!(err.code_str(), "config_error");
    assert!(err.to_string().contains("routers:launch"));
}

#[test]
fn load_reports_malformed_json_as_config_error() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "{{ not json").unwrap();
    assert_eq!(AuthzConfig::load(f.path()).unwrap_err().code_str(), "config_error");
    let missing = f.path().with_extension("missing");
    assert_eq!(AuthzConfig::load(&missing).unwrap_err().code_str(), "io_error");
}

#[test]
fn policy_parsing() {
    assert_eq!("Reject".parse::<UnknownTagPolicy>().unwrap(), UnknownTagPolicy::Reject);
    assert_eq!(" ignore".parse::<UnknownTagPolicy>().unwrap(), UnknownTagPolicy::Ignore);
    assert!("strict".parse::<UnknownTagPolicy>().is_err());
}

// Only test that touches these variables; prior values are restored on the way out.
struct EnvRestore(Vec<(&'static str, Option<String>)>);

impl EnvRestore {
    fn capture(keys: &[&'static str]) -> Self {
        EnvRestore(keys.iter().map(|k| (*k, std::env::var(k).ok())).collect())
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (k, v) in &self.0 {
            match v {
                Some(v) => std::env::set_var(k, v),
                None => std::env::remove_var(k),
            }
        }
    }
}

#[test]
fn from_env_reads_file_and_policy_override() {
    let _restore = EnvRestore::capture(&[CONFIG_PATH_ENV, UNKNOWN_TAGS_ENV]);
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"{{ "unknown_tag_policy": "ignore", "memo_capacity": 16, "role_defaults": {{ "SUPPORT": ["tickets:view"] }} }}"#
    )
    .unwrap();

    std::env::set_var(CONFIG_PATH_ENV, f.path());
    std::env::remove_var(UNKNOWN_TAGS_ENV);
    let cfg = AuthzConfig::from_env().unwrap();
    assert_eq!(cfg.unknown_tag_policy, UnknownTagPolicy::Ignore);
    assert_eq!(cfg.memo_capacity, 16);
    assert_eq!(
        cfg.role_map().unwrap().permissions_for_role(Role::Support).into_iter().collect::<Vec<_>>(),
        vec![Permission::TicketsView]
    );

    std::env::set_var(UNKNOWN_TAGS_ENV, "reject");
    let cfg = AuthzConfig::from_env().unwrap();
    assert_eq!(cfg.unknown_tag_policy, UnknownTagPolicy::Reject);
    assert_eq!(cfg.memo_capacity, 16);

    std::env::set_var(UNKNOWN_TAGS_ENV, "bogus");
    let err = AuthzConfig::from_env().unwrap_err();
    assert_eq!(err.code_str(), "config_error");
    assert!(err.to_string().contains(UNKNOWN_TAGS_ENV), "{}", err);

    std::env::remove_var(CONFIG_PATH_ENV);
    std::env::remove_var(UNKNOWN_TAGS_ENV);
    assert_eq!(AuthzConfig::from_env().unwrap(), AuthzConfig::default());
}
