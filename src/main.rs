//!
//! ispdash CLI
//! -----------
//! Inspect how the dashboard resolves permissions: print the catalog, a role's defaults,
//! or the effective permissions of a `CurrentUser` JSON document.

use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ispdash::config::AuthzConfig;
use ispdash::identity::{parse_current_user, AuthzContext, PermissionQuery, Session};
use ispdash::permissions::{Resource, Role};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --catalog\n  {program} --role <ROLE>\n  {program} --user <file|-> [--check <permission>]...\n\nFlags:\n  --catalog              List every permission grouped by resource\n  --role <ROLE>          Show the default permissions of a role (e.g. OPERATOR)\n  --user <file|->        CurrentUser JSON document; '-' reads stdin. 'null' means no session\n  --check <permission>   Explain a single permission for the user (repeatable)\n  -h, --help             Show this help\n\nEnvironment:\n  ISPDASH_AUTHZ_CONFIG   Optional JSON config file\n  ISPDASH_UNKNOWN_TAGS   ignore | reject\n  RUST_LOG               Log filter (default: info)"
    );
}

fn read_user_doc(src: &str) -> Result<String> {
    if src == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading user document from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(src).with_context(|| format!("reading user document '{}'", src))
    }
}

fn print_catalog() {
    for r in Resource::ALL {
        let tags: Vec<&str> = r.permissions().map(|p| p.as_str()).collect();
        println!("{:<10} {}", r.as_str(), tags.join(", "));
    }
}

fn print_role(ctx: &AuthzContext, name: &str) -> Result<()> {
    let role: Role = name.parse()?;
    println!("{} ({})", role, role.label());
    for p in ctx.roles.permissions_for_role(role) {
        println!("  {}", p);
    }
    Ok(())
}

fn print_user(ctx: &AuthzContext, doc: &str, checks: &[String]) -> Result<()> {
    let user = parse_current_user(doc, ctx.config.unknown_tag_policy)?;
    let session = match user {
        Some(u) => Session::for_user(u),
        None => Session::anonymous(),
    };
    let q = PermissionQuery::new(ctx, &session);
    match q.user() {
        Some(u) => println!("user {} role {}", u.id, u.role),
        None => println!("no session"),
    }
    for p in q.effective_permissions() {
        let origin = if q.is_custom_added(*p) { "added" } else { "default" };
        println!("  {:<32} {}", p.as_str(), origin);
    }
    for p in q.role_permissions() {
        if q.is_custom_removed(*p) {
            println!("  {:<32} removed", p.as_str());
        }
    }
    for tag in checks {
        let d = q.explain(tag);
        println!("check {:<32} {} ({})", tag, if d.allow { "allow" } else { "deny" }, d.reason.as_str());
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("invalid log filter: {}", e))?;
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut catalog = false;
    let mut role: Option<String> = None;
    let mut user_src: Option<String> = None;
    let mut checks: Vec<String> = Vec::new();

    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--catalog" => catalog = true,
            "--role" => role = Some(it.next().ok_or_else(|| anyhow!("--role needs a value"))?),
            "--user" => user_src = Some(it.next().ok_or_else(|| anyhow!("--user needs a value"))?),
            "--check" => checks.push(it.next().ok_or_else(|| anyhow!("--check needs a value"))?),
            "-h" | "--help" => { print_usage(&program); return Ok(()); }
            other => { print_usage(&program); return Err(anyhow!("unknown argument '{}'", other)); }
        }
    }

    let config = AuthzConfig::from_env().context("loading authz config")?;
    let ctx = AuthzContext::new(config).context("building role table")?;
    info!(target: "ispdash", "role table ready: {} role(s)", ctx.roles.roles().count());

    if catalog {
        print_catalog();
    } else if let Some(name) = role {
        print_role(&ctx, &name)?;
    } else if let Some(src) = user_src {
        let doc = read_user_doc(&src)?;
        print_user(&ctx, &doc, &checks)?;
    } else {
        print_usage(&program);
    }
    Ok(())
}
