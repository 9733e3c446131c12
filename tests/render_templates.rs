#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Template rendering against resolved host scopes, end to end.

mod common;

use common::TestProject;
use provkit::inventory::ResolvedInventory;
use provkit::render::{render_file, render_str};
use provkit::scope::Scope;
use provkit::session::Session;

const INVENTORY: &str = "\
hosts: [web1]
host_vars:
- host: web1
  vars:
    hostname: web1.example.com
    ntp: {server: pool.ntp.org, iburst: true}
defaults:
  domain: example.com
local_vars:
  build_dir: /tmp/build
";

fn session(project: &TestProject) -> Session {
    let inventory = ResolvedInventory::load(&project.project().default_inventory())
        .expect("inventory should load");
    Session::new(inventory)
}

#[test]
fn renders_template_file_against_host_scope() {
    let project = TestProject::new()
        .with_inventory(INVENTORY)
        .with_template(
            "ntp.conf.j2",
            "# {{ hostname }}\nserver {{ ntp.server }}{% if ntp.iburst %} iburst{% endif %}\n",
        );
    let mut session = session(&project);
    session.select("web1").expect("web1 is declared");

    let out = render_file(
        &project.project(),
        session.scope(),
        "ntp.conf.j2",
        &Scope::new(),
    )
    .expect("template renders");
    assert_eq!(out, "# web1.example.com\nserver pool.ntp.org iburst\n");
}

#[test]
fn call_site_overrides_have_highest_precedence() {
    let project = TestProject::new()
        .with_inventory(INVENTORY)
        .with_template("motd.j2", "host={{ hostname }}\n");
    let mut session = session(&project);
    session.select("web1").expect("web1 is declared");

    let mut overrides = Scope::new();
    overrides.set("hostname", serde_yaml::Value::from("overridden"));
    let out = render_file(&project.project(), session.scope(), "motd.j2", &overrides)
        .expect("template renders");
    assert_eq!(out, "host=overridden\n");
}

#[test]
fn unselected_session_renders_local_vars() {
    let project = TestProject::new()
        .with_inventory(INVENTORY)
        .with_template("build.j2", "dir={{ build_dir }}\n");
    let session = session(&project);

    let out = render_file(
        &project.project(),
        session.scope(),
        "build.j2",
        &Scope::new(),
    )
    .expect("template renders");
    assert_eq!(out, "dir=/tmp/build\n");
}

#[test]
fn undefined_variable_aborts_the_render() {
    let project = TestProject::new()
        .with_inventory(INVENTORY)
        .with_template("bad.j2", "{{ nonexistent_variable }}\n");
    let session = session(&project);

    let err = render_file(
        &project.project(),
        session.scope(),
        "bad.j2",
        &Scope::new(),
    )
    .expect_err("undefined reference must fail");
    assert!(
        err.to_string().contains("rendering 'bad.j2' failed"),
        "got: {err}"
    );
}

#[test]
fn missing_template_is_fatal() {
    let project = TestProject::new().with_inventory(INVENTORY).with_template(
        "exists.j2",
        "x\n",
    );
    let session = session(&project);
    let err = render_file(
        &project.project(),
        session.scope(),
        "absent.j2",
        &Scope::new(),
    )
    .expect_err("missing template must fail");
    assert!(
        err.to_string().starts_with("render_template: template"),
        "got: {err}"
    );
}

#[test]
fn literal_templates_are_strip_normalized() {
    let project = TestProject::new().with_inventory(INVENTORY);
    let mut session = session(&project);
    session.select("web1").expect("web1 is declared");

    let out = render_str(
        "
            search {{ domain }}
            nameserver 10.0.0.53
        ",
        session.scope(),
        &Scope::new(),
    )
    .expect("literal template renders");
    assert_eq!(out, "search example.com\nnameserver 10.0.0.53\n");
}
