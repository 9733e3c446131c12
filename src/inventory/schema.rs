//! Structural validation of the inventory document.
//!
//! The schema is closed: exactly one of `hosts`/`roles`, the optional
//! `host_vars`/`role_vars`/`defaults`/`local_vars` blocks, and nothing
//! else. Validation is all-or-nothing and every violation maps to one
//! specific [`InventoryError`]; there is no partial or recoverable
//! parse.

use serde_yaml::{Mapping, Value};

use crate::error::InventoryError;
use crate::scope::Scope;

/// One `roles` entry after validation.
#[derive(Debug, Clone)]
pub(crate) struct RawRole {
    pub(crate) name: String,
    pub(crate) hosts: Vec<String>,
}

/// The whole document after structural validation, before resolution.
#[derive(Debug)]
pub(crate) struct RawInventory {
    /// `hosts` list (mutually exclusive with `roles`).
    pub(crate) hosts: Vec<String>,
    /// `roles` entries in declaration order.
    pub(crate) roles: Vec<RawRole>,
    /// Per-host variable blocks, in declaration order.
    pub(crate) host_vars: Vec<(String, Scope)>,
    /// Per-role variable blocks, in declaration order.
    pub(crate) role_vars: Vec<(String, Scope)>,
    /// Global defaults.
    pub(crate) defaults: Scope,
    /// Variables for the control machine, outside any host scope.
    pub(crate) local_vars: Scope,
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}

/// Validate a list of non-empty unique host strings.
fn host_list(
    value: &Value,
    list_key: &'static str,
    item_what: &str,
    duplicate: impl Fn(String) -> InventoryError,
) -> Result<Vec<String>, InventoryError> {
    let items = value
        .as_sequence()
        .ok_or(InventoryError::ListExpected { key: list_key })?;
    if items.is_empty() {
        return Err(InventoryError::EmptyList { key: list_key });
    }
    let mut hosts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Null => {
                return Err(InventoryError::EmptyString {
                    what: format!("{item_what} host"),
                });
            }
            Value::String(s) if s.is_empty() => {
                return Err(InventoryError::EmptyString {
                    what: format!("{item_what} host"),
                });
            }
            Value::String(s) => {
                if hosts.contains(s) {
                    return Err(duplicate(s.clone()));
                }
                hosts.push(s.clone());
            }
            _ => {
                return Err(InventoryError::StringListExpected {
                    what: item_what.to_string(),
                });
            }
        }
    }
    Ok(hosts)
}

/// Convert a YAML mapping into a [`Scope`], requiring string keys.
fn vars_scope(value: &Value, what: &str) -> Result<Scope, InventoryError> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| InventoryError::MappingExpected {
            key: what.to_string(),
        })?;
    let mut scope = Scope::new();
    for (name, val) in mapping {
        let Some(name) = name.as_str() else {
            return Err(InventoryError::StringExpected {
                what: format!("{what} variable name"),
            });
        };
        scope.set(name, val.clone());
    }
    Ok(scope)
}

/// A required, non-empty string field of a list entry.
fn entry_string(
    entry: &mut Mapping,
    list_key: &'static str,
    field: &'static str,
    check_empty: bool,
) -> Result<String, InventoryError> {
    let value = entry
        .remove(&key(field))
        .ok_or(InventoryError::FieldRequired {
            key: list_key,
            field,
        })?;
    match value {
        Value::Null if check_empty => Err(InventoryError::EmptyString {
            what: format!("{list_key} {field}"),
        }),
        Value::String(s) if s.is_empty() && check_empty => Err(InventoryError::EmptyString {
            what: format!("{list_key} {field}"),
        }),
        Value::String(s) => Ok(s),
        _ => Err(InventoryError::StringExpected {
            what: format!("{list_key} {field}"),
        }),
    }
}

fn reject_leftover(entry: &Mapping, list_key: &'static str) -> Result<(), InventoryError> {
    if entry.is_empty() {
        Ok(())
    } else {
        let fields: Vec<String> = entry.keys().map(describe).collect();
        Err(InventoryError::UnexpectedEntryFields {
            key: list_key,
            fields: fields.join(", "),
        })
    }
}

fn entry_mapping(item: &Value, list_key: &'static str) -> Result<Mapping, InventoryError> {
    item.as_mapping()
        .cloned()
        .ok_or_else(|| InventoryError::MappingExpected {
            key: format!("{list_key} entry"),
        })
}

/// Validate `roles` entries.
fn roles_list(value: &Value) -> Result<Vec<RawRole>, InventoryError> {
    let items = value
        .as_sequence()
        .ok_or(InventoryError::ListExpected { key: "roles" })?;
    if items.is_empty() {
        return Err(InventoryError::EmptyList { key: "roles" });
    }
    let mut roles: Vec<RawRole> = Vec::with_capacity(items.len());
    for item in items {
        let mut entry = entry_mapping(item, "roles")?;
        let name = entry_string(&mut entry, "roles", "role", true)?;
        let hosts_value = entry
            .remove(&key("hosts"))
            .ok_or(InventoryError::FieldRequired {
                key: "roles",
                field: "hosts",
            })?;
        let hosts = host_list(&hosts_value, "roles hosts", "role hosts", |host| {
            InventoryError::DuplicateRoleHost {
                host,
                role: name.clone(),
            }
        })?;
        if roles.iter().any(|r| r.name == name) {
            return Err(InventoryError::DuplicateRole { role: name });
        }
        reject_leftover(&entry, "roles")?;
        roles.push(RawRole { name, hosts });
    }
    Ok(roles)
}

/// Validate `host_vars` entries against the declared hosts.
fn host_vars_list(
    value: &Value,
    hosts: &[String],
    role_hosts: &[String],
    roles_mode: bool,
) -> Result<Vec<(String, Scope)>, InventoryError> {
    let items = value
        .as_sequence()
        .ok_or(InventoryError::ListExpected { key: "host_vars" })?;
    let mut out: Vec<(String, Scope)> = Vec::with_capacity(items.len());
    for item in items {
        let mut entry = entry_mapping(item, "host_vars")?;
        let host = entry_string(&mut entry, "host_vars", "host", false)?;
        if roles_mode {
            if !role_hosts.contains(&host) {
                return Err(InventoryError::UnknownRoleHost { host });
            }
        } else if !hosts.contains(&host) {
            return Err(InventoryError::UnknownHost { host });
        }
        let vars_value = entry
            .remove(&key("vars"))
            .ok_or(InventoryError::FieldRequired {
                key: "host_vars",
                field: "vars",
            })?;
        let vars = vars_scope(&vars_value, "host_vars vars")?;
        if out.iter().any(|(h, _)| *h == host) {
            return Err(InventoryError::DuplicateHostVars { host });
        }
        reject_leftover(&entry, "host_vars")?;
        out.push((host, vars));
    }
    Ok(out)
}

/// Validate `role_vars` entries against the declared roles.
fn role_vars_list(
    value: &Value,
    roles: &[RawRole],
) -> Result<Vec<(String, Scope)>, InventoryError> {
    let items = value
        .as_sequence()
        .ok_or(InventoryError::ListExpected { key: "role_vars" })?;
    let mut out: Vec<(String, Scope)> = Vec::with_capacity(items.len());
    for item in items {
        let mut entry = entry_mapping(item, "role_vars")?;
        let role = entry_string(&mut entry, "role_vars", "role", false)?;
        if !roles.iter().any(|r| r.name == role) {
            return Err(InventoryError::UnknownRole { role });
        }
        let vars_value = entry
            .remove(&key("vars"))
            .ok_or(InventoryError::FieldRequired {
                key: "role_vars",
                field: "vars",
            })?;
        let vars = vars_scope(&vars_value, "role_vars vars")?;
        if out.iter().any(|(r, _)| *r == role) {
            return Err(InventoryError::DuplicateRoleVars { role });
        }
        reject_leftover(&entry, "role_vars")?;
        out.push((role, vars));
    }
    Ok(out)
}

/// Parse and validate the whole inventory document.
pub(crate) fn parse_document(text: &str) -> Result<RawInventory, InventoryError> {
    let value: Value = serde_yaml::from_str(text)?;
    let mut map = value
        .as_mapping()
        .cloned()
        .ok_or(InventoryError::NotAMapping)?;

    let hosts_value = map.remove(&key("hosts"));
    let roles_value = map.remove(&key("roles"));
    if hosts_value.is_some() && roles_value.is_some() {
        return Err(InventoryError::HostsAndRoles);
    }
    if hosts_value.is_none() && roles_value.is_none() {
        return Err(InventoryError::HostsOrRolesRequired);
    }

    let hosts = match &hosts_value {
        Some(value) => host_list(value, "hosts", "hosts", |host| {
            InventoryError::DuplicateHost { host }
        })?,
        None => Vec::new(),
    };
    let roles = match &roles_value {
        Some(value) => roles_list(value)?,
        None => Vec::new(),
    };
    let roles_mode = roles_value.is_some();

    // Union of every role's hosts, in first-seen order.
    let mut role_hosts: Vec<String> = Vec::new();
    for role in &roles {
        for host in &role.hosts {
            if !role_hosts.contains(host) {
                role_hosts.push(host.clone());
            }
        }
    }

    let host_vars = match map.remove(&key("host_vars")) {
        Some(value) => host_vars_list(&value, &hosts, &role_hosts, roles_mode)?,
        None => Vec::new(),
    };
    let role_vars = match map.remove(&key("role_vars")) {
        Some(value) => {
            if !roles_mode {
                return Err(InventoryError::RoleVarsWithoutRoles);
            }
            role_vars_list(&value, &roles)?
        }
        None => Vec::new(),
    };
    let defaults = match map.remove(&key("defaults")) {
        Some(value) => vars_scope(&value, "defaults")?,
        None => Scope::new(),
    };
    let local_vars = match map.remove(&key("local_vars")) {
        Some(value) => vars_scope(&value, "local_vars")?,
        None => Scope::new(),
    };

    if !map.is_empty() {
        let keys: Vec<String> = map.keys().map(describe).collect();
        return Err(InventoryError::UnexpectedKeys {
            keys: keys.join(", "),
        });
    }

    Ok(RawInventory {
        hosts,
        roles,
        host_vars,
        role_vars,
        defaults,
        local_vars,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn err(text: &str) -> String {
        parse_document(text).unwrap_err().to_string()
    }

    #[test]
    fn hosts_and_roles_are_mutually_exclusive() {
        assert_eq!(
            err("hosts: [a]\nroles: [{role: r, hosts: [b]}]\n"),
            "hosts and roles can't be simultaneously defined in config"
        );
    }

    #[test]
    fn hosts_or_roles_must_be_present() {
        assert_eq!(err("defaults: {}\n"), "hosts or roles must be defined in config");
    }

    #[test]
    fn hosts_shape_violations() {
        assert_eq!(err("hosts: 5\n"), "hosts must be list type");
        assert_eq!(err("hosts: []\n"), "hosts must not be empty");
        assert_eq!(err("hosts: ['']\n"), "hosts host can't be empty string");
        assert_eq!(err("hosts: [null]\n"), "hosts host can't be empty string");
        assert_eq!(err("hosts: [5]\n"), "hosts must be list of strings");
        assert_eq!(
            err("hosts: [a, a]\n"),
            "host 'a' already defined in hosts list"
        );
    }

    #[test]
    fn roles_shape_violations() {
        assert_eq!(err("roles: {}\n"), "roles must be list type");
        assert_eq!(err("roles: []\n"), "roles must not be empty");
        assert_eq!(err("roles: [{hosts: [a]}]\n"), "roles role required");
        assert_eq!(
            err("roles: [{role: '', hosts: [a]}]\n"),
            "roles role can't be empty string"
        );
        assert_eq!(
            err("roles: [{role: 5, hosts: [a]}]\n"),
            "roles role must be string type"
        );
        assert_eq!(err("roles: [{role: r}]\n"), "roles hosts required");
        assert_eq!(
            err("roles: [{role: r, hosts: 5}]\n"),
            "roles hosts must be list type"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: []}]\n"),
            "roles hosts must not be empty"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: ['']}]\n"),
            "role hosts host can't be empty string"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: [5]}]\n"),
            "role hosts must be list of strings"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: [a, a]}]\n"),
            "host 'a' already defined in role 'r' hosts list"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: [a]}, {role: r, hosts: [b]}]\n"),
            "role 'r' already defined"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: [a], extra: 1}]\n"),
            "unexpected roles entry: extra"
        );
    }

    #[test]
    fn host_may_belong_to_multiple_roles() {
        let raw =
            parse_document("roles:\n- {role: web, hosts: [a, b]}\n- {role: db, hosts: [a]}\n")
                .unwrap();
        assert_eq!(raw.roles.len(), 2);
    }

    #[test]
    fn host_vars_violations() {
        assert_eq!(
            err("hosts: [a]\nhost_vars: {}\n"),
            "host_vars must be list type"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{vars: {}}]\n"),
            "host_vars host required"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{host: 5, vars: {}}]\n"),
            "host_vars host must be string type"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{host: b, vars: {}}]\n"),
            "host_vars host 'b' not defined in hosts list"
        );
        assert_eq!(
            err("roles: [{role: r, hosts: [a]}]\nhost_vars: [{host: b, vars: {}}]\n"),
            "host_vars host 'b' not defined in roles hosts list"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{host: a}]\n"),
            "host_vars vars required"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{host: a, vars: 5}]\n"),
            "host_vars vars must be dictionary type"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{host: a, vars: {}}, {host: a, vars: {}}]\n"),
            "host_vars host 'a' already defined"
        );
        assert_eq!(
            err("hosts: [a]\nhost_vars: [{host: a, vars: {}, extra: 1}]\n"),
            "unexpected host_vars entry: extra"
        );
    }

    #[test]
    fn role_vars_violations() {
        assert_eq!(
            err("hosts: [a]\nrole_vars: [{role: r, vars: {}}]\n"),
            "unexpected role_vars, because roles is not defined"
        );
        let base = "roles: [{role: r, hosts: [a]}]\n";
        assert_eq!(
            err(&format!("{base}role_vars: {{}}\n")),
            "role_vars must be list type"
        );
        assert_eq!(
            err(&format!("{base}role_vars: [{{vars: {{}}}}]\n")),
            "role_vars role required"
        );
        assert_eq!(
            err(&format!("{base}role_vars: [{{role: x, vars: {{}}}}]\n")),
            "role_vars role 'x' not defined in roles"
        );
        assert_eq!(
            err(&format!("{base}role_vars: [{{role: r}}]\n")),
            "role_vars vars required"
        );
        assert_eq!(
            err(&format!("{base}role_vars: [{{role: r, vars: []}}]\n")),
            "role_vars vars must be dictionary type"
        );
        assert_eq!(
            err(&format!(
                "{base}role_vars: [{{role: r, vars: {{}}}}, {{role: r, vars: {{}}}}]\n"
            )),
            "role_vars role 'r' already defined"
        );
    }

    #[test]
    fn defaults_and_local_vars_must_be_mappings() {
        assert_eq!(
            err("hosts: [a]\ndefaults: []\n"),
            "defaults must be dictionary type"
        );
        assert_eq!(
            err("hosts: [a]\nlocal_vars: []\n"),
            "local_vars must be dictionary type"
        );
    }

    #[test]
    fn unknown_top_level_keys_are_fatal() {
        assert_eq!(
            err("hosts: [a]\nbogus: 1\n"),
            "unexpected config entry: bogus"
        );
    }

    #[test]
    fn non_mapping_document_is_fatal() {
        assert_eq!(err("- just\n- a\n- list\n"), "config must be dictionary type");
    }
}
