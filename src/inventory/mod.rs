//! Inventory parsing and per-host variable resolution.
//!
//! The inventory document declares target hosts — either a flat `hosts`
//! list or `roles` with host lists — plus layered variables. Parsing
//! produces an immutable [`ResolvedInventory`] value: validation happens
//! once, scopes are materialized per host, and the result is threaded
//! explicitly by callers. Re-parsing builds a new value; nothing is
//! mutated in place and no process-global state exists.

mod schema;

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::InventoryError;
use crate::scope::Scope;

/// A named role and the hosts that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Unique role name.
    pub name: String,
    /// Hosts belonging to this role, in declaration order.
    pub hosts: Vec<String>,
}

/// The parsed inventory: hosts, roles, and fully layered per-host scopes.
///
/// Immutable after construction. Each host's [`Scope`] is already the
/// result of layering `defaults` → its roles' `role_vars` (in role
/// declaration order) → its `host_vars`, with every value deep-copied so
/// scopes are independent of each other and of the source document.
#[derive(Debug, Clone)]
pub struct ResolvedInventory {
    hosts: Vec<String>,
    roles: Vec<Role>,
    scopes: IndexMap<String, Scope>,
    local: Scope,
}

impl ResolvedInventory {
    /// Parse and resolve an inventory document.
    ///
    /// # Errors
    ///
    /// Returns an [`InventoryError`] on the first schema violation; no
    /// partial inventory is ever produced.
    pub fn parse(text: &str) -> Result<Self, InventoryError> {
        let raw = schema::parse_document(text)?;

        // Target list: the hosts list itself, or the union of role hosts
        // in first-seen order.
        let hosts = if raw.roles.is_empty() {
            raw.hosts.clone()
        } else {
            let mut union: Vec<String> = Vec::new();
            for role in &raw.roles {
                for host in &role.hosts {
                    if !union.contains(host) {
                        union.push(host.clone());
                    }
                }
            }
            union
        };

        let mut scopes: IndexMap<String, Scope> = IndexMap::with_capacity(hosts.len());
        for host in &hosts {
            let mut scope = raw.defaults.clone();
            for role in &raw.roles {
                if !role.hosts.contains(host) {
                    continue;
                }
                if let Some((_, vars)) = raw.role_vars.iter().find(|(name, _)| name == &role.name)
                {
                    scope.layer(vars);
                }
            }
            if let Some((_, vars)) = raw.host_vars.iter().find(|(name, _)| name == host) {
                scope.layer(vars);
            }
            scopes.insert(host.clone(), scope);
        }

        let roles = raw
            .roles
            .into_iter()
            .map(|r| Role {
                name: r.name,
                hosts: r.hosts,
            })
            .collect::<Vec<_>>();

        debug!(
            hosts = hosts.len(),
            roles = roles.len(),
            "resolved inventory"
        );
        Ok(Self {
            hosts,
            roles,
            scopes,
            local: raw.local_vars,
        })
    }

    /// Read and parse the inventory file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Missing`] when the file does not exist,
    /// [`InventoryError::Read`] when it cannot be read, and any parse
    /// error from [`ResolvedInventory::parse`].
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        if !path.is_file() {
            return Err(InventoryError::Missing {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading inventory");
        Self::parse(&text)
    }

    /// All target hosts, in declaration (or first-seen) order.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// All roles, in declaration order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Whether `host` is a declared target.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.scopes.contains_key(host)
    }

    /// The roles `host` belongs to, in role declaration order.
    #[must_use]
    pub fn host_roles(&self, host: &str) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|r| r.hosts.iter().any(|h| h == host))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// The resolved variable scope for `host`.
    #[must_use]
    pub fn scope(&self, host: &str) -> Option<&Scope> {
        self.scopes.get(host)
    }

    /// Variables for the control machine, outside any host scope.
    #[must_use]
    pub fn local(&self) -> &Scope {
        &self.local
    }
}
