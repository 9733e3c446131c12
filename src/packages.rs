//! Package specification flattening.
//!
//! Provisioning variables describe package sets as arbitrarily nested
//! lists of names (a role may splice a shared group into its own list).
//! Package-manager semantics are out of scope; the stable contract at
//! this boundary is: parse the nesting into a tagged union, flatten it,
//! and dedupe preserving first-seen order. Wrappers around `yum`/`dnf`
//! and friends consume the flat list through an
//! [`Executor`](crate::exec::Executor).

use serde_yaml::Value;

use crate::error::PackageError;

/// One node of a package specification: a name or a nested group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSpec {
    /// A single package name.
    Name(String),
    /// A nested group of specifications.
    Group(Vec<PackageSpec>),
}

impl PackageSpec {
    /// Build a specification from a YAML value.
    ///
    /// Strings become [`PackageSpec::Name`], sequences become
    /// [`PackageSpec::Group`] recursively; anything else is rejected.
    /// A name may carry several whitespace-separated packages; they are
    /// split apart during [`flatten`].
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::InvalidLeaf`] for non-string, non-list
    /// nodes and [`PackageError::EmptyName`] for blank names.
    pub fn from_value(value: &Value) -> Result<Self, PackageError> {
        match value {
            Value::String(name) => {
                if name.trim().is_empty() {
                    Err(PackageError::EmptyName)
                } else {
                    Ok(Self::Name(name.clone()))
                }
            }
            Value::Sequence(items) => Ok(Self::Group(
                items.iter().map(Self::from_value).collect::<Result<_, _>>()?,
            )),
            Value::Null => Err(PackageError::InvalidLeaf { kind: "null" }),
            Value::Bool(_) => Err(PackageError::InvalidLeaf { kind: "boolean" }),
            Value::Number(_) => Err(PackageError::InvalidLeaf { kind: "number" }),
            Value::Mapping(_) => Err(PackageError::InvalidLeaf { kind: "mapping" }),
            Value::Tagged(_) => Err(PackageError::InvalidLeaf { kind: "tagged value" }),
        }
    }

    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            Self::Name(name) => {
                for token in name.split_whitespace() {
                    if !out.iter().any(|n| n == token) {
                        out.push(token.to_string());
                    }
                }
            }
            Self::Group(items) => {
                for item in items {
                    item.collect_into(out);
                }
            }
        }
    }
}

/// Flatten specifications into a deduped name list.
///
/// Order is first-seen across the whole nesting.
#[must_use]
pub fn flatten(specs: &[PackageSpec]) -> Vec<String> {
    let mut out = Vec::new();
    for spec in specs {
        spec.collect_into(&mut out);
    }
    out
}
