//! Template rendering against resolved variable scopes.
//!
//! Thin layer over [`minijinja`]: the engine owns expression evaluation,
//! this module owns context construction and the `templates/` directory
//! convention. The context is the selected scope's variables overlaid
//! with explicit call-site overrides (highest precedence). Undefined
//! references are errors, never silently empty — a provisioning template
//! that names a missing variable must abort the run.

use indexmap::IndexMap;
use minijinja::{Environment, UndefinedBehavior};
use serde_yaml::Value;
use tracing::debug;

use crate::editor::strip_text;
use crate::error::RenderError;
use crate::scope::Scope;
use crate::session::Project;

/// Build the render context: scope variables plus overrides.
fn context(scope: &Scope, overrides: &Scope) -> IndexMap<String, Value> {
    let mut ctx: IndexMap<String, Value> = IndexMap::with_capacity(scope.len() + overrides.len());
    for (name, value) in scope {
        ctx.insert(name.clone(), value.clone());
    }
    for (name, value) in overrides {
        ctx.insert(name.clone(), value.clone());
    }
    ctx
}

fn strict_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

/// Render a template file from the project's `templates/` directory.
///
/// `name` is resolved under `<project>/templates/`; both the directory
/// and the file must exist. The context is `scope` overlaid with
/// `overrides`.
///
/// # Errors
///
/// Returns a [`RenderError`] when the conventional layout is violated,
/// the template has a syntax error, or it references an undefined
/// variable.
pub fn render_file(
    project: &Project,
    scope: &Scope,
    name: &str,
    overrides: &Scope,
) -> Result<String, RenderError> {
    let templates_dir = project.templates_dir();
    if !templates_dir.is_dir() {
        return Err(RenderError::TemplatesDirMissing {
            path: templates_dir,
        });
    }
    let template_path = templates_dir.join(name);
    if !template_path.is_file() {
        return Err(RenderError::TemplateMissing {
            path: template_path,
        });
    }
    let mut env = strict_env();
    env.set_loader(minijinja::path_loader(&templates_dir));
    let template = env.get_template(name).map_err(|source| RenderError::Render {
        name: name.to_string(),
        source,
    })?;
    let rendered = template
        .render(context(scope, overrides))
        .map_err(|source| RenderError::Render {
            name: name.to_string(),
            source,
        })?;
    debug!(template = name, "rendered template file");
    Ok(rendered)
}

/// Render a literal template string against `scope` plus `overrides`.
///
/// The result is passed through [`strip_text`], normalizing blank edges
/// and guaranteeing a single trailing newline — literal templates are
/// typically embedded heredoc-style in provisioning code and carry
/// indentation that must not reach the target file.
///
/// # Errors
///
/// Returns a [`RenderError`] on syntax errors and undefined references.
pub fn render_str(source: &str, scope: &Scope, overrides: &Scope) -> Result<String, RenderError> {
    let env = strict_env();
    let rendered = env
        .render_str(source, context(scope, overrides))
        .map_err(|source| RenderError::Render {
            name: "<string>".to_string(),
            source,
        })?;
    Ok(strip_text(Some(&rendered)))
}
