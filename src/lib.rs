//! Server provisioning toolkit.
//!
//! Idempotent configuration management over plain shell transports:
//! composable text-file editors proven idempotent and applied through
//! atomic replacement, a host/role inventory with layered variable
//! resolution, and template rendering against the resolved scopes.
//!
//! The public API is organised into focused layers:
//!
//! - **[`inventory`]** / **[`scope`]** — parse the inventory document into
//!   immutable per-host variable scopes
//! - **[`editor`]** — composable, idempotence-checked text transformations
//! - **[`fileio`]** — change-aware reads and atomic, metadata-preserving
//!   writes, local or through an executor
//! - **[`render`]** — template expansion against a resolved scope
//! - **[`exec`]** — the consumed transport interface (`run`/`upload`/
//!   `download`) with a local implementation
//! - **[`session`]** — project conventions and current-host selection at
//!   the orchestration boundary
//! - **[`commands`]** — CLI subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod editor;
pub mod error;
pub mod exec;
pub mod fileio;
pub mod inventory;
pub mod logging;
pub mod packages;
pub mod render;
pub mod scope;
pub mod session;
