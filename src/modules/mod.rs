//! Built-in test modules.
//!
//! Each submodule exports one [`ModuleGroup`] describing its tests; the
//! registry indexes [`GROUPS`] at startup.

pub mod core_mixin;
pub mod core_paths;
pub mod core_query;
pub mod core_resources;
pub mod samples;

use crate::registry::ModuleGroup;
use crate::tester::{Args, Assertions, Context, Signal};

/// Every built-in group, in listing order.
pub static GROUPS: &[ModuleGroup] = &[
    core_query::GROUP,
    core_resources::GROUP,
    core_paths::GROUP,
    core_mixin::GROUP,
    samples::GROUP,
];

/// Path of the OCCI query interface.
pub const QUERY_INTERFACE: &str = "/-/";

pub const CORE_SCHEME: &str = "http://schemas.ogf.org/occi/core#";
pub const INFRASTRUCTURE_SCHEME: &str = "http://schemas.ogf.org/occi/infrastructure#";
pub const IPNETWORK_SCHEME: &str = "http://schemas.ogf.org/occi/infrastructure/network#";
pub const TENT_MIXIN_SCHEME: &str = "http://example.com/occi-tent/tent_custom_mixin#";

/// Read a required path argument.
fn required_path(t: &Context, args: &Args, name: &str) -> Result<String, Signal> {
    match args.path(name)? {
        Some(path) => Ok(path),
        None => t.fail(format!("Missing {} argument.", name)),
    }
}

/// Hierarchy paths start and end with `/`.
fn check_hierarchy_path(t: &Context, path: &str) -> Result<(), Signal> {
    t.assert_equal(path.chars().next(), Some('/'), Some("Invalid path argument"))?;
    t.assert_equal(path.chars().last(), Some('/'), Some("Invalid path argument"))
}
