//! Human and machine readable module documentation.

use std::fmt::Write;

use serde::Serialize;

use crate::registry::{ParamDefault, Registry};

#[derive(Debug, Serialize)]
struct GroupJson<'a> {
    name: &'a str,
    doc: Option<&'a str>,
    modules: Vec<ModuleJson<'a>>,
}

#[derive(Debug, Serialize)]
struct ModuleJson<'a> {
    name: &'a str,
    qualified_name: String,
    doc: Option<&'a str>,
    returns: Option<&'a str>,
    params: Vec<ParamJson<'a>>,
}

#[derive(Debug, Serialize)]
struct ParamJson<'a> {
    name: &'a str,
    annotation: Option<&'a str>,
    required: bool,
    default: serde_json::Value,
}

fn default_json(default: ParamDefault) -> serde_json::Value {
    match default {
        ParamDefault::Required | ParamDefault::None => serde_json::Value::Null,
        ParamDefault::Bool(b) => b.into(),
        ParamDefault::Integer(i) => i.into(),
        ParamDefault::Str(s) => s.into(),
    }
}

/// Text listing: groups, their modules and each module's parameters.
///
/// ```text
/// core_mixin : OCCI core tests: Mixin-related operations.
/// - addMixin : Add mixin.
///   - mixin : Custom mixin to add
///     default value: None
///   returns: Created mixin
/// ```
pub fn render_text(registry: &Registry) -> String {
    let mut out = String::new();

    for group in registry.groups() {
        match group.doc {
            Some(doc) => {
                let _ = writeln!(out, "{} : {}", group.name, doc);
            }
            None => {
                let _ = writeln!(out, "{}", group.name);
            }
        }

        for module in group.modules {
            match module.doc {
                Some(doc) => {
                    let _ = writeln!(out, "- {} : {}", module.name, doc);
                }
                None => {
                    let _ = writeln!(out, "- {}", module.name);
                }
            }

            for param in module.params {
                let _ = writeln!(out, "  - {} : {}", param.name, param.annotation.unwrap_or("None"));
                if !param.is_required() {
                    let _ = writeln!(out, "    default value: {}", param.default);
                }
            }
            if let Some(returns) = module.returns {
                let _ = writeln!(out, "  returns: {}", returns);
            }
        }
    }

    out
}

/// JSON listing with the same content as [`render_text`].
pub fn render_json(registry: &Registry) -> serde_json::Result<String> {
    let groups: Vec<GroupJson<'_>> = registry
        .groups()
        .iter()
        .map(|group| GroupJson {
            name: group.name,
            doc: group.doc,
            modules: group
                .modules
                .iter()
                .map(|module| ModuleJson {
                    name: module.name,
                    qualified_name: module.qualified_name(),
                    doc: module.doc,
                    returns: module.returns,
                    params: module
                        .params
                        .iter()
                        .map(|param| ParamJson {
                            name: param.name,
                            annotation: param.annotation,
                            required: param.is_required(),
                            default: default_json(param.default),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    serde_json::to_string_pretty(&groups)
}
