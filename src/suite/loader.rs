//! Suite document loading.
//!
//! A suite file holds one or more YAML documents. Each document is either a
//! single test case or a sequence of them; a `!Test` tag on a case is
//! accepted and ignored.
//!
//! ```yaml
//! - title: Create and retrieve a storage resource
//!   modules:
//!     - module: createResource
//!     - module: retrieveResource
//!       chain: path
//! ---
//! !Test
//! title: Add mixin
//! modules:
//!   - module: addMixin
//!     parameters:
//!       mixin: !Category 'my_mixin; scheme="http://example.com/occi#"; class="mixin"'
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::occi::StructureError;
use crate::tester::Value;

/// Error type for suite loading and validation.
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Suite not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid parameter `{name}` in test case `{title}`: {source}")]
    Parameter {
        title: String,
        name: String,
        #[source]
        source: StructureError,
    },

    #[error("Unknown test modules: {}", .0.join(", "))]
    UnknownModules(Vec<String>),
}

/// One module invocation inside a test case.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInvocation {
    pub module: String,
    /// Parameter receiving the previous module's result.
    pub chain: Option<String>,
    pub parameters: BTreeMap<String, Value>,
}

/// A titled, ordered chain of module invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub title: String,
    pub modules: Vec<ModuleInvocation>,
}

impl TestCase {
    /// A one-module case, as run from the command line.
    pub fn ad_hoc(module: impl Into<String>, parameters: BTreeMap<String, Value>) -> Self {
        let module = module.into();
        Self {
            title: format!("[module] {}", module),
            modules: vec![ModuleInvocation {
                module,
                chain: None,
                parameters,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCase {
    #[serde(default)]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    modules: Vec<RawInvocation>,
}

#[derive(Debug, Deserialize)]
struct RawInvocation {
    module: String,
    #[serde(default)]
    chain: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    parameters: BTreeMap<String, serde_yaml::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawCase {
    fn into_case(self) -> Result<TestCase, SuiteError> {
        let mut modules = Vec::with_capacity(self.modules.len());
        for raw in self.modules {
            let mut parameters = BTreeMap::new();
            for (name, value) in raw.parameters {
                let value = Value::from_yaml(value).map_err(|source| SuiteError::Parameter {
                    title: self.title.clone(),
                    name: name.clone(),
                    source,
                })?;
                parameters.insert(name, value);
            }
            modules.push(ModuleInvocation {
                module: raw.module,
                chain: raw.chain,
                parameters,
            });
        }

        Ok(TestCase {
            title: self.title,
            modules,
        })
    }
}

fn untag(value: serde_yaml::Value) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::Tagged(tagged) if tagged.tag == "Test" => tagged.value,
        other => other,
    }
}

fn parse_case(value: serde_yaml::Value) -> Result<TestCase, SuiteError> {
    let raw: RawCase = serde_yaml::from_value(untag(value))?;
    raw.into_case()
}

/// Parse suite text into test cases, in document order.
pub fn parse_suite(text: &str) -> Result<Vec<TestCase>, SuiteError> {
    let mut cases = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        match untag(serde_yaml::Value::deserialize(document)?) {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Sequence(items) => {
                for item in items {
                    cases.push(parse_case(item)?);
                }
            }
            single => cases.push(parse_case(single)?),
        }
    }

    Ok(cases)
}

/// Load a suite file.
pub fn load_suite(path: &Path) -> Result<Vec<TestCase>, SuiteError> {
    let text = fs::read_to_string(path)?;
    let cases = parse_suite(&text)?;
    tracing::debug!(path = %path.display(), cases = cases.len(), "Suite loaded");
    Ok(cases)
}

/// Find a suite: the path as given, or `<directory>/<name>[.yaml]`.
pub fn resolve_suite_path(name: &str, directory: &Path) -> Result<PathBuf, SuiteError> {
    let given = PathBuf::from(name);
    if given.is_file() {
        return Ok(given);
    }

    let file = if name.ends_with(".yaml") {
        name.to_string()
    } else {
        format!("{}.yaml", name)
    };
    let candidate = directory.join(file);
    if candidate.is_file() {
        return Ok(candidate);
    }

    Err(SuiteError::NotFound(given))
}
