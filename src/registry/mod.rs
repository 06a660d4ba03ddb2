//! Test module registry.
//!
//! Every test module is declared next to its implementation with an explicit
//! parameter table. The registry indexes those tables once at startup and is
//! read-only afterwards; nothing here executes a test.

pub mod listing;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use futures_util::future::LocalBoxFuture;
use thiserror::Error;

use crate::tester::{ArgumentError, Args, Context, TestResult, Value};

/// Signature every test module implements.
pub type TestFn = for<'a> fn(&'a mut Context, Args) -> LocalBoxFuture<'a, TestResult>;

/// Default of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    /// No default: the caller must supply a value.
    Required,
    /// Optional, defaults to null.
    None,
    Bool(bool),
    Integer(i64),
    Str(&'static str),
}

impl ParamDefault {
    /// The value bound when the parameter is omitted.
    pub fn to_value(self) -> Option<Value> {
        match self {
            ParamDefault::Required => None,
            ParamDefault::None => Some(Value::Null),
            ParamDefault::Bool(b) => Some(Value::Bool(b)),
            ParamDefault::Integer(i) => Some(Value::Integer(i)),
            ParamDefault::Str(s) => Some(Value::from(s)),
        }
    }
}

impl fmt::Display for ParamDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDefault::Required => f.write_str("<required>"),
            ParamDefault::None => f.write_str("None"),
            ParamDefault::Bool(b) => write!(f, "{}", b),
            ParamDefault::Integer(i) => write!(f, "{}", i),
            ParamDefault::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// A declared parameter. The context handle is implicit and never listed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub annotation: Option<&'static str>,
    pub default: ParamDefault,
}

impl Param {
    pub const fn required(name: &'static str, annotation: Option<&'static str>) -> Self {
        Self {
            name,
            annotation,
            default: ParamDefault::Required,
        }
    }

    pub const fn optional(name: &'static str, annotation: Option<&'static str>) -> Self {
        Self {
            name,
            annotation,
            default: ParamDefault::None,
        }
    }

    pub const fn bool(name: &'static str, annotation: Option<&'static str>, default: bool) -> Self {
        Self {
            name,
            annotation,
            default: ParamDefault::Bool(default),
        }
    }

    pub const fn integer(name: &'static str, annotation: Option<&'static str>, default: i64) -> Self {
        Self {
            name,
            annotation,
            default: ParamDefault::Integer(default),
        }
    }

    pub const fn text(
        name: &'static str,
        annotation: Option<&'static str>,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            annotation,
            default: ParamDefault::Str(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default == ParamDefault::Required
    }
}

/// A runnable test module and its metadata.
#[derive(Clone, Copy)]
pub struct TestModule {
    pub group: &'static str,
    pub name: &'static str,
    pub doc: Option<&'static str>,
    pub params: &'static [Param],
    /// Description of the returned value, if any.
    pub returns: Option<&'static str>,
    pub func: TestFn,
}

impl TestModule {
    pub const fn new(group: &'static str, name: &'static str, func: TestFn) -> Self {
        Self {
            group,
            name,
            doc: None,
            params: &[],
            returns: None,
            func,
        }
    }

    pub const fn doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    pub const fn params(mut self, params: &'static [Param]) -> Self {
        self.params = params;
        self
    }

    pub const fn returns(mut self, returns: &'static str) -> Self {
        self.returns = Some(returns);
        self
    }

    /// `group.name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }

    /// Bind supplied values to the declared parameters, filling defaults.
    pub fn bind(&self, mut values: BTreeMap<String, Value>) -> Result<Args, ArgumentError> {
        if let Some(unexpected) = values
            .keys()
            .find(|key| !self.params.iter().any(|p| p.name == key.as_str()))
        {
            return Err(ArgumentError::Unexpected {
                module: self.name.to_string(),
                name: unexpected.clone(),
            });
        }

        for param in self.params {
            if values.contains_key(param.name) {
                continue;
            }
            match param.default.to_value() {
                Some(value) => {
                    values.insert(param.name.to_string(), value);
                }
                None => {
                    return Err(ArgumentError::Missing {
                        module: self.name.to_string(),
                        name: param.name.to_string(),
                    })
                }
            }
        }

        Ok(Args::new(values))
    }
}

impl fmt::Debug for TestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModule")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A documented group of test modules.
#[derive(Debug, Clone, Copy)]
pub struct ModuleGroup {
    pub name: &'static str,
    pub doc: Option<&'static str>,
    pub modules: &'static [TestModule],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("test module `{name}` is defined in both `{first}` and `{second}`")]
    Duplicate {
        name: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// Immutable index of the available test modules.
#[derive(Debug)]
pub struct Registry {
    groups: Vec<ModuleGroup>,
    index: HashMap<String, (usize, usize)>,
}

impl Registry {
    /// Index the given groups. Bare module names must be unique across
    /// groups; qualified names always resolve.
    pub fn new(groups: &[ModuleGroup]) -> Result<Self, RegistryError> {
        let mut index = HashMap::new();
        let mut bare: HashMap<&'static str, &'static str> = HashMap::new();

        for (g, group) in groups.iter().enumerate() {
            for (m, module) in group.modules.iter().enumerate() {
                if let Some(first) = bare.insert(module.name, group.name) {
                    return Err(RegistryError::Duplicate {
                        name: module.name,
                        first,
                        second: group.name,
                    });
                }
                index.insert(module.name.to_string(), (g, m));
                index.insert(module.qualified_name(), (g, m));
            }
        }

        Ok(Self {
            groups: groups.to_vec(),
            index,
        })
    }

    /// The modules shipped with this crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(crate::modules::GROUPS)
    }

    /// Look up a module by bare or qualified name.
    pub fn get(&self, name: &str) -> Option<&TestModule> {
        let (g, m) = *self.index.get(name)?;
        self.groups.get(g)?.modules.get(m)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn groups(&self) -> &[ModuleGroup] {
        &self.groups
    }

    /// All modules, in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = &TestModule> {
        self.groups.iter().flat_map(|group| group.modules.iter())
    }

    pub fn len(&self) -> usize {
        self.modules().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
