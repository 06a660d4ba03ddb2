//! Dynamic values passed into and returned from test modules.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::occi::{
    AttributeStructure, Category, LinkStructure, LocationStructure, OcciStructure, Structure,
    StructureError,
};

/// A parameter or result value.
///
/// Suite documents supply plain YAML data; test modules may additionally
/// return structures, which chaining hands to later modules unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Structure(Structure),
}

impl Value {
    /// Convert YAML data. Strings tagged `!Category`, `!Link`, `!Location`
    /// or `!Attribute` are parsed into structures.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, StructureError> {
        use serde_yaml::Value as Yaml;

        Ok(match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(mapping) => {
                let mut map = BTreeMap::new();
                for (key, value) in mapping {
                    map.insert(yaml_key(&key), Value::from_yaml(value)?);
                }
                Value::Map(map)
            }
            Yaml::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                match (tag.trim_start_matches('!'), tagged.value) {
                    ("Category", Yaml::String(s)) => Category::parse(&s, false)?.into(),
                    ("Link", Yaml::String(s)) => LinkStructure::parse(&s, false)?.into(),
                    ("Location", Yaml::String(s)) => LocationStructure::parse(&s, false)?.into(),
                    ("Attribute", Yaml::String(s)) => AttributeStructure::parse(&s, false)?.into(),
                    (_, value) => Value::from_yaml(value)?,
                }
            }
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Value::Structure(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in argument errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Structure(_) => "structure",
        }
    }
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Structure(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

macro_rules! value_from_structure {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(s: $ty) -> Self {
                    Value::Structure(s.into())
                }
            }
        )*
    };
}

value_from_structure!(Structure, Category, LinkStructure, LocationStructure, AttributeStructure);

/// Errors binding or reading test module arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("{module}() missing required argument `{name}`")]
    Missing { module: String, name: String },

    #[error("{module}() got an unexpected argument `{name}`")]
    Unexpected { module: String, name: String },

    #[error("argument `{name}` expected {expected}, got {found}")]
    Invalid {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("argument `{name}`: {source}")]
    Structure {
        name: String,
        #[source]
        source: StructureError,
    },
}

/// Arguments bound to one test module invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<String, Value>,
}

impl Args {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// The raw value; `Null` when absent.
    pub fn value(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(name).unwrap_or(&NULL)
    }

    fn invalid(name: &str, expected: &'static str, found: &Value) -> ArgumentError {
        ArgumentError::Invalid {
            name: name.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    /// Boolean argument; null reads as false.
    pub fn bool(&self, name: &str) -> Result<bool, ArgumentError> {
        match self.value(name) {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            other => Err(Self::invalid(name, "bool", other)),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64, ArgumentError> {
        match self.value(name) {
            Value::Integer(i) => Ok(*i),
            other => Err(Self::invalid(name, "integer", other)),
        }
    }

    /// Free-form text; null reads as `None`. Scalars are rendered as text.
    pub fn text(&self, name: &str) -> Result<Option<String>, ArgumentError> {
        match self.value(name) {
            Value::Null => Ok(None),
            Value::List(_) | Value::Map(_) => Err(Self::invalid(name, "scalar", self.value(name))),
            other => Ok(Some(other.to_string())),
        }
    }

    /// A server path. Location structures (as returned by resource creation)
    /// yield their first URI.
    pub fn path(&self, name: &str) -> Result<Option<String>, ArgumentError> {
        match self.value(name) {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Structure(Structure::Location(loc)) => match loc.first() {
                Some(uri) => Ok(Some(uri.to_string())),
                None => Err(Self::invalid(name, "path", self.value(name))),
            },
            Value::Structure(Structure::Link(link)) => Ok(Some(link.link.clone())),
            other => Err(Self::invalid(name, "path", other)),
        }
    }

    /// A category given as structure or as text to be parsed.
    pub fn category(&self, name: &str) -> Result<Option<Category>, ArgumentError> {
        match self.value(name) {
            Value::Null => Ok(None),
            Value::Structure(Structure::Category(c)) => Ok(Some(c.clone())),
            Value::String(s) => Category::parse(s, false).map(Some).map_err(|source| {
                ArgumentError::Structure {
                    name: name.to_string(),
                    source,
                }
            }),
            other => Err(Self::invalid(name, "category", other)),
        }
    }

    /// A list of structures; a single structure counts as a list of one.
    pub fn structures(&self, name: &str) -> Result<Vec<Structure>, ArgumentError> {
        let parse = |value: &Value| -> Result<Structure, ArgumentError> {
            match value {
                Value::Structure(s) => Ok(s.clone()),
                Value::String(s) => Structure::parse(s, false).map_err(|source| {
                    ArgumentError::Structure {
                        name: name.to_string(),
                        source,
                    }
                }),
                other => Err(Self::invalid(name, "structure", other)),
            }
        };

        match self.value(name) {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.iter().map(parse).collect(),
            single => Ok(vec![parse(single)?]),
        }
    }
}
