//! `X-OCCI-Attribute` structure.

use std::hash::{Hash, Hasher};

use crate::occi::error::{StructureError, StructureKind, StructureResult};
use crate::occi::grammar::strip_header;
use crate::occi::OcciStructure;

/// Ordered mapping of attribute names to plain string values.
///
/// Equality and hashing consider the whole mapping, independent of
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct AttributeStructure {
    entries: Vec<(String, String)>,
}

impl AttributeStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl OcciStructure for AttributeStructure {
    const HEADER_NAME: &'static str = "X-OCCI-Attribute";

    fn parse(line: &str, _strict: bool) -> StructureResult<Self> {
        let body = strip_header(line, Self::HEADER_NAME).unwrap_or(line);

        let mut attributes = Self::new();
        for token in body.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let (name, value) = token.split_once('=').ok_or_else(|| StructureError::Malformed {
                kind: StructureKind::Attribute,
                segment: token.to_string(),
            })?;
            attributes.insert(name.trim(), value.trim());
        }
        Ok(attributes)
    }

    fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for AttributeStructure {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for AttributeStructure {}

impl Hash for AttributeStructure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_unstable();
        sorted.hash(state);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeStructure {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}
