//! `Category` structure and its kind/mixin/action classes.
//!
//! # Identity
//! A category is identified by `(class, term, scheme)`. Title, relation,
//! location, attribute and action declarations are descriptive only and do
//! not take part in equality or hashing.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::occi::error::{StructureError, StructureKind, StructureResult};
use crate::occi::grammar::{split_segments, strip_header, strip_quotes, Fields};
use crate::occi::OcciStructure;

const KIND: StructureKind = StructureKind::Category;

/// Runtime class of a category, selected by its `class` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryClass {
    Kind,
    Mixin,
    Action,
}

impl CategoryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryClass::Kind => "kind",
            CategoryClass::Mixin => "mixin",
            CategoryClass::Action => "action",
        }
    }
}

impl fmt::Display for CategoryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryClass {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kind" => Ok(CategoryClass::Kind),
            "mixin" => Ok(CategoryClass::Mixin),
            "action" => Ok(CategoryClass::Action),
            other => Err(StructureError::InvalidValue {
                kind: KIND,
                field: "class",
                value: other.to_string(),
            }),
        }
    }
}

/// Property set of a declared attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttributeProperties {
    pub immutable: bool,
    pub required: bool,
}

impl AttributeProperties {
    pub fn is_empty(&self) -> bool {
        !self.immutable && !self.required
    }
}

/// An attribute declared by a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryAttribute {
    pub name: String,
    pub properties: AttributeProperties,
}

impl fmt::Display for CategoryAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        let mut props = Vec::with_capacity(2);
        if self.properties.immutable {
            props.push("immutable");
        }
        if self.properties.required {
            props.push("required");
        }
        write!(f, "{{{}}}", props.join(" "))
    }
}

/// A typed classification: kind, mixin or action.
#[derive(Debug, Clone)]
pub struct Category {
    pub class: CategoryClass,
    pub term: String,
    pub scheme: String,
    pub title: Option<String>,
    pub rel: Option<String>,
    pub location: Option<String>,
    pub attributes: Vec<CategoryAttribute>,
    pub actions: Vec<String>,
}

impl Category {
    pub fn new(class: CategoryClass, term: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            class,
            term: term.into(),
            scheme: scheme.into(),
            title: None,
            rel: None,
            location: None,
            attributes: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn kind(term: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self::new(CategoryClass::Kind, term, scheme)
    }

    pub fn mixin(term: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self::new(CategoryClass::Mixin, term, scheme)
    }

    pub fn action(term: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self::new(CategoryClass::Action, term, scheme)
    }

    /// Declare an attribute. Redeclaring a name replaces its properties.
    pub fn add_attribute(&mut self, name: impl Into<String>, immutable: bool, required: bool) {
        let name = name.into();
        let properties = AttributeProperties {
            immutable,
            required,
        };
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.properties = properties,
            None => self.attributes.push(CategoryAttribute { name, properties }),
        }
    }

    /// A clone carrying only the identifying fields.
    ///
    /// Sent when the server only has to recognise the category rather than
    /// receive its full definition.
    pub fn identity(&self) -> Self {
        Self::new(self.class, self.term.clone(), self.scheme.clone())
    }

    pub fn is_kind(&self) -> bool {
        self.class == CategoryClass::Kind
    }

    pub fn is_mixin(&self) -> bool {
        self.class == CategoryClass::Mixin
    }

    pub fn is_action(&self) -> bool {
        self.class == CategoryClass::Action
    }
}

impl OcciStructure for Category {
    const HEADER_NAME: &'static str = "Category";

    fn parse(line: &str, strict: bool) -> StructureResult<Self> {
        let body = strip_header(line, Self::HEADER_NAME).unwrap_or(line);
        let mut segments = split_segments(body, ';').into_iter();
        let term = segments.next().unwrap_or_default().trim().to_string();
        let mut fields = Fields::parse(segments, KIND)?;

        let class = fields.take_required("class", KIND)?;
        let class: CategoryClass = strip_quotes(&class, false, KIND, "class")?.parse()?;
        let scheme = fields.take_required("scheme", KIND)?;
        let scheme = strip_quotes(&scheme, strict, KIND, "scheme")?;

        if term.is_empty() {
            return Err(StructureError::MissingField {
                kind: KIND,
                field: "term",
            });
        }

        let mut category = Category::new(class, term, scheme);
        category.title = fields.take_quoted("title", strict, KIND)?;
        category.rel = fields.take_quoted("rel", strict, KIND)?;
        category.location = fields.take_quoted("location", strict, KIND)?;
        if let Some(attributes) = fields.take_quoted("attributes", strict, KIND)? {
            category.attributes = parse_attribute_list(&attributes, strict)?;
        }
        if let Some(actions) = fields.take_quoted("actions", strict, KIND)? {
            category.actions = actions.split_whitespace().map(str::to_string).collect();
        }

        fields.finish(strict, KIND)?;
        Ok(category)
    }

    fn render(&self) -> String {
        let mut parts = vec![
            self.term.clone(),
            format!("scheme=\"{}\"", self.scheme),
            format!("class=\"{}\"", self.class),
        ];

        if let Some(title) = &self.title {
            parts.push(format!("title=\"{}\"", title));
        }
        if let Some(rel) = &self.rel {
            parts.push(format!("rel=\"{}\"", rel));
        }
        if let Some(location) = &self.location {
            parts.push(format!("location=\"{}\"", location));
        }
        if !self.attributes.is_empty() {
            let attrs: Vec<String> = self.attributes.iter().map(ToString::to_string).collect();
            parts.push(format!("attributes=\"{}\"", attrs.join(" ")));
        }
        if !self.actions.is_empty() {
            parts.push(format!("actions=\"{}\"", self.actions.join(" ")));
        }

        parts.join("; ")
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.term == other.term && self.scheme == other.scheme
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        self.term.hash(state);
        self.scheme.hash(state);
    }
}

/// Parse the `attributes` value: `name` or `name{prop prop}` tokens.
fn parse_attribute_list(text: &str, strict: bool) -> StructureResult<Vec<CategoryAttribute>> {
    let mut attributes = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = &rest[name_end..];

        let mut raw_props = "";
        if let Some(after) = rest.strip_prefix('{') {
            let close = after.find('}').unwrap_or(after.len());
            raw_props = &after[..close];
            rest = after.get(close + 1..).unwrap_or("");
        }
        rest = rest.trim_start();

        if name.is_empty() {
            continue;
        }

        let mut properties = AttributeProperties::default();
        let mut unknown = Vec::new();
        for prop in raw_props.split_whitespace() {
            match prop {
                "immutable" => properties.immutable = true,
                "required" => properties.required = true,
                other => unknown.push(other.to_string()),
            }
        }
        if strict && !unknown.is_empty() {
            return Err(StructureError::UnknownProperties {
                attribute: name.to_string(),
                properties: unknown,
            });
        }

        attributes.push(CategoryAttribute {
            name: name.to_string(),
            properties,
        });
    }

    Ok(attributes)
}
