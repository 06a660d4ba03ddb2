//! OCCI text rendering structures.
//!
//! # Data Flow
//! ```text
//! response body line / header value
//!     → parse_line (dispatch on header prefix)
//!     → Category | Link | X-OCCI-Location | X-OCCI-Attribute grammar
//!     → Structure (typed, comparable, hashable)
//!
//! Structure
//!     → render() (wire value without header name)
//!     → request header under header_name()
//! ```
//!
//! # Design Decisions
//! - Categories carry their class as a closed enum chosen at parse time
//! - Equality and hashing use identity fields only (see each structure)
//! - Strict mode rejects bare values and unknown keys, lenient mode tolerates
//!   them; missing mandatory keys fail in both modes

pub mod attribute;
pub mod category;
pub mod error;
mod grammar;
pub mod link;
pub mod location;

use std::fmt;

pub use attribute::AttributeStructure;
pub use category::{AttributeProperties, Category, CategoryAttribute, CategoryClass};
pub use error::{StructureError, StructureKind, StructureResult};
pub use link::LinkStructure;
pub use location::LocationStructure;

use crate::occi::grammar::strip_header;

/// Common capability of every structure of the text rendering.
pub trait OcciStructure: Sized {
    /// The header field the structure is transported in.
    const HEADER_NAME: &'static str;

    /// Parse a line, with or without its leading `<header>:` prefix.
    fn parse(line: &str, strict: bool) -> StructureResult<Self>;

    /// Render the header value (without header name).
    fn render(&self) -> String;
}

/// Any parsed structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Structure {
    Attribute(AttributeStructure),
    Location(LocationStructure),
    Category(Category),
    Link(LinkStructure),
}

impl Structure {
    pub fn header_name(&self) -> &'static str {
        match self {
            Structure::Attribute(_) => AttributeStructure::HEADER_NAME,
            Structure::Location(_) => LocationStructure::HEADER_NAME,
            Structure::Category(_) => Category::HEADER_NAME,
            Structure::Link(_) => LinkStructure::HEADER_NAME,
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::Attribute(_) => StructureKind::Attribute,
            Structure::Location(_) => StructureKind::Location,
            Structure::Category(_) => StructureKind::Category,
            Structure::Link(_) => StructureKind::Link,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Structure::Attribute(s) => s.render(),
            Structure::Location(s) => s.render(),
            Structure::Category(s) => s.render(),
            Structure::Link(s) => s.render(),
        }
    }

    /// Parse a line that must be a structure.
    pub fn parse(line: &str, strict: bool) -> StructureResult<Self> {
        match parse_line(line, strict)? {
            Some(Parsed::Structure(structure)) => Ok(structure),
            _ => Err(StructureError::InvalidResponseData(line.to_string())),
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Structure::Category(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_location(&self) -> Option<&LocationStructure> {
        match self {
            Structure::Location(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkStructure> {
        match self {
            Structure::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeStructure> {
        match self {
            Structure::Attribute(a) => Some(a),
            _ => None,
        }
    }
}

/// Result of parsing one line of a structure listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Structure(Structure),
    /// A non-structure line kept verbatim (lenient mode only).
    Passthrough(String),
}

impl Parsed {
    pub fn structure(&self) -> Option<&Structure> {
        match self {
            Parsed::Structure(s) => Some(s),
            Parsed::Passthrough(_) => None,
        }
    }
}

/// Parse a single line by dispatching on its header prefix.
///
/// Empty lines yield `None`. Other unrecognised lines are passed through
/// verbatim, or rejected in strict mode.
pub fn parse_line(line: &str, strict: bool) -> StructureResult<Option<Parsed>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let structure = if strip_header(line, Category::HEADER_NAME).is_some() {
        Structure::Category(Category::parse(line, strict)?)
    } else if strip_header(line, LinkStructure::HEADER_NAME).is_some() {
        Structure::Link(LinkStructure::parse(line, strict)?)
    } else if strip_header(line, LocationStructure::HEADER_NAME).is_some()
        || strip_header(line, location::LEGACY_HEADER_NAME).is_some()
    {
        Structure::Location(LocationStructure::parse(line, strict)?)
    } else if strip_header(line, AttributeStructure::HEADER_NAME).is_some() {
        Structure::Attribute(AttributeStructure::parse(line, strict)?)
    } else if strict {
        return Err(StructureError::InvalidResponseData(line.to_string()));
    } else {
        return Ok(Some(Parsed::Passthrough(line.to_string())));
    };

    Ok(Some(Parsed::Structure(structure)))
}

macro_rules! header_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}: {}", <$ty as OcciStructure>::HEADER_NAME, self.render())
                }
            }
        )*
    };
}

header_display!(AttributeStructure, LocationStructure, Category, LinkStructure);

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.header_name(), self.render())
    }
}

impl From<Category> for Structure {
    fn from(c: Category) -> Self {
        Structure::Category(c)
    }
}

impl From<LinkStructure> for Structure {
    fn from(l: LinkStructure) -> Self {
        Structure::Link(l)
    }
}

impl From<LocationStructure> for Structure {
    fn from(l: LocationStructure) -> Self {
        Structure::Location(l)
    }
}

impl From<AttributeStructure> for Structure {
    fn from(a: AttributeStructure) -> Self {
        Structure::Attribute(a)
    }
}
