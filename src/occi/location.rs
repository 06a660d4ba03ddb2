//! `X-OCCI-Location` structure.

use crate::occi::error::StructureResult;
use crate::occi::grammar::strip_header;
use crate::occi::OcciStructure;

/// Legacy alias accepted in front of location lists.
pub const LEGACY_HEADER_NAME: &str = "Location";

/// Ordered sequence of URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocationStructure {
    pub uris: Vec<String>,
}

impl LocationStructure {
    pub fn new(uris: Vec<String>) -> Self {
        Self { uris }
    }

    /// The first URI, which is what a creation response points at.
    pub fn first(&self) -> Option<&str> {
        self.uris.first().map(String::as_str)
    }
}

impl OcciStructure for LocationStructure {
    const HEADER_NAME: &'static str = "X-OCCI-Location";

    fn parse(line: &str, _strict: bool) -> StructureResult<Self> {
        let body = strip_header(line, Self::HEADER_NAME)
            .or_else(|| strip_header(line, LEGACY_HEADER_NAME))
            .unwrap_or(line);

        let uris = body
            .split(',')
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self { uris })
    }

    fn render(&self) -> String {
        self.uris.join(", ")
    }
}
