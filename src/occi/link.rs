//! `Link` structure.

use std::hash::{Hash, Hasher};

use crate::occi::error::{StructureError, StructureKind, StructureResult};
use crate::occi::grammar::{split_segments, strip_header, strip_quotes, Fields};
use crate::occi::OcciStructure;

const KIND: StructureKind = StructureKind::Link;

/// A typed link to another resource, identified by `(link, rel)`.
#[derive(Debug, Clone)]
pub struct LinkStructure {
    /// Target URI, angle-bracket delimited on the wire.
    pub link: String,
    pub rel: String,
    pub self_link: Option<String>,
    pub category: Option<String>,
    /// Extra named attributes in declaration order.
    pub attributes: Vec<(String, String)>,
}

impl LinkStructure {
    pub fn new(link: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            rel: rel.into(),
            self_link: None,
            category: None,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl OcciStructure for LinkStructure {
    const HEADER_NAME: &'static str = "Link";

    fn parse(line: &str, strict: bool) -> StructureResult<Self> {
        let body = strip_header(line, Self::HEADER_NAME).unwrap_or(line);
        let mut segments = split_segments(body, ';').into_iter();
        let target = segments.next().unwrap_or_default().trim();
        if target.is_empty() {
            return Err(StructureError::MissingField {
                kind: KIND,
                field: "link",
            });
        }

        let link = match target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            Some(inner) => inner.trim().to_string(),
            None if strict => {
                return Err(StructureError::Unquoted {
                    kind: KIND,
                    field: "link".to_string(),
                })
            }
            None => target.to_string(),
        };
        if link.is_empty() {
            return Err(StructureError::MissingField {
                kind: KIND,
                field: "link",
            });
        }

        let mut fields = Fields::parse(segments, KIND)?;
        let rel = fields.take_required("rel", KIND)?;
        let mut structure = LinkStructure::new(link, strip_quotes(&rel, strict, KIND, "rel")?);
        structure.self_link = fields.take_quoted("self", strict, KIND)?;
        structure.category = fields.take_quoted("category", strict, KIND)?;

        for (name, value) in fields.into_entries() {
            let value = strip_quotes(&value, false, KIND, &name)?;
            structure.attributes.push((name, value));
        }

        Ok(structure)
    }

    fn render(&self) -> String {
        let mut parts = vec![format!("<{}>", self.link), format!("rel=\"{}\"", self.rel)];

        if let Some(self_link) = &self.self_link {
            parts.push(format!("self=\"{}\"", self_link));
        }
        if let Some(category) = &self.category {
            parts.push(format!("category=\"{}\"", category));
        }
        for (name, value) in &self.attributes {
            parts.push(format!("{}=\"{}\"", name, value));
        }

        parts.join("; ")
    }
}

impl PartialEq for LinkStructure {
    fn eq(&self, other: &Self) -> bool {
        self.link == other.link && self.rel == other.rel
    }
}

impl Eq for LinkStructure {}

impl Hash for LinkStructure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.link.hash(state);
        self.rel.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = r#"Link: </network/123>; rel="http://schemas.ogf.org/occi/infrastructure#network"; self="/link/networkinterface/456"; category="http://schemas.ogf.org/occi/infrastructure#networkinterface"; occi.networkinterface.interface="eth0""#;

    #[test]
    fn test_parse_link() {
        let link = LinkStructure::parse(LINK, true).unwrap();
        assert_eq!(link.link, "/network/123");
        assert_eq!(link.rel, "http://schemas.ogf.org/occi/infrastructure#network");
        assert_eq!(link.self_link.as_deref(), Some("/link/networkinterface/456"));
        assert_eq!(
            link.category.as_deref(),
            Some("http://schemas.ogf.org/occi/infrastructure#networkinterface")
        );
        assert_eq!(link.attribute("occi.networkinterface.interface"), Some("eth0"));
    }

    #[test]
    fn test_round_trip() {
        let link = LinkStructure::parse(LINK, true).unwrap();
        let again = LinkStructure::parse(&link.render(), true).unwrap();
        assert_eq!(again, link);
        assert_eq!(again.attributes, link.attributes);
        assert_eq!(again.self_link, link.self_link);
    }

    #[test]
    fn test_missing_rel() {
        let err = LinkStructure::parse("Link: </a>; self=\"/b\"", false).unwrap_err();
        assert_eq!(
            err,
            StructureError::MissingField {
                kind: StructureKind::Link,
                field: "rel"
            }
        );
    }

    #[test]
    fn test_bare_target_only_lenient() {
        let line = "Link: /a; rel=\"r\"";
        assert_eq!(LinkStructure::parse(line, false).unwrap().link, "/a");
        assert!(LinkStructure::parse(line, true).is_err());
    }

    #[test]
    fn test_identity_is_link_and_rel() {
        let mut a = LinkStructure::new("/a", "r");
        a.self_link = Some("/x".into());
        let b = LinkStructure::new("/a", "r");
        assert_eq!(a, b);
        assert_ne!(a, LinkStructure::new("/a", "other"));
    }
}
