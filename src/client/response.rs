//! Response classification by content type.

use reqwest::header::{HeaderMap, CONTENT_TYPE};

use crate::client::{CONTENT_TYPE_OCCI, CONTENT_TYPE_URI_LIST, URI_LIST_SEPARATOR};
use crate::occi::{parse_line, Parsed, Structure, StructureResult};

/// Body interpretation chosen from the response content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    /// One structure per line (passthrough lines kept verbatim).
    Structures(Vec<Parsed>),
    /// `text/uri-list` entries.
    Uris(Vec<String>),
    /// `text/occi`: the rendering lives in the headers; body left opaque.
    Opaque,
}

/// A successful (2xx) OCCI response.
#[derive(Debug, Clone)]
pub struct OcciResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
    pub content: ResponseContent,
}

impl OcciResponse {
    /// Classify a raw response. Structure lines are parsed leniently.
    pub fn classify(status: u16, headers: HeaderMap, body: String) -> StructureResult<Self> {
        let content = match media_type(&headers).as_deref() {
            Some(CONTENT_TYPE_URI_LIST) => ResponseContent::Uris(
                body.split(URI_LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|uri| !uri.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Some(CONTENT_TYPE_OCCI) => ResponseContent::Opaque,
            _ => {
                let mut lines = Vec::new();
                for line in body.lines() {
                    if let Some(parsed) = parse_line(line, false)? {
                        lines.push(parsed);
                    }
                }
                ResponseContent::Structures(lines)
            }
        };

        Ok(Self {
            status,
            headers,
            body,
            content,
        })
    }

    /// Media type without parameters, lowercased.
    pub fn content_type(&self) -> Option<String> {
        media_type(&self.headers)
    }

    /// Parsed structures, skipping passthrough lines.
    pub fn structures(&self) -> Vec<&Structure> {
        match &self.content {
            ResponseContent::Structures(lines) => lines.iter().filter_map(Parsed::structure).collect(),
            _ => Vec::new(),
        }
    }

    /// URIs of a `text/uri-list` response.
    pub fn uris(&self) -> &[String] {
        match &self.content {
            ResponseContent::Uris(uris) => uris,
            _ => &[],
        }
    }
}

fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let media = value.split(';').next().unwrap_or_default().trim();
    Some(media.to_ascii_lowercase())
}
