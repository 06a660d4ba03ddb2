//! Request description: method, path, accept type, header structures and body.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;

use crate::client::error::{ClientError, ClientResult};
use crate::client::{CONTENT_TYPE_FORM, CONTENT_TYPE_OCCI, CONTENT_TYPE_PLAIN, DEFAULT_ACCEPT, URI_LIST_SEPARATOR};
use crate::occi::{AttributeStructure, Category, LinkStructure, LocationStructure, Structure};

/// A value transported in request headers.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderData {
    /// Rendered under its own header name; values sharing a header are
    /// joined with `, `.
    Structure(Structure),
    /// An arbitrary header.
    Raw { name: String, value: String },
}

impl HeaderData {
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        HeaderData::Raw {
            name: name.into(),
            value: value.into(),
        }
    }
}

macro_rules! header_data_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for HeaderData {
                fn from(structure: $ty) -> Self {
                    HeaderData::Structure(structure.into())
                }
            }
        )*
    };
}

header_data_from!(Structure, Category, LinkStructure, LocationStructure, AttributeStructure);

/// Request body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent verbatim.
    Text(String),
    /// `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Lines joined by the historical `\n\r` separator as `text/plain`.
    Lines(Vec<String>),
}

impl RequestBody {
    /// Encoded body plus the content type implied by the variant, if any.
    fn encode(&self) -> (String, Option<&'static str>) {
        match self {
            RequestBody::Text(text) => (text.clone(), None),
            RequestBody::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter())
                    .finish();
                (encoded, Some(CONTENT_TYPE_FORM))
            }
            RequestBody::Lines(lines) => (lines.join(URI_LIST_SEPARATOR), Some(CONTENT_TYPE_PLAIN)),
        }
    }
}

/// A single OCCI request.
#[derive(Debug, Clone)]
pub struct OcciRequest {
    pub method: Method,
    pub path: String,
    pub accept: Option<String>,
    pub body: Option<RequestBody>,
    pub headers: Vec<HeaderData>,
}

impl OcciRequest {
    /// Create a request. Methods other than GET/POST/PUT/DELETE fall back
    /// to GET.
    pub fn new(method: &str, path: impl Into<String>) -> Self {
        let method = match method.to_ascii_uppercase().as_str() {
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            _ => Method::GET,
        };
        Self {
            method,
            path: path.into(),
            accept: None,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, data: impl Into<HeaderData>) -> Self {
        self.headers.push(data.into());
        self
    }

    pub fn headers<I, H>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<HeaderData>,
    {
        self.headers.extend(data.into_iter().map(Into::into));
        self
    }

    /// Build the header map and encoded body.
    pub(crate) fn encode(&self) -> ClientResult<(HeaderMap, Option<String>)> {
        let mut map = HeaderMap::new();
        let accept = self.accept.as_deref().unwrap_or(DEFAULT_ACCEPT);
        map.insert(ACCEPT, header_value(accept)?);

        let mut grouped: Vec<(&'static str, Vec<String>)> = Vec::new();
        for data in &self.headers {
            match data {
                HeaderData::Structure(structure) => {
                    let name = structure.header_name();
                    match grouped.iter_mut().find(|(n, _)| *n == name) {
                        Some((_, values)) => values.push(structure.render()),
                        None => grouped.push((name, vec![structure.render()])),
                    }
                }
                HeaderData::Raw { name, value } => {
                    map.append(header_name(name)?, header_value(value)?);
                }
            }
        }

        let has_structures = !grouped.is_empty();
        for (name, values) in grouped {
            map.insert(
                header_name(name)?,
                header_value(&values.join(", "))?,
            );
        }
        if has_structures && !map.contains_key(CONTENT_TYPE) {
            map.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_OCCI));
        }

        let body = self.body.as_ref().map(|body| {
            let (encoded, content_type) = body.encode();
            if let Some(content_type) = content_type {
                if !map.contains_key(CONTENT_TYPE) {
                    map.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
            }
            encoded
        });

        Ok((map, body))
    }
}

fn header_value(value: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader(format!("`{}`: {}", value, e)))
}

fn header_name(name: &str) -> ClientResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))
}
