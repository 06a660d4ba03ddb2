//! OCCI protocol client.
//!
//! # Responsibilities
//! - Issue one HTTP request per call against the configured server
//! - Attach structures as headers, encode bodies
//! - Classify the response body by content type and parse structures
//! - Turn non-2xx answers into [`ClientError::Status`]
//!
//! # Design Decisions
//! - No retries and no pooling policy beyond reqwest's defaults
//! - The only timeout is the optional transport timeout from config

pub mod error;
pub mod request;
pub mod response;

use std::time::Duration;

pub use error::{ClientError, ClientResult, OcciError};
pub use request::{HeaderData, OcciRequest, RequestBody};
pub use response::{OcciResponse, ResponseContent};

use crate::config::ServerConfig;

pub const CONTENT_TYPE_OCCI: &str = "text/occi";
pub const CONTENT_TYPE_PLAIN: &str = "text/plain";
pub const CONTENT_TYPE_URI_LIST: &str = "text/uri-list";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const DEFAULT_ACCEPT: &str = "text/occi, text/plain";

/// Historical separator of `text/uri-list` bodies.
pub const URI_LIST_SEPARATOR: &str = "\n\r";

/// HTTP client bound to one OCCI server.
#[derive(Debug, Clone)]
pub struct OcciClient {
    http: reqwest::Client,
    base_url: String,
}

impl OcciClient {
    /// Create a client from server configuration.
    pub fn new(config: &ServerConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path.
    pub fn make_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Perform a request.
    pub async fn request(&self, request: OcciRequest) -> ClientResult<OcciResponse> {
        let url = self.make_url(&request.path);
        let (headers, body) = request.encode()?;

        tracing::debug!(method = %request.method, url = %url, "OCCI request");

        let mut builder = self.http.request(request.method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let res = builder.send().await?;
        let status = res.status();
        let headers = res.headers().clone();
        let body = res.text().await?;

        tracing::debug!(status = status.as_u16(), url = %url, bytes = body.len(), "OCCI response");

        if !status.is_success() {
            return Err(ClientError::Status(OcciError {
                status: status.as_u16(),
                headers,
                body,
            }));
        }

        Ok(OcciResponse::classify(status.as_u16(), headers, body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_url() {
        let client = OcciClient::new(&ServerConfig::default()).unwrap();
        assert_eq!(client.make_url("/-/"), "http://localhost:8080/-/");
        assert_eq!(client.make_url("compute/"), "http://localhost:8080/compute/");
    }
}
