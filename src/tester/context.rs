//! Handle passed to every test module: protocol access plus the run log.

use std::fmt;

use chrono::{Timelike, Utc};

use crate::client::{ClientResult, OcciClient, OcciRequest, OcciResponse};
use crate::tester::signal::Assertions;

/// Per-tester context. Test modules talk to the server and log through it.
#[derive(Debug)]
pub struct Context {
    client: OcciClient,
    log: Vec<String>,
}

impl Context {
    pub fn new(client: OcciClient) -> Self {
        Self {
            client,
            log: Vec::new(),
        }
    }

    pub fn client(&self) -> &OcciClient {
        &self.client
    }

    /// Issue a request against the server under test.
    pub async fn request(&self, request: OcciRequest) -> ClientResult<OcciResponse> {
        self.client.request(request).await
    }

    /// Append a timestamped line to the run log.
    pub fn log(&mut self, message: impl fmt::Display) {
        self.log.push(format!("{}{}", timestamp(), message));
    }

    /// Drain the lines logged since the last call.
    pub(crate) fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

impl Assertions for Context {}

/// `HH:MM:SS.ffff: ` in UTC.
fn timestamp() -> String {
    let now = Utc::now();
    format!(
        "{:02}:{:02}:{:02}.{:04}: ",
        now.hour(),
        now.minute(),
        now.second(),
        now.nanosecond() % 1_000_000_000 / 100_000
    )
}
