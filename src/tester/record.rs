//! Per-run state and history entries.

use std::fmt;

use serde::Serialize;

use crate::tester::value::Value;

/// Terminal state of one module invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Succeeded,
    Failed,
    Skipped,
    Errored,
}

impl Outcome {
    /// Failed and Errored both count as a failed case.
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::Failed | Outcome::Errored)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Succeeded => "succeeded",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
            Outcome::Errored => "errored",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Pending -> Running -> Finished(outcome)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running,
    Finished(Outcome),
}

/// One logical run (a suite case) and everything recorded for it.
#[derive(Debug, Clone)]
pub struct TestRecord {
    pub title: String,
    /// Names of the modules invoked, in order.
    pub modules: Vec<String>,
    pub state: RunState,
    /// Return value of the last successful module.
    pub result: Value,
    pub log: Vec<String>,
}

impl TestRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            modules: Vec::new(),
            state: RunState::Pending,
            result: Value::Null,
            log: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            RunState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn failed(&self) -> bool {
        self.outcome().is_some_and(Outcome::is_failure)
    }

    pub fn skipped(&self) -> bool {
        self.outcome() == Some(Outcome::Skipped)
    }

    pub(crate) fn begin(&mut self, module: &str) {
        self.modules.push(module.to_string());
        if !self.failed() && !self.skipped() {
            self.state = RunState::Running;
        }
    }

    /// Record a module outcome. A skip or failure sticks for the rest of
    /// the run.
    pub(crate) fn settle(&mut self, outcome: Outcome) {
        if !self.failed() && !self.skipped() {
            self.state = RunState::Finished(outcome);
        }
    }
}
