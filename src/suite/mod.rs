//! Test suites.
//!
//! # Data Flow
//! ```text
//! suite.yaml ──▶ loader ──▶ [TestCase] ──▶ Tent::run_cases ──▶ Tester
//!                                               │
//!                                               ▼
//!                                  LogSink (stdout + suite.yaml.log)
//! ```
//!
//! # Responsibilities
//! - Load and validate suite documents
//! - Run cases in order, chaining results between modules
//! - Stop a case at its first non-successful module
//! - Report per-case logs and aggregate totals
//!
//! # Design Decisions
//! - Strictly sequential; a run holds an exclusive lock
//! - Unknown module names fail the run before anything executes

pub mod loader;
pub mod runner;
pub mod sink;

pub use loader::{load_suite, parse_suite, resolve_suite_path, ModuleInvocation, SuiteError, TestCase};
pub use runner::{SuiteTotals, Tent};
pub use sink::{ConsoleSink, LogSink};
