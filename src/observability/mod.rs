//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client, tester, suite runner
//!     → tracing events (process diagnostics, stderr)
//!
//! test modules
//!     → Context::log (test log, part of the suite output, not tracing)
//! ```
//!
//! # Design Decisions
//! - Diagnostics and test output are separate streams
//! - `RUST_LOG` overrides the configured level

pub mod logging;
