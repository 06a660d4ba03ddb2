//! OCCI tent: conformance testing for OCCI servers.

pub mod client;
pub mod config;
pub mod modules;
pub mod observability;
pub mod occi;
pub mod registry;
pub mod suite;
pub mod tester;

pub use client::OcciClient;
pub use config::TentConfig;
pub use registry::Registry;
pub use suite::{SuiteTotals, Tent, TestCase};
pub use tester::Tester;
