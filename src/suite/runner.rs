//! Suite orchestration: cases, chaining, short-circuit and totals.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::client::OcciClient;
use crate::config::SuiteConfig;
use crate::registry::Registry;
use crate::suite::loader::{load_suite, SuiteError, TestCase};
use crate::suite::sink::{open_append, ConsoleSink, LogSink};
use crate::tester::{Outcome, Tester, Value};

/// Aggregate counts of one suite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteTotals {
    pub total: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteTotals {
    pub fn ok(&self) -> usize {
        self.total - self.failed - self.skipped
    }

    /// No case failed. Skips do not count against a run.
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for SuiteTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ran {} tests: {} successful, {} failed, {} skipped.",
            self.total,
            self.ok(),
            self.failed,
            self.skipped
        )
    }
}

/// Runs test cases against one server.
#[derive(Debug)]
pub struct Tent {
    client: OcciClient,
    registry: Registry,
    suites: SuiteConfig,
    /// Held for the whole duration of a run.
    run_lock: Mutex<()>,
}

impl Tent {
    pub fn new(client: OcciClient, registry: Registry, suites: SuiteConfig) -> Self {
        Self {
            client,
            registry,
            suites,
            run_lock: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Report every module name the registry does not know.
    pub fn validate(&self, cases: &[TestCase]) -> Result<(), SuiteError> {
        let unknown: Vec<String> = cases
            .iter()
            .flat_map(|case| {
                case.modules
                    .iter()
                    .filter(|m| !self.registry.contains(&m.module))
                    .map(move |m| format!("`{}` (in `{}`)", m.module, case.title))
            })
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SuiteError::UnknownModules(unknown))
        }
    }

    /// Run cases in order and write their output to `sink`.
    ///
    /// Module names are validated before anything runs.
    pub async fn run_cases(
        &self,
        cases: &[TestCase],
        sink: &mut dyn LogSink,
    ) -> Result<SuiteTotals, SuiteError> {
        self.validate(cases)?;
        let _running = self.run_lock.lock().await;

        let mut tester = Tester::new(self.client.clone());
        let mut totals = SuiteTotals::default();

        for case in cases {
            tracing::info!(title = %case.title, modules = case.modules.len(), "Running test case");
            sink.line(&format!("Test: {}", case.title));
            tester.start(case.title.clone());

            for invocation in &case.modules {
                let module = self
                    .registry
                    .get(&invocation.module)
                    .ok_or_else(|| SuiteError::UnknownModules(vec![invocation.module.clone()]))?;

                let mut parameters = invocation.parameters.clone();
                if let Some(chain) = &invocation.chain {
                    if !parameters.contains_key(chain) {
                        let previous = tester.current().map(|r| r.result.clone()).unwrap_or_default();
                        parameters.insert(chain.clone(), previous);
                    }
                }

                if tester.run(module, Value::Map(parameters)).await != Outcome::Succeeded {
                    break;
                }
            }

            if let Some(record) = tester.current() {
                for line in &record.log {
                    sink.line(&format!("    {}", line));
                }

                totals.total += 1;
                if record.skipped() {
                    totals.skipped += 1;
                }
                if record.failed() {
                    totals.failed += 1;
                }
                tracing::info!(
                    title = %case.title,
                    failed = record.failed(),
                    skipped = record.skipped(),
                    "Test case finished"
                );
            }
        }

        sink.line("");
        sink.line(&totals.to_string());
        Ok(totals)
    }

    /// Where the log of a suite file goes: `<suite file>.log`, inside the
    /// configured log directory if there is one.
    pub fn log_path(&self, suite: &Path) -> PathBuf {
        let mut name = suite.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".log");
        match &self.suites.log_directory {
            Some(dir) => Path::new(dir).join(name),
            None => suite.with_file_name(name),
        }
    }

    /// Run a whole suite file, printing to stdout and appending to its log.
    pub async fn run_suite_file(&self, path: &Path) -> Result<SuiteTotals, SuiteError> {
        let cases = load_suite(path)?;
        self.validate(&cases)?;

        let log_path = self.log_path(path);
        let mut file = open_append(&log_path)?;
        writeln!(
            file,
            "{} {} ==",
            "=".repeat(50),
            Utc::now().format("%Y-%m-%d %H:%M:%S%.6f")
        )?;

        tracing::info!(suite = %path.display(), log = %log_path.display(), cases = cases.len(), "Running suite");

        let mut sink = ConsoleSink::cloned_to(file);
        sink.note(&format!("Running tests from `{}`", path.display()));
        let totals = self.run_cases(&cases, &mut sink).await?;
        sink.file_line("");
        Ok(totals)
    }
}
