//! Test execution.
//!
//! # Data Flow
//! ```text
//! args (Value) ──▶ bind ──▶ setUp ──▶ module(&mut Context, Args) ──▶ tearDown
//!                                           │
//!                               Ok(value) / Err(Signal) / panic
//!                                           │
//!                                           ▼
//!                           Outcome + log lines on the current record
//! ```
//!
//! # Responsibilities
//! - Bind a name→value mapping to a module's declared parameters
//! - Run the module, classify the result as succeeded/failed/skipped/errored
//! - Always run the teardown hook, whatever happened before
//! - Keep the ordered history of every run
//!
//! # Design Decisions
//! - Skip/fail/error are returned as [`Signal`] values, not unwound
//! - Panics are caught at this boundary and reported as `Panic` errors so
//!   one broken module never takes down the suite

pub mod context;
pub mod record;
pub mod signal;
pub mod value;

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use futures_util::FutureExt;

pub use context::Context;
pub use record::{Outcome, RunState, TestRecord};
pub use signal::{safe_repr, Assertions, Signal, TestResult};
pub use value::{ArgumentError, Args, Value};

use crate::client::OcciClient;
use crate::registry::TestModule;

/// Setup or teardown hook.
pub type Hook<'a> = &'a mut dyn FnMut(&mut Context);

/// Runs test modules and accumulates their records.
#[derive(Debug)]
pub struct Tester {
    context: Context,
    records: Vec<TestRecord>,
}

impl Tester {
    pub fn new(client: OcciClient) -> Self {
        Self {
            context: Context::new(client),
            records: Vec::new(),
        }
    }

    /// Begin a new logical run.
    pub fn start(&mut self, title: impl Into<String>) {
        self.records.push(TestRecord::new(title));
    }

    pub fn current(&self) -> Option<&TestRecord> {
        self.records.last()
    }

    /// Every run performed through this tester, oldest first.
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub async fn run(&mut self, module: &TestModule, args: Value) -> Outcome {
        self.run_with(module, args, None, None).await
    }

    /// Run one module with optional setup and teardown hooks. `args` must
    /// be a map; anything else binds as no arguments.
    pub async fn run_with(
        &mut self,
        module: &TestModule,
        args: Value,
        set_up: Option<Hook<'_>>,
        tear_down: Option<Hook<'_>>,
    ) -> Outcome {
        if self.records.is_empty() {
            self.start("");
        }
        let index = self.records.len() - 1;
        self.records[index].begin(module.name);

        let values = match args {
            Value::Map(map) => map,
            _ => BTreeMap::new(),
        };

        tracing::debug!(module = module.name, "Running test module");

        let mut result = match set_up {
            Some(hook) => call_hook(&mut self.context, hook).map(|_| Value::Null),
            None => Ok(Value::Null),
        };
        if result.is_ok() {
            result = self.invoke(module, values).await;
        }

        let mut outcome = match &result {
            Ok(_) => Outcome::Succeeded,
            Err(Signal::Skip(reason)) => {
                self.context.log(format_args!("[SKIP] {}", reason));
                Outcome::Skipped
            }
            Err(Signal::Failure(message)) => {
                self.context.log(format_args!("[FAIL] {}", message));
                Outcome::Failed
            }
            Err(signal @ Signal::Error { .. }) => {
                tracing::warn!(module = module.name, error = %signal, "Test module errored");
                self.context.log(format_args!("[ERROR] {}", signal));
                Outcome::Errored
            }
        };

        if let Some(hook) = tear_down {
            if let Err(signal) = call_hook(&mut self.context, hook) {
                tracing::warn!(module = module.name, error = %signal, "Teardown errored");
                self.context.log(format_args!("[ERROR] {}", signal));
                if outcome == Outcome::Succeeded {
                    outcome = Outcome::Errored;
                }
            }
        }

        let record = &mut self.records[index];
        record.log.extend(self.context.take_log());
        record.settle(outcome);
        if let (Outcome::Succeeded, Ok(value)) = (outcome, result) {
            record.result = value;
        }

        tracing::info!(module = module.name, outcome = %outcome, "Test module finished");
        outcome
    }

    async fn invoke(&mut self, module: &TestModule, values: BTreeMap<String, Value>) -> TestResult {
        let args = module.bind(values)?;
        let future = (module.func)(&mut self.context, args);
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(Signal::error("Panic", panic_message(payload.as_ref()))),
        }
    }
}

fn call_hook(context: &mut Context, hook: Hook<'_>) -> Result<(), Signal> {
    catch_unwind(AssertUnwindSafe(|| hook(context)))
        .map_err(|payload| Signal::error("Panic", panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::registry::{Param, TestModule};
    use futures_util::future::LocalBoxFuture;

    fn tester() -> Tester {
        Tester::new(OcciClient::new(&ServerConfig::default()).unwrap())
    }

    fn module(name: &'static str, params: &'static [Param], func: crate::registry::TestFn) -> TestModule {
        TestModule {
            group: "unit",
            name,
            doc: None,
            params,
            returns: None,
            func,
        }
    }

    fn passes(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
        Box::pin(async move {
            let number = args.integer("number")?;
            t.log(format_args!("current number: {}", number));
            Ok(Value::Integer(number + 1))
        })
    }

    fn skips(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
        Box::pin(async move { t.skip("I skip.") })
    }

    fn fails(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
        Box::pin(async move {
            t.assert_equal(1, 2, None)?;
            Ok(Value::Null)
        })
    }

    fn errors(_t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
        Box::pin(async move { Err(Signal::error("KeyError", "missing")) })
    }

    fn explode() -> i64 {
        panic!("boom")
    }

    fn panics(_t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
        Box::pin(async move { Ok(Value::Integer(explode())) })
    }

    static NUMBER: [Param; 1] = [Param::integer("number", Some("number to increment"), 0)];

    fn args(pairs: &[(&str, Value)]) -> Value {
        Value::Map(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[tokio::test]
    async fn test_success_keeps_result() {
        let mut tester = tester();
        tester.start("inc");
        let m = module("incrementing", &NUMBER, passes);

        assert_eq!(tester.run(&m, args(&[("number", Value::Integer(4))])).await, Outcome::Succeeded);
        let current = tester.current().unwrap();
        assert_eq!(current.result, Value::Integer(5));
        assert_eq!(current.state, RunState::Finished(Outcome::Succeeded));
        assert!(current.log[0].ends_with("current number: 4"));
    }

    #[tokio::test]
    async fn test_non_map_args_bind_defaults() {
        let mut tester = tester();
        let m = module("incrementing", &NUMBER, passes);
        assert_eq!(tester.run(&m, Value::from("garbage")).await, Outcome::Succeeded);
        assert_eq!(tester.current().unwrap().result, Value::Integer(1));
    }

    #[tokio::test]
    async fn test_signals_and_teardown() {
        let cases: [(TestModule, Outcome, &str); 4] = [
            (module("skips", &[], skips), Outcome::Skipped, "[SKIP] I skip."),
            (module("fails", &[], fails), Outcome::Failed, "[FAIL] 1 != 2"),
            (module("errors", &[], errors), Outcome::Errored, "[ERROR] KeyError: missing"),
            (module("panics", &[], panics), Outcome::Errored, "[ERROR] Panic: boom"),
        ];

        for (m, expected, line) in cases {
            let mut tester = tester();
            tester.start(m.name);
            let mut set_up_calls = 0;
            let mut tear_down_calls = 0;
            let mut set_up = |_: &mut Context| set_up_calls += 1;
            let mut tear_down = |_: &mut Context| tear_down_calls += 1;

            let outcome = tester
                .run_with(&m, Value::Null, Some(&mut set_up), Some(&mut tear_down))
                .await;

            assert_eq!(outcome, expected);
            assert_eq!(set_up_calls, 1);
            assert_eq!(tear_down_calls, 1);

            let current = tester.current().unwrap();
            assert_eq!(current.skipped(), expected == Outcome::Skipped);
            assert_eq!(current.failed(), expected != Outcome::Skipped);
            assert!(current.result.is_null());
            assert!(current.log.last().unwrap().ends_with(line), "{:?}", current.log);
        }
    }

    #[tokio::test]
    async fn test_binding_errors_are_errored() {
        let mut tester = tester();
        let m = module("incrementing", &NUMBER, passes);
        let outcome = tester.run(&m, args(&[("bogus", Value::Null)])).await;

        assert_eq!(outcome, Outcome::Errored);
        let log = &tester.current().unwrap().log;
        assert!(log[0].contains("[ERROR] ArgumentError: incrementing() got an unexpected argument `bogus`"));
    }

    #[tokio::test]
    async fn test_panicking_setup_skips_module_but_tears_down() {
        let mut tester = tester();
        let m = module("incrementing", &NUMBER, passes);
        let mut tear_down_calls = 0;
        let mut set_up = |_: &mut Context| panic!("fixture");
        let mut tear_down = |_: &mut Context| tear_down_calls += 1;

        let outcome = tester
            .run_with(&m, Value::Null, Some(&mut set_up), Some(&mut tear_down))
            .await;

        assert_eq!(outcome, Outcome::Errored);
        assert_eq!(tear_down_calls, 1);
        let log = &tester.current().unwrap().log;
        assert_eq!(log.len(), 1);
        assert!(log[0].ends_with("[ERROR] Panic: fixture"));
    }

    #[tokio::test]
    async fn test_history_is_kept() {
        let mut tester = tester();
        let m = module("incrementing", &NUMBER, passes);
        tester.start("first");
        tester.run(&m, Value::Null).await;
        tester.start("second");
        tester.run(&m, Value::Null).await;

        let titles: Vec<_> = tester.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
