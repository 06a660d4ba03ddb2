//! Simple example test modules.

use futures_util::future::LocalBoxFuture;

use crate::registry::{ModuleGroup, Param, TestModule};
use crate::tester::{Args, Assertions, Context, TestResult, Value};

const NAME: &str = "samples";

pub const GROUP: ModuleGroup = ModuleGroup {
    name: NAME,
    doc: Some("Simple example test modules."),
    modules: &[
        TestModule::new(NAME, "simple", simple),
        TestModule::new(NAME, "parameterized", parameterized).params(&[
            Param::required("param1", Some("first parameter")),
            Param::text(
                "param2",
                Some("second parameter"),
                "default value for second parameter",
            ),
        ]),
        TestModule::new(NAME, "returningTest", returning_test),
        TestModule::new(NAME, "failingTest", failing_test),
        TestModule::new(NAME, "skippingTest", skipping_test),
        TestModule::new(NAME, "incrementing", incrementing)
            .params(&[Param::integer("number", Some("number to increment"), 0)]),
    ],
};

fn simple(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        t.log("This is inside the test!");
        t.assert_true(true, None)?;
        t.assert_false(false, None)?;
        t.assert_equal(2.0, f64::from(2), None)?;
        Ok(Value::Null)
    })
}

fn parameterized(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        t.log(args.value("param1"));
        t.log(args.value("param2"));
        t.assert_true(true, None)?;
        Ok(Value::Null)
    })
}

fn returning_test(_t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move { Ok(Value::from("a return value")) })
}

fn failing_test(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move { t.fail("I fail.") })
}

fn skipping_test(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move { t.skip("I skip.") })
}

fn incrementing(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let number = args.integer("number")?;
        t.log(format_args!("current number: {}", number));
        Ok(Value::Integer(number + 1))
    })
}
