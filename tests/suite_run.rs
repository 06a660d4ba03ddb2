//! End-to-end suite runs against a mock OCCI backend.

use occi_tent::config::SuiteConfig;
use occi_tent::suite::{parse_suite, SuiteTotals, Tent};
use occi_tent::tester::{Context, Outcome, Tester, Value};
use occi_tent::Registry;

mod common;
use common::{client_for, start_occi_backend, MockResponse, RecordedRequest};

const STORAGE_KIND: &str =
    "Category: storage; scheme=\"http://schemas.ogf.org/occi/infrastructure#\"; class=\"kind\"";

/// A tiny OCCI server: storage creation and retrieval plus the query interface.
fn occi_server(request: &RecordedRequest) -> MockResponse {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/storage/") => MockResponse::ok("text/plain", "X-OCCI-Location: /storage/42\n"),
        ("GET", "/storage/42") => MockResponse::ok("text/plain", format!("{}\n", STORAGE_KIND)),
        ("POST", "/-/") => MockResponse::ok("text/plain", "OK\n"),
        _ => MockResponse::status(500, "unexpected request"),
    }
}

async fn tent_for(handler: fn(&RecordedRequest) -> MockResponse) -> (Tent, common::RequestLog) {
    let (addr, requests) = start_occi_backend(handler).await;
    let tent = Tent::new(
        client_for(addr),
        Registry::builtin().unwrap(),
        SuiteConfig::default(),
    );
    (tent, requests)
}

#[tokio::test]
async fn test_add_mixin_end_to_end() {
    let (tent, requests) = tent_for(occi_server).await;
    let cases = parse_suite("- title: Add mixin\n  modules:\n    - module: addMixin\n").unwrap();

    let mut output: Vec<String> = Vec::new();
    let totals = tent.run_cases(&cases, &mut output).await.unwrap();

    assert_eq!(totals, SuiteTotals { total: 1, failed: 0, skipped: 0 });
    assert_eq!(output[0], "Test: Add mixin");
    let created = output
        .iter()
        .find(|line| line.contains("Mixin created:"))
        .expect("mixin creation is logged");
    assert!(created.ends_with(
        "Mixin created: Category: tent_test_mixin; scheme=\"http://example.com/occi-tent/tent_custom_mixin#\"; class=\"mixin\"; title=\"OCCI tent test mixin\"; location=\"/occi-tent/tent_custom_mixin/\""
    ));
    assert_eq!(
        output.last().unwrap(),
        "Ran 1 tests: 1 successful, 0 failed, 0 skipped."
    );

    let seen = requests.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].header("Category").unwrap().starts_with("tent_test_mixin;"));
}

#[tokio::test]
async fn test_chaining_injects_previous_result() {
    let (tent, requests) = tent_for(occi_server).await;
    let cases = parse_suite(
        r#"
- title: Create and retrieve
  modules:
    - module: createResource
      chain: null
      parameters: {}
    - module: retrieveResource
      chain: path
      parameters: {}
"#,
    )
    .unwrap();

    let mut output: Vec<String> = Vec::new();
    let totals = tent.run_cases(&cases, &mut output).await.unwrap();

    assert!(totals.passed(), "{:#?}", output);
    let seen = requests.lock().unwrap();
    let paths: Vec<_> = seen.iter().map(|r| (r.method.as_str(), r.path.as_str())).collect();
    assert_eq!(paths, vec![("POST", "/storage/"), ("GET", "/storage/42")]);
}

#[tokio::test]
async fn test_explicit_parameter_beats_chain() {
    let (tent, requests) = tent_for(occi_server).await;
    let cases = parse_suite(
        r#"
- title: Explicit path
  modules:
    - module: createResource
    - module: retrieveResource
      chain: path
      parameters: {path: /storage/42}
"#,
    )
    .unwrap();

    let mut output: Vec<String> = Vec::new();
    assert!(tent.run_cases(&cases, &mut output).await.unwrap().passed());
    assert_eq!(requests.lock().unwrap()[1].path, "/storage/42");
}

#[tokio::test]
async fn test_failed_module_short_circuits_case() {
    fn failing_server(request: &RecordedRequest) -> MockResponse {
        match request.method.as_str() {
            "POST" => MockResponse::status(500, "storage backend down"),
            _ => MockResponse::ok("text/plain", format!("{}\n", STORAGE_KIND)),
        }
    }

    let (tent, requests) = tent_for(failing_server).await;
    let cases = parse_suite(
        r#"
- title: Create and retrieve
  modules:
    - module: createResource
    - module: retrieveResource
      chain: path
- title: Still runs
  modules:
    - module: simple
"#,
    )
    .unwrap();

    let mut output: Vec<String> = Vec::new();
    let totals = tent.run_cases(&cases, &mut output).await.unwrap();

    assert_eq!(totals, SuiteTotals { total: 2, failed: 1, skipped: 0 });
    assert_eq!(requests.lock().unwrap().len(), 1);
    assert!(output.iter().any(|l| l.contains("[ERROR] OcciError: HTTP 500: storage backend down")));
    assert!(output.contains(&"Test: Still runs".to_string()));
    assert_eq!(output.last().unwrap(), "Ran 2 tests: 1 successful, 1 failed, 0 skipped.");
}

#[tokio::test]
async fn test_skip_fail_error_are_independent() {
    let (addr, _) = start_occi_backend(|_| MockResponse::status(500, "boom")).await;
    let registry = Registry::builtin().unwrap();

    let cases = [
        ("skippingTest", Value::Null, Outcome::Skipped),
        ("failingTest", Value::Null, Outcome::Failed),
        (
            "retrieveResource",
            Value::Map([("path".to_string(), Value::from("/storage/1"))].into_iter().collect()),
            Outcome::Errored,
        ),
    ];

    for (name, args, expected) in cases {
        let mut tester = Tester::new(client_for(addr));
        tester.start(name);
        let mut tear_downs = 0;
        let mut tear_down = |_: &mut Context| tear_downs += 1;

        let module = registry.get(name).unwrap();
        let outcome = tester.run_with(module, args, None, Some(&mut tear_down)).await;

        assert_eq!(outcome, expected);
        assert_eq!(tear_downs, 1);
        let record = tester.current().unwrap();
        assert_eq!(record.skipped(), expected == Outcome::Skipped);
        assert_eq!(record.failed(), expected != Outcome::Skipped);
    }
}

#[tokio::test]
async fn test_suite_file_appends_log() {
    let (tent, _) = tent_for(occi_server).await;
    let dir = std::env::temp_dir().join(format!("occi-tent-suite-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let suite = dir.join("basic.yaml");
    std::fs::write(&suite, "title: Samples\nmodules:\n  - module: simple\n").unwrap();

    tent.run_suite_file(&suite).await.unwrap();
    tent.run_suite_file(&suite).await.unwrap();

    let log = std::fs::read_to_string(dir.join("basic.yaml.log")).unwrap();
    let headers = log.lines().filter(|l| l.starts_with(&"=".repeat(50))).count();
    assert_eq!(headers, 2);
    assert!(log.contains("Test: Samples\n"));
    assert!(log.contains("This is inside the test!"));
    assert_eq!(log.matches("Ran 1 tests: 1 successful, 0 failed, 0 skipped.").count(), 2);
    assert!(!log.contains("Running tests from"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_bundled_suites_reference_known_modules() {
    let registry = Registry::builtin().unwrap();
    let tent = Tent::new(
        client_for("127.0.0.1:9".parse().unwrap()),
        registry,
        SuiteConfig::default(),
    );

    for name in ["samples", "core"] {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("suites");
        let path = occi_tent::suite::resolve_suite_path(name, &dir).unwrap();
        let cases = occi_tent::suite::load_suite(&path).unwrap();
        assert!(!cases.is_empty());
        tent.validate(&cases).unwrap();
    }
}
