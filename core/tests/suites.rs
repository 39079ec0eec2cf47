//! Run the YAML suites in `tests/suites/` against the mock server.

use std::io::Write;
use std::path::PathBuf;

use handlertest::{
    run_from_yaml, run_from_yaml_with, Config, Outcome, RunSummary, ServiceHandler, TestReporter,
};

fn suite(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/suites")
        .join(name)
}

fn service() -> ServiceHandler<axum::Router> {
    ServiceHandler::new(mock_server::app())
}

#[test]
fn mock_server_suite_passes() {
    let mut reporter = TestReporter::new();
    let summary = run_from_yaml(&mut reporter, &service(), suite("mock_server.yaml"));

    assert_eq!(summary, RunSummary { cases: 7, failed: 0, skipped: 0 });
    let report = reporter.finish();
    assert_eq!(report.subtests.len(), 6);
    report.assert_passed();
}

#[test]
fn failing_suite_isolates_each_case() {
    let mut reporter = TestReporter::new();
    let summary = run_from_yaml(&mut reporter, &service(), suite("failing.yaml"));

    assert_eq!(summary, RunSummary { cases: 3, failed: 2, skipped: 0 });
    let report = reporter.finish();
    assert_eq!(report.outcome("wrong status"), Some(Outcome::Failed));
    assert_eq!(report.outcome("typo in header"), Some(Outcome::Failed));
    assert_eq!(report.outcome("still runs"), Some(Outcome::Passed));

    let messages: Vec<String> = report.failures.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "wrong status: Got response code 503, expected 200".to_string(),
            "typo in header: build request: header \"Accept text/plain\" has invalid format \
             (expected `Key: Value`)"
                .to_string(),
        ]
    );
}

#[test]
fn status_code_edge_cases_fail_per_case() {
    let mut reporter = TestReporter::new();
    let summary = run_from_yaml(&mut reporter, &service(), suite("codes.yaml"));

    assert_eq!(summary, RunSummary { cases: 4, failed: 2, skipped: 0 });
    let report = reporter.finish();
    assert!(report.failures.iter().all(|failure| !failure.fatal));
    assert_eq!(report.outcome("zero code"), Some(Outcome::Passed));
    assert_eq!(report.outcome("after bad codes"), Some(Outcome::Passed));

    let messages: Vec<String> = report.failures.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "out of range: Got response code 200, expected 70000".to_string(),
            "negative: Got response code 200, expected -1".to_string(),
        ]
    );
}

#[test]
fn filter_runs_only_matching_cases() {
    let config = Config::default().with_filter("todo");
    let mut reporter = TestReporter::new();
    let summary = run_from_yaml_with(&mut reporter, &service(), suite("mock_server.yaml"), &config);

    // Two named todo cases plus the unnamed one, which no filter can exclude.
    assert_eq!(summary, RunSummary { cases: 3, failed: 0, skipped: 4 });
    let report = reporter.finish();
    report.assert_passed();
    assert_eq!(report.outcome("health"), None);
    // "list todos" expects the todo created by the preceding, also matching, case.
    assert_eq!(report.outcome("create todo"), Some(Outcome::Passed));
    assert_eq!(report.outcome("list todos"), Some(Outcome::Passed));
}

#[test]
fn suite_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "- request: {{method: POST, url: /echo, body: ping}}\n  response: {{body: ping}}"
    )
    .unwrap();

    let mut reporter = TestReporter::new();
    let summary = run_from_yaml(&mut reporter, &service(), file.path());
    assert_eq!(summary, RunSummary { cases: 1, failed: 0, skipped: 0 });
    reporter.finish().assert_passed();
}

#[test]
fn missing_suite_is_fatal() {
    let mut reporter = TestReporter::new();
    let summary = run_from_yaml(&mut reporter, &service(), suite("does_not_exist.yaml"));

    assert_eq!(summary, RunSummary::default());
    let report = reporter.finish();
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].fatal);
    assert!(report.subtests.is_empty());
}
