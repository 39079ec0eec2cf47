//! Loads YAML suite definitions and hands them to the orchestrator.
//!
//! A suite file is a YAML sequence of cases:
//!
//! ```yaml
//! - name: create todo
//!   request:
//!     method: POST
//!     url: /todos
//!     body: '{"title":"Buy milk"}'
//!     headers:
//!       - "Content-Type: application/json"
//!   response:
//!     code: 201
//! ```
//!
//! Any read or parse failure is reported through `Reporter::fatal` and no
//! case runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::case::Case;
use crate::config::Config;
use crate::error::LoadError;
use crate::handler::Handler;
use crate::reporter::Reporter;
use crate::suite::{run_with, RunSummary};

/// Parse a YAML suite. An empty document is an empty suite.
pub fn load_cases(mut reader: impl Read) -> Result<Vec<Case>, LoadError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_slice(&raw)?)
}

/// Open the YAML suite at `path` and run it against `handler`.
pub fn run_from_yaml<H>(reporter: &mut dyn Reporter, handler: &H, path: impl AsRef<Path>) -> RunSummary
where
    H: Handler + ?Sized,
{
    run_from_yaml_with(reporter, handler, path, &Config::default())
}

pub fn run_from_yaml_with<H>(
    reporter: &mut dyn Reporter,
    handler: &H,
    path: impl AsRef<Path>,
    config: &Config,
) -> RunSummary
where
    H: Handler + ?Sized,
{
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => run_from_reader_with(reporter, handler, file, config),
        Err(source) => {
            let err = LoadError::Io {
                path: path.to_path_buf(),
                source,
            };
            abort(reporter, &err)
        }
    }
}

/// Read a YAML suite from `reader` and run it against `handler`.
pub fn run_from_reader<H>(reporter: &mut dyn Reporter, handler: &H, reader: impl Read) -> RunSummary
where
    H: Handler + ?Sized,
{
    run_from_reader_with(reporter, handler, reader, &Config::default())
}

pub fn run_from_reader_with<H>(
    reporter: &mut dyn Reporter,
    handler: &H,
    reader: impl Read,
    config: &Config,
) -> RunSummary
where
    H: Handler + ?Sized,
{
    match load_cases(reader) {
        Ok(cases) => {
            tracing::debug!(cases = cases.len(), "suite loaded");
            run_with(reporter, handler, cases, config)
        }
        Err(err) => abort(reporter, &err),
    }
}

fn abort(reporter: &mut dyn Reporter, err: &LoadError) -> RunSummary {
    tracing::error!(error = %err, "suite load failed");
    reporter.fatal(&err.to_string());
    RunSummary::default()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::handler::handler_fn;
    use crate::reporter::TestReporter;

    #[test]
    fn parses_a_sequence_of_cases() {
        let yaml = "
- name: first
  request: {method: GET, url: /a}
- request: {method: POST, url: /b, body: hi}
  response: {code: 201, body: created}
";
        let cases = load_cases(yaml.as_bytes()).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].subtest_name(), Some("first"));
        assert_eq!(cases[1].request.body.as_deref(), Some("hi"));
        assert_eq!(cases[1].response.code, Some(201));
    }

    #[test]
    fn blank_document_is_an_empty_suite() {
        assert!(load_cases("  \n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = load_cases("- request: [oops".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Yaml(_)));
    }

    #[test]
    fn missing_file_is_fatal_and_runs_nothing() {
        let calls = Cell::new(0);
        let handler = handler_fn(|_, _| calls.set(calls.get() + 1));
        let mut reporter = TestReporter::new();

        let summary = run_from_yaml(&mut reporter, &handler, "clearly/non/existing/file");

        assert_eq!(summary, RunSummary::default());
        assert_eq!(calls.get(), 0);
        let report = reporter.finish();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].fatal);
        assert!(report.failures[0].message.starts_with("open clearly/non/existing/file"));
    }

    #[test]
    fn parse_failure_is_fatal() {
        let mut reporter = TestReporter::new();
        run_from_reader(&mut reporter, &handler_fn(|_, _| {}), "{not: a list}".as_bytes());

        let report = reporter.finish();
        assert!(report.failures[0].fatal);
        assert!(report.failures[0].message.starts_with("parse suite"));
    }
}
