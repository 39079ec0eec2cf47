//! Runs cases against a handler, one at a time and in order.
//!
//! # Design
//! A case with a non-empty name becomes exactly one sub-test of that name, so
//! its failures stay with it. An unnamed case runs inline and its failures
//! land on the caller's unit. Build failures (bad URL, malformed header, ...)
//! are reported like mismatches and only skip the offending case.
//!
//! `Config::filter` selects named cases by substring. A case it excludes is
//! neither invoked nor registered as a sub-test. Unnamed cases always run.

use crate::assert::assert_response;
use crate::case::Case;
use crate::config::Config;
use crate::handler::{invoke, Handler};
use crate::reporter::Reporter;
use crate::request::build_request;

/// Counts from one pass over a suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cases that ran.
    pub cases: usize,
    pub failed: usize,
    /// Named cases excluded by the filter.
    pub skipped: usize,
}

/// Run `cases` against `handler` with the default `Config`.
pub fn run<H>(reporter: &mut dyn Reporter, handler: &H, cases: impl IntoIterator<Item = Case>) -> RunSummary
where
    H: Handler + ?Sized,
{
    run_with(reporter, handler, cases, &Config::default())
}

pub fn run_with<H>(
    reporter: &mut dyn Reporter,
    handler: &H,
    cases: impl IntoIterator<Item = Case>,
    config: &Config,
) -> RunSummary
where
    H: Handler + ?Sized,
{
    let mut summary = RunSummary::default();
    for (index, case) in cases.into_iter().enumerate() {
        let span = tracing::info_span!(
            "case",
            index,
            name = case.subtest_name().unwrap_or_default(),
            method = %case.request.method,
            url = %case.request.url
        );
        let _entered = span.enter();

        if let (Some(name), Some(filter)) = (case.subtest_name(), config.filter()) {
            if !name.contains(filter) {
                tracing::debug!(filter, "skipped by filter");
                summary.skipped += 1;
                continue;
            }
        }

        let passed = match case.subtest_name() {
            Some(name) => reporter.subtest(name, &mut |t| {
                run_case(t, handler, &case, config);
            }),
            None => run_case(reporter, handler, &case, config),
        };

        summary.cases += 1;
        if !passed {
            summary.failed += 1;
        }
    }
    tracing::debug!(
        cases = summary.cases,
        failed = summary.failed,
        skipped = summary.skipped,
        "suite finished"
    );
    summary
}

/// Build, invoke, assert. Returns whether nothing was reported.
fn run_case<H>(reporter: &mut dyn Reporter, handler: &H, case: &Case, config: &Config) -> bool
where
    H: Handler + ?Sized,
{
    let mut tracked = Tracked {
        inner: reporter,
        failed: false,
    };
    match build_request(&case.request, config) {
        Ok(request) => {
            let actual = invoke(handler, request);
            assert_response(&mut tracked, &actual, &case.response);
        }
        Err(e) => {
            tracing::warn!(error = %e, "request build failed");
            tracked.report(&format!("build request: {e}"));
        }
    }
    !tracked.failed
}

/// Forwards to the wrapped reporter, remembering whether anything failed.
struct Tracked<'a> {
    inner: &'a mut dyn Reporter,
    failed: bool,
}

impl Reporter for Tracked<'_> {
    fn report(&mut self, message: &str) {
        self.failed = true;
        self.inner.report(message);
    }

    fn fatal(&mut self, message: &str) {
        self.failed = true;
        self.inner.fatal(message);
    }

    fn subtest(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Reporter)) -> bool {
        let passed = self.inner.subtest(name, body);
        self.failed |= !passed;
        passed
    }
}
