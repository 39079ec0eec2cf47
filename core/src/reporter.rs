//! Reporting capability and the bundled test reporter.
//!
//! # Design
//! The engine only ever talks to `dyn Reporter`: `report` and `fatal` mark the
//! current unit failed, `subtest` runs a closure as a separately attributed
//! unit. Rust's test harness has no sub-tests, so `TestReporter` supplies
//! them: it keeps every failure with the `/`-joined path of the unit it
//! belongs to and turns the lot into a single panic at the end of a `#[test]`.

use std::collections::HashMap;
use std::fmt;

/// Pass/fail bookkeeping for one test unit and its sub-tests.
pub trait Reporter {
    /// Mark the current unit failed and keep going.
    fn report(&mut self, message: &str);

    /// Mark the current unit failed. The caller must stop the unit's
    /// remaining work.
    fn fatal(&mut self, message: &str);

    /// Run `body` as a sub-test named `name`. Returns whether it passed.
    fn subtest(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Reporter)) -> bool;
}

/// A failure recorded by `TestReporter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Sub-test path, empty for the root unit.
    pub unit: String,
    pub message: String,
    pub fatal: bool,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.unit, self.message)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

/// How one sub-test ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtestOutcome {
    pub name: String,
    pub outcome: Outcome,
}

/// `Reporter` with nested sub-tests.
#[derive(Debug, Default)]
pub struct TestReporter {
    path: String,
    failed: bool,
    seen: HashMap<String, usize>,
    failures: Vec<Failure>,
    subtests: Vec<SubtestOutcome>,
}

impl TestReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything in this unit or its sub-tests failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn finish(self) -> SuiteReport {
        SuiteReport {
            failures: self.failures,
            subtests: self.subtests,
        }
    }

    fn child(&mut self, name: &str) -> TestReporter {
        let count = self.seen.entry(name.to_string()).or_insert(0);
        let unique = if *count == 0 {
            name.to_string()
        } else {
            format!("{name}#{count:02}")
        };
        *count += 1;

        let path = if self.path.is_empty() {
            unique
        } else {
            format!("{}/{unique}", self.path)
        };
        TestReporter {
            path,
            ..TestReporter::default()
        }
    }

    fn record(&mut self, message: &str, fatal: bool) {
        self.failed = true;
        self.failures.push(Failure {
            unit: self.path.clone(),
            message: message.to_string(),
            fatal,
        });
    }
}

impl Reporter for TestReporter {
    fn report(&mut self, message: &str) {
        tracing::warn!(unit = %self.path, "{message}");
        self.record(message, false);
    }

    fn fatal(&mut self, message: &str) {
        tracing::error!(unit = %self.path, "{message}");
        self.record(message, true);
    }

    fn subtest(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Reporter)) -> bool {
        let mut child = self.child(name);
        let span = tracing::info_span!("subtest", name = %child.path);
        let _entered = span.enter();
        body(&mut child);

        let passed = !child.failed;
        self.failed |= child.failed;
        self.failures.append(&mut child.failures);
        self.subtests.append(&mut child.subtests);
        self.subtests.push(SubtestOutcome {
            name: child.path,
            outcome: if passed { Outcome::Passed } else { Outcome::Failed },
        });
        passed
    }
}

/// Everything a `TestReporter` saw, in the order it happened. Sub-tests are
/// listed after their own nested sub-tests.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub failures: Vec<Failure>,
    pub subtests: Vec<SubtestOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Panic with every recorded failure unless the suite passed. Meant to be
    /// the last line of a `#[test]`.
    pub fn assert_passed(&self) {
        if self.passed() {
            return;
        }
        let lines: Vec<String> = self.failures.iter().map(|f| format!("  {f}")).collect();
        panic!(
            "{} failure(s) in handler suite:\n{}",
            self.failures.len(),
            lines.join("\n")
        );
    }

    pub fn outcome(&self, name: &str) -> Option<Outcome> {
        self.subtests
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.outcome)
    }
}
