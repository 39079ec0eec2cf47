//! Declarative test cases for HTTP handlers.
//!
//! # Overview
//! Describe a case as data (method, URL, body, headers, expected status and
//! body), inline with `Case::new` or in a YAML suite, and run it in-process
//! against any `Handler`: a closure, or an `axum::Router` wrapped in
//! `ServiceHandler`. Nothing goes over a socket.
//!
//! # Design
//! - Per case: `build_request` → `invoke` → `assert_response`.
//! - Expectations are `Option`s; unset means "not asserted", except that an
//!   unset status still expects `200 OK`.
//! - Named cases run as sub-tests through the `Reporter` trait; unnamed cases
//!   report straight to the caller. `TestReporter` implements sub-tests on
//!   top of the standard test harness.
//! - Every per-case problem, including an unparsable header line, is reported
//!   against that case only. Only suite loading can stop a whole run.
//!
//! ```no_run
//! use handlertest::{handler_fn, run, Case, TestReporter};
//!
//! let handler = handler_fn(|_req, res| res.write_body(b"pong"));
//! let mut t = TestReporter::new();
//! run(&mut t, &handler, [
//!     Case::new("GET", "/ping").named("ping").expect_body("pong"),
//!     Case::new("GET", "/ping").expect_code(200),
//! ]);
//! t.finish().assert_passed();
//! ```

pub mod assert;
pub mod case;
pub mod config;
pub mod error;
pub mod handler;
pub mod loader;
pub mod recorder;
pub mod reporter;
pub mod request;
pub mod suite;

pub use assert::assert_response;
pub use case::{Case, RequestSpec, ResponseSpec};
pub use config::Config;
pub use error::{BuildError, ConfigError, LoadError};
pub use handler::{handler_fn, invoke, Handler, ServiceHandler};
pub use loader::{load_cases, run_from_reader, run_from_reader_with, run_from_yaml, run_from_yaml_with};
pub use recorder::{CapturedResponse, ResponseRecorder};
pub use reporter::{Failure, Outcome, Reporter, SubtestOutcome, SuiteReport, TestReporter};
pub use request::{build_request, RequestBody, SyntheticRequest};
pub use suite::{run, run_with, RunSummary};
