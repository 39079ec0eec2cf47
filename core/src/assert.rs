//! Compares a captured response with a `ResponseSpec`.

use axum::http::StatusCode;

use crate::case::ResponseSpec;
use crate::recorder::CapturedResponse;
use crate::reporter::Reporter;

/// Report every way `actual` differs from `expected`.
///
/// The status code is always checked, against 200 when `expected.code` is
/// unset or zero. The body is checked byte for byte, only when
/// `expected.body` is set and non-empty. Both checks run, so one response
/// can produce two reports.
pub fn assert_response(reporter: &mut dyn Reporter, actual: &CapturedResponse, expected: &ResponseSpec) {
    let expected_code = expected
        .code
        .filter(|code| *code != 0)
        .unwrap_or(i64::from(StatusCode::OK.as_u16()));
    let actual_code = actual.status.as_u16();
    if i64::from(actual_code) != expected_code {
        tracing::warn!(actual = actual_code, expected = expected_code, "code mismatch");
        reporter.report(&format!(
            "Got response code {actual_code}, expected {expected_code}"
        ));
    }

    if let Some(expected_body) = expected.body.as_deref().filter(|body| !body.is_empty()) {
        if actual.body.as_ref() != expected_body.as_bytes() {
            tracing::warn!("body mismatch");
            reporter.report(&format!(
                "Got response body {:?}, expected {expected_body:?}",
                actual.body_text()
            ));
        }
    }
}
