//! Declarative test case model.
//!
//! # Design
//! A `Case` pairs a `RequestSpec` (what to fire at the handler) with a
//! `ResponseSpec` (what to expect back). Every expectation is an `Option`:
//! `None` means "not asserted", so a wildcard is a distinct, type-checked
//! state rather than an overloaded zero value.
//!
//! The same types deserialize from a YAML suite definition; field names match
//! the suite format (`name`, `request.method`, `response.code`, ...).

use serde::Deserialize;

/// One request plus the response expected from the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Case {
    /// Runs the case as a named sub-test when set and non-empty.
    pub name: Option<String>,
    pub request: RequestSpec,
    pub response: ResponseSpec,
}

/// The request to fire at the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestSpec {
    /// HTTP method. Empty means `GET`.
    pub method: String,
    /// Absolute URL, or a path resolved against the configured base URL.
    /// Empty means `/`.
    pub url: String,
    /// Request body. `None` and `Some("")` both attach no body.
    pub body: Option<String>,
    /// Headers in `Key: Value` form, applied in order.
    pub headers: Vec<String>,
}

/// The expected response. Unset fields are not asserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponseSpec {
    /// Expected status code; 200 is assumed when unset or zero. Kept wide so
    /// an out-of-range code in a suite file fails its own case, not the load.
    pub code: Option<i64>,
    /// Expected body, compared byte for byte.
    pub body: Option<String>,
}

impl Case {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            name: None,
            request: RequestSpec {
                method: method.to_string(),
                url: url.to_string(),
                ..RequestSpec::default()
            },
            response: ResponseSpec::default(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.request.body = Some(body.to_string());
        self
    }

    /// Append a header in `Key: Value` form.
    pub fn header(mut self, header: &str) -> Self {
        self.request.headers.push(header.to_string());
        self
    }

    pub fn expect_code(mut self, code: u16) -> Self {
        self.response.code = Some(i64::from(code));
        self
    }

    pub fn expect_body(mut self, body: &str) -> Self {
        self.response.body = Some(body.to_string());
        self
    }

    /// The sub-test name, if this case runs as one.
    pub fn subtest_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}
