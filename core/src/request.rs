//! Turns a `RequestSpec` into a `SyntheticRequest`.
//!
//! # Design
//! The synthetic request is a plain `http::Request` whose body is a
//! `RequestBody`: an in-memory, read-once stream. Nothing here touches the
//! network; path-only URLs are resolved against the base URL from `Config`
//! so handlers always see an absolute URI and a `Host` header.
//!
//! Every failure is a `BuildError` scoped to the case being built, including
//! header lines without the `": "` separator.

use std::io::{self, Read};

use axum::http::header::{HeaderName, HeaderValue, HOST};
use axum::http::uri::InvalidUri;
use axum::http::{Method, Request, Uri};
use bytes::{Buf, Bytes};

use crate::case::RequestSpec;
use crate::config::Config;
use crate::error::BuildError;

/// The request handed to a `Handler`.
pub type SyntheticRequest = Request<RequestBody>;

/// In-memory request body that can be consumed exactly once.
///
/// Reading advances past the returned bytes; once drained, further reads
/// return `Ok(0)`.
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    remaining: Bytes,
}

impl RequestBody {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any unread bytes are left.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Take every unread byte, leaving the body drained.
    pub fn take(&mut self) -> Bytes {
        std::mem::take(&mut self.remaining)
    }
}

impl From<Bytes> for RequestBody {
    fn from(remaining: Bytes) -> Self {
        Self { remaining }
    }
}

impl From<&str> for RequestBody {
    fn from(body: &str) -> Self {
        Self::from(Bytes::copy_from_slice(body.as_bytes()))
    }
}

impl Read for RequestBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining.len());
        buf[..n].copy_from_slice(&self.remaining[..n]);
        self.remaining.advance(n);
        Ok(n)
    }
}

/// Build the synthetic request described by `spec`.
pub fn build_request(spec: &RequestSpec, config: &Config) -> Result<SyntheticRequest, BuildError> {
    let method = parse_method(&spec.method)?;
    let uri = resolve_url(&spec.url, config)?;

    let body = match spec.body.as_deref() {
        Some(body) if !body.is_empty() => RequestBody::from(body),
        _ => RequestBody::empty(),
    };

    let mut request = Request::new(body);
    *request.method_mut() = method;
    if let Some(authority) = uri.authority() {
        let host = HeaderValue::from_str(authority.as_str()).map_err(|e| BuildError::InvalidUrl {
            url: spec.url.clone(),
            reason: e.to_string(),
        })?;
        request.headers_mut().insert(HOST, host);
    }
    *request.uri_mut() = uri;

    for line in &spec.headers {
        let (name, value) = parse_header(line)?;
        request.headers_mut().insert(name, value);
    }

    Ok(request)
}

fn parse_method(method: &str) -> Result<Method, BuildError> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| BuildError::InvalidMethod {
        method: method.to_string(),
    })
}

/// Absolute URLs pass through; `/path?query` forms get the configured scheme
/// and authority.
fn resolve_url(url: &str, config: &Config) -> Result<Uri, BuildError> {
    let invalid = |reason: String| BuildError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let target = if url.is_empty() { "/" } else { url };
    let uri: Uri = target.parse().map_err(|e: InvalidUri| invalid(e.to_string()))?;
    if uri.scheme().is_some() {
        return Ok(uri);
    }
    if uri.authority().is_some() || !target.starts_with('/') {
        return Err(invalid(
            "expected an absolute URL or a path starting with '/'".to_string(),
        ));
    }

    let mut parts = uri.into_parts();
    parts.scheme = Some(config.scheme().clone());
    parts.authority = Some(config.authority().clone());
    Uri::from_parts(parts).map_err(|e| invalid(e.to_string()))
}

/// Split `Key: Value` on the first `": "`.
fn parse_header(line: &str) -> Result<(HeaderName, HeaderValue), BuildError> {
    let (name, value) = line.split_once(": ").ok_or_else(|| BuildError::MalformedHeader {
        header: line.to_string(),
    })?;
    let invalid = |reason: String| BuildError::InvalidHeader {
        header: line.to_string(),
        reason,
    };
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((name, value))
}
