//! In-memory response sink handed to handlers.

use std::borrow::Cow;
use std::io;

use axum::http::{HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};

/// Records what a handler writes: status, headers and body.
///
/// The status may be set once, before any body bytes are written. Writing
/// body bytes without a status commits `200 OK`.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

/// The response as captured after the handler returned.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status code. Ignored if a status was already committed.
    pub fn set_status(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(committed) => tracing::warn!(
                committed = committed.as_u16(),
                ignored = status.as_u16(),
                "superfluous status write"
            ),
        }
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Append to the body, committing `200 OK` if no status was set.
    pub fn write_body(&mut self, bytes: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(bytes);
    }

    /// The committed status, or `200 OK` if the handler never set one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn finish(self) -> CapturedResponse {
        CapturedResponse {
            status: self.status(),
            headers: self.headers,
            body: self.body.freeze(),
        }
    }
}

impl io::Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedResponse {
    /// The body as text; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
