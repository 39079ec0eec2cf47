//! The handler-under-test contract and the synchronous invoker.
//!
//! # Design
//! A `Handler` is a plain blocking call: it receives the synthetic request and
//! a `ResponseRecorder`, and its effects are observed through the recorder
//! afterwards. Closures implement it directly. `ServiceHandler` adapts any
//! tower service speaking axum bodies (an `axum::Router`, typically) by
//! driving it to completion on a private current-thread runtime.

use std::fmt::Display;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::{Service, ServiceExt};

use crate::recorder::{CapturedResponse, ResponseRecorder};
use crate::request::SyntheticRequest;

/// A request-processing component under test.
pub trait Handler {
    fn serve(&self, request: &mut SyntheticRequest, sink: &mut ResponseRecorder);
}

impl<F> Handler for F
where
    F: Fn(&mut SyntheticRequest, &mut ResponseRecorder),
{
    fn serve(&self, request: &mut SyntheticRequest, sink: &mut ResponseRecorder) {
        self(request, sink)
    }
}

/// Pins a closure's argument types so it can be passed where a `Handler` is
/// expected without annotations.
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&mut SyntheticRequest, &mut ResponseRecorder),
{
    f
}

/// Call `handler` once with a fresh recorder and return what it captured.
///
/// Blocks until the handler returns.
pub fn invoke<H>(handler: &H, mut request: SyntheticRequest) -> CapturedResponse
where
    H: Handler + ?Sized,
{
    let mut sink = ResponseRecorder::new();
    handler.serve(&mut request, &mut sink);
    let captured = sink.finish();
    tracing::debug!(
        status = captured.status.as_u16(),
        body_len = captured.body.len(),
        "handler returned"
    );
    captured
}

/// Runs a tower service as a `Handler`.
///
/// Each call clones the service, builds a current-thread tokio runtime and
/// blocks on `oneshot`, so it only works from synchronous code. Called from
/// inside an async runtime, and on service or body errors, it records
/// `500 Internal Server Error` with the reason as body.
#[derive(Debug, Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S> Handler for ServiceHandler<S>
where
    S: Service<Request<Body>, Response = Response> + Clone,
    S::Error: Display,
{
    fn serve(&self, request: &mut SyntheticRequest, sink: &mut ResponseRecorder) {
        if tokio::runtime::Handle::try_current().is_ok() {
            return fail(
                sink,
                "ServiceHandler cannot block inside an async runtime; run the suite from a plain #[test]"
                    .to_string(),
            );
        }

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => return fail(sink, format!("start runtime: {e}")),
        };

        let mut forwarded = Request::new(Body::from(request.body_mut().take()));
        *forwarded.method_mut() = request.method().clone();
        *forwarded.uri_mut() = request.uri().clone();
        *forwarded.version_mut() = request.version();
        *forwarded.headers_mut() = request.headers().clone();

        let service = self.service.clone();
        let outcome = runtime.block_on(async move {
            let response = service
                .oneshot(forwarded)
                .await
                .map_err(|e| format!("service error: {e}"))?;
            let (parts, body) = response.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(|e| format!("read response body: {e}"))?
                .to_bytes();
            Ok::<_, String>((parts, bytes))
        });

        match outcome {
            Ok((parts, bytes)) => {
                sink.set_status(parts.status);
                sink.headers_mut().extend(parts.headers);
                sink.write_body(&bytes);
            }
            Err(message) => fail(sink, message),
        }
    }
}

fn fail(sink: &mut ResponseRecorder, message: String) {
    tracing::warn!(error = %message, "service handler failed");
    sink.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    sink.write_body(message.as_bytes());
}
