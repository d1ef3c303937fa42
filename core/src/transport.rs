//! Executing `HttpRequest` values.
//!
//! # Design
//! `Transport` is the seam between the sans-IO client and the network. A
//! transport returns every HTTP status as data; only failures to get a
//! response at all are errors. `UreqTransport` is the blocking default.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        Ok(())
    }
}

/// Bytes of a request body handed to the network so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.sent as f64 / self.total as f64
    }
}

pub trait Transport {
    /// Perform one round-trip. Non-2xx statuses are returned as `Ok`.
    fn execute(&self, request: &HttpRequest, cancel: &CancelToken) -> Result<HttpResponse, ApiError>;

    /// Like `execute`, reporting body progress as it is sent. The default
    /// reports a single completion event.
    fn execute_with_progress(
        &self,
        request: &HttpRequest,
        cancel: &CancelToken,
        progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<HttpResponse, ApiError> {
        let response = self.execute(request, cancel)?;
        let total = request.body.as_ref().map_or(0, |b| b.len() as u64);
        progress(UploadProgress { sent: total, total });
        Ok(response)
    }
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    fn send(
        &self,
        request: &HttpRequest,
        cancel: &CancelToken,
        progress: Option<&mut dyn FnMut(UploadProgress)>,
    ) -> Result<HttpResponse, ApiError> {
        cancel.check()?;
        log::debug!("{} {}", request.method.as_str(), request.path);

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self
                    .agent
                    .get(request.path.as_str())
                    .config()
                    .timeout_global(request.timeout)
                    .build();
                for (k, v) in &request.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self
                    .agent
                    .post(request.path.as_str())
                    .config()
                    .timeout_global(request.timeout)
                    .build();
                for (k, v) in &request.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                let body = request.body.as_deref().unwrap_or_default();
                match progress {
                    Some(progress) => {
                        let mut reader = ProgressReader {
                            inner: body,
                            sent: 0,
                            total: body.len() as u64,
                            cancel,
                            progress,
                        };
                        builder.send(ureq::SendBody::from_reader(&mut reader))
                    }
                    None => builder.send(body),
                }
            }
        };

        let mut response = result.map_err(|e| map_ureq_error(e, cancel))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| map_ureq_error(e, cancel))?;
        cancel.check()?;

        log::debug!("{} {} -> {status}", request.method.as_str(), request.path);
        Ok(HttpResponse { status, headers, body })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest, cancel: &CancelToken) -> Result<HttpResponse, ApiError> {
        self.send(request, cancel, None)
    }

    fn execute_with_progress(
        &self,
        request: &HttpRequest,
        cancel: &CancelToken,
        progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<HttpResponse, ApiError> {
        self.send(request, cancel, Some(progress))
    }
}

fn map_ureq_error(err: ureq::Error, cancel: &CancelToken) -> ApiError {
    if cancel.is_cancelled() {
        return ApiError::Cancelled;
    }
    match err {
        ureq::Error::Timeout(_) => ApiError::TimedOut,
        other => ApiError::Transport(other.to_string()),
    }
}

/// Streams a request body, reporting progress and aborting on cancel.
struct ProgressReader<'a, 'p> {
    inner: &'a [u8],
    sent: u64,
    total: u64,
    cancel: &'a CancelToken,
    progress: &'p mut dyn FnMut(UploadProgress),
}

impl Read for ProgressReader<'_, '_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.is_cancelled() {
            return Err(io::Error::other("upload cancelled"));
        }
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sent += n as u64;
            (self.progress)(UploadProgress {
                sent: self.sent,
                total: self.total,
            });
        }
        Ok(n)
    }
}
