//! High-level boundary used by the app's screens.
//!
//! # Design
//! `AlumniApi` glues the sans-IO `AlumniClient` to a `Transport` and a
//! `CredentialProvider` and applies each endpoint's outcome contract:
//!
//! - `fetch_trending_hashtags` never fails; any failure yields the fallback
//!   hashtags.
//! - `create_post` never fails; any failure yields a failure envelope.
//! - `upload_media` returns the remote file URL or an `ApiError`.
//!
//! No call is retried. A 401 from an authenticated endpoint invalidates the
//! credentials so the next call reports a signed-out session.

use std::path::Path;
use std::time::Duration;

use crate::auth::CredentialProvider;
use crate::client::AlumniClient;
use crate::error::ApiError;
use crate::fallback::default_hashtags;
use crate::http::{HttpRequest, HttpResponse};
use crate::media::MediaFile;
use crate::transport::{CancelToken, Transport, UploadProgress};
use crate::types::{ApiResponse, Hashtag, Post, PostPayload};

/// Per-call deadline and cancellation.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Overrides the configured timeout for this call.
    pub timeout: Option<Duration>,
    pub cancel: CancelToken,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn apply(&self, request: &mut HttpRequest) {
        if let Some(timeout) = self.timeout {
            request.timeout = Some(timeout);
        }
    }
}

pub struct AlumniApi<T, C> {
    client: AlumniClient,
    transport: T,
    credentials: C,
}

impl<T: Transport, C: CredentialProvider> AlumniApi<T, C> {
    pub fn new(client: AlumniClient, transport: T, credentials: C) -> Self {
        Self {
            client,
            transport,
            credentials,
        }
    }

    pub fn client(&self) -> &AlumniClient {
        &self.client
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Trending hashtags, or the fallback set on any failure.
    pub fn fetch_trending_hashtags(&self, opts: &CallOptions) -> Vec<Hashtag> {
        let mut request = self.client.build_fetch_trending_hashtags();
        opts.apply(&mut request);
        let fetched = self
            .transport
            .execute(&request, &opts.cancel)
            .and_then(|response| self.client.parse_fetch_trending_hashtags(response));
        match fetched {
            Ok(hashtags) => hashtags,
            Err(e) => {
                log::warn!("trending hashtags unavailable, using defaults: {e}");
                default_hashtags()
            }
        }
    }

    /// Submit a post. Failures are reported in the envelope.
    pub fn create_post(&self, payload: &PostPayload, opts: &CallOptions) -> ApiResponse<Post> {
        match self.try_create_post(payload, opts) {
            Ok(response) => self.client.parse_create_post(response),
            Err(e) => {
                log::warn!("create post failed: {e}");
                ApiResponse::failure(e.user_message())
            }
        }
    }

    fn try_create_post(&self, payload: &PostPayload, opts: &CallOptions) -> Result<HttpResponse, ApiError> {
        opts.cancel.check()?;
        let token = self.credentials.acquire()?;
        let mut request = self.client.build_create_post(payload, &token)?;
        opts.apply(&mut request);
        let response = self.transport.execute(&request, &opts.cancel)?;
        self.observe_auth(&response);
        Ok(response)
    }

    /// Upload a file and return its remote URL.
    pub fn upload_media<F>(
        &self,
        file: &MediaFile,
        media_type: impl AsRef<str>,
        opts: &CallOptions,
        mut on_progress: F,
    ) -> Result<String, ApiError>
    where
        F: FnMut(UploadProgress),
    {
        opts.cancel.check()?;
        let token = self.credentials.acquire()?;
        let mut request = self.client.build_upload_media(file, media_type, &token);
        opts.apply(&mut request);
        let response = self
            .transport
            .execute_with_progress(&request, &opts.cancel, &mut on_progress)
            .inspect_err(|e| log::warn!("upload of {} failed: {e}", file.file_name))?;
        self.observe_auth(&response);
        self.client.parse_upload_media(response)
    }

    pub fn upload_media_from_path<F>(
        &self,
        path: impl AsRef<Path>,
        media_type: impl AsRef<str>,
        opts: &CallOptions,
        on_progress: F,
    ) -> Result<String, ApiError>
    where
        F: FnMut(UploadProgress),
    {
        let file = MediaFile::open(path)?;
        self.upload_media(&file, media_type, opts, on_progress)
    }

    fn observe_auth(&self, response: &HttpResponse) {
        if response.status == 401 {
            log::warn!("backend rejected credentials, invalidating session");
            self.credentials.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::auth::{AuthToken, StaticCredentials};
    use crate::config::ClientConfig;
    use crate::error::{AuthError, GENERIC_FAILURE_MESSAGE};
    use crate::types::MediaKind;

    /// Replays canned outcomes and records what was sent.
    struct FakeTransport {
        outcome: Box<dyn Fn() -> Result<HttpResponse, ApiError>>,
        seen: RefCell<Vec<HttpRequest>>,
        calls: Cell<usize>,
    }

    impl FakeTransport {
        fn responding(status: u16, body: &'static str) -> Self {
            Self::with(move || Ok(HttpResponse::new(status, body)))
        }

        fn failing(make: fn() -> ApiError) -> Self {
            Self::with(move || Err(make()))
        }

        fn with(outcome: impl Fn() -> Result<HttpResponse, ApiError> + 'static) -> Self {
            Self {
                outcome: Box::new(outcome),
                seen: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest, cancel: &CancelToken) -> Result<HttpResponse, ApiError> {
            cancel.check()?;
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(request.clone());
            (self.outcome)()
        }
    }

    fn api(transport: FakeTransport) -> AlumniApi<FakeTransport, StaticCredentials> {
        let client = AlumniClient::new(ClientConfig::new("http://api.test").unwrap());
        AlumniApi::new(client, transport, StaticCredentials::new(AuthToken::new("tok")))
    }

    const POST_BODY: &str =
        r#"{"id":"00000000-0000-0000-0000-000000000009","caption":"hi","hashtags":[],"audience":"public"}"#;

    #[test]
    fn trending_network_error_returns_defaults() {
        let api = api(FakeTransport::failing(|| ApiError::Transport("connection refused".into())));
        assert_eq!(api.fetch_trending_hashtags(&CallOptions::default()), default_hashtags());
    }

    #[test]
    fn trending_non_2xx_returns_defaults() {
        for status in [400, 404, 500, 503] {
            let api = api(FakeTransport::responding(status, r#"{"message":"down"}"#));
            let tags = api.fetch_trending_hashtags(&CallOptions::default());
            assert_eq!(tags.len(), 8);
            assert_eq!(tags, default_hashtags());
        }
    }

    #[test]
    fn trending_timeout_returns_defaults() {
        let api = api(FakeTransport::failing(|| ApiError::TimedOut));
        assert_eq!(api.fetch_trending_hashtags(&CallOptions::default()), default_hashtags());
    }

    #[test]
    fn trending_success_returns_remote_list() {
        let api = api(FakeTransport::responding(200, r#"{"hashtags":[{"id":42,"tag":"Remote"}]}"#));
        let tags = api.fetch_trending_hashtags(&CallOptions::default());
        assert_eq!(tags, vec![Hashtag::new(42, "Remote")]);
    }

    #[test]
    fn create_post_non_2xx_is_failure_envelope() {
        for status in [400, 403, 409, 500, 502] {
            let api = api(FakeTransport::responding(status, ""));
            let envelope = api.create_post(&PostPayload::new("hi"), &CallOptions::default());
            assert!(!envelope.success);
            assert!(!envelope.message.is_empty());
        }
    }

    #[test]
    fn create_post_transport_error_is_failure_envelope() {
        let api = api(FakeTransport::failing(|| ApiError::Transport("reset".into())));
        let envelope = api.create_post(&PostPayload::new("hi"), &CallOptions::default());
        assert!(!envelope.success);
        assert!(envelope.message.contains("Unable to reach the server"));
    }

    #[test]
    fn create_post_success_sends_bearer() {
        let api = api(FakeTransport::responding(201, POST_BODY));
        let envelope = api.create_post(&PostPayload::new("hi"), &CallOptions::default());
        assert!(envelope.success);
        let seen = api.transport.seen.borrow();
        assert_eq!(seen[0].header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn create_post_malformed_success_body_is_failure() {
        let api = api(FakeTransport::responding(200, "not json"));
        let envelope = api.create_post(&PostPayload::new("hi"), &CallOptions::default());
        assert!(!envelope.success);
        assert_eq!(envelope.message, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn unauthorized_invalidates_credentials() {
        let api = api(FakeTransport::responding(401, r#"{"message":"token expired"}"#));
        let envelope = api.create_post(&PostPayload::new("hi"), &CallOptions::default());
        assert_eq!(envelope.message, "token expired");
        assert_eq!(api.credentials().acquire().unwrap_err(), AuthError::SignedOut);

        // Next call fails before reaching the network and is not retried.
        let envelope = api.create_post(&PostPayload::new("hi"), &CallOptions::default());
        assert!(!envelope.success);
        assert_eq!(api.transport.calls.get(), 1);
    }

    #[test]
    fn cancelled_call_never_reaches_transport() {
        let api = api(FakeTransport::responding(201, POST_BODY));
        let cancel = CancelToken::new();
        cancel.cancel();
        let opts = CallOptions::default().with_cancel(cancel);

        let envelope = api.create_post(&PostPayload::new("hi"), &opts);
        assert!(!envelope.success);
        let err = api
            .upload_media(&MediaFile::new("a.png", vec![1]), MediaKind::Image, &opts, |_| {})
            .unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
        assert_eq!(api.transport.calls.get(), 0);
    }

    #[test]
    fn call_timeout_overrides_config() {
        let api = api(FakeTransport::responding(201, POST_BODY));
        let opts = CallOptions::default().with_timeout(Duration::from_millis(250));
        api.create_post(&PostPayload::new("hi"), &opts);
        assert_eq!(api.transport.seen.borrow()[0].timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn upload_returns_file_url_and_reports_progress() {
        let api = api(FakeTransport::responding(200, r#"{"fileUrl":"http://cdn/p.jpg"}"#));
        let mut last = None;
        let url = api
            .upload_media(
                &MediaFile::new("p.jpg", vec![0; 64]),
                MediaKind::Image,
                &CallOptions::default(),
                |p| last = Some(p),
            )
            .unwrap();
        assert_eq!(url, "http://cdn/p.jpg");
        let last = last.unwrap();
        assert_eq!(last.sent, last.total);
    }

    #[test]
    fn upload_non_200_is_error_with_message() {
        let api = api(FakeTransport::responding(413, r#"{"message":"File too large"}"#));
        let err = api
            .upload_media(&MediaFile::new("v.mp4", vec![0; 8]), MediaKind::Video, &CallOptions::default(), |_| {})
            .unwrap_err();
        assert_eq!(err.user_message(), "File too large");
    }
}
