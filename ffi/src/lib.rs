//! C-ABI wrapper around `alumni-core`.
//!
//! # Overview
//! Exposes the alumni API boundary through `extern "C"` functions so the
//! mobile host (Swift/Kotlin) can build and parse HTTP requests/responses
//! with its own networking stack, including background upload sessions,
//! without linking Rust's async runtime or serde directly.
//!
//! # Design
//! - No panic unwinds into the host: each entry point runs under `catch_unwind`.
//! - Per-endpoint `build_*` / `parse_*` mirrors the core API 1:1.
//! - Parse results share one `FfiApiResult` shape, a `FfiDataTag` saying
//!   what `data` holds.
//! - The trending-hashtags parser never fails: any failure yields the
//!   fallback list with `is_fallback` set.
//! - Returned pointers belong to the host until handed to the matching
//!   `alumni_free_*`.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use alumni_core::http::HttpResponse;
use alumni_core::types::{MediaKind, PostPayload};
use alumni_core::{AuthToken, ClientConfig, MediaFile};

use types::*;

/// Borrow a C string as `&str`. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and NUL-terminated.
unsafe fn read_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `AlumniClient` bound to `base_url`.
///
/// Returns null if `base_url` is null, is not an http(s) URL, or if an
/// internal panic occurs. The caller must free the returned pointer with
/// `alumni_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_client_new(base_url: *const c_char) -> *mut FfiAlumniClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_str(base_url) };
        match ClientConfig::new(url) {
            Ok(config) => Box::into_raw(Box::new(FfiAlumniClient {
                inner: alumni_core::AlumniClient::new(config),
            })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free an `AlumniClient` created by `alumni_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_client_free(client: *mut FfiAlumniClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for `GET /hashtags/trending`.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `alumni_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_build_fetch_trending_hashtags(client: *const FfiAlumniClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_fetch_trending_hashtags())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for `POST /posts`.
///
/// `payload_json` must decode as a post payload (`caption`, optional
/// `hashtags`, `audience`, `media`). Returns null if any argument is null or
/// the payload does not decode.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_build_create_post(
    client: *const FfiAlumniClient,
    token: *const c_char,
    payload_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || token.is_null() || payload_json.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let token = AuthToken::new(unsafe { read_str(token) });
        let payload: PostPayload = match serde_json::from_str(unsafe { read_str(payload_json) }) {
            Ok(p) => p,
            Err(_) => return std::ptr::null_mut(),
        };
        match client.inner.build_create_post(&payload, &token) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the multipart request for `POST /media/upload`.
///
/// `data` may be null only when `data_len` is 0. `media_kind` is sent as the
/// `type` field; `"image"` and `"video"` select those MIME families and any
/// other tag is treated as a generic file.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_build_upload_media(
    client: *const FfiAlumniClient,
    token: *const c_char,
    file_name: *const c_char,
    data: *const u8,
    data_len: usize,
    media_kind: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || token.is_null() || file_name.is_null() || media_kind.is_null() {
            return std::ptr::null_mut();
        }
        if data.is_null() && data_len > 0 {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let token = AuthToken::new(unsafe { read_str(token) });
        let bytes = if data_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(data, data_len) }.to_vec()
        };
        let file = MediaFile::new(unsafe { read_str(file_name) }, bytes);
        let media_type = unsafe { read_str(media_kind) };
        FfiHttpRequest::from_core(client.inner.build_upload_media(&file, media_type, &token))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// MIME type the upload would use for `file_name`, for hosts that hand the
/// file to a native background uploader instead of `alumni_build_upload_media`.
///
/// Returns null if an argument is null. Free with `alumni_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_upload_mime_type(media_kind: *const c_char, file_name: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if media_kind.is_null() || file_name.is_null() {
            return std::ptr::null_mut();
        }
        let kind = MediaKind::from_tag(unsafe { read_str(media_kind) });
        let file = MediaFile::new(unsafe { read_str(file_name) }, Vec::new());
        to_c_string(file.mime_type(kind).essence_str())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
    };
    HttpResponse::new(resp.status, body)
}

/// Parse the response of a trending-hashtags request.
///
/// Always returns `data_tag = HashtagList`. A failed fetch (non-2xx or
/// undecodable body) yields the fallback list with `is_fallback = true`.
/// Hosts whose request never completed should call
/// `alumni_default_hashtags` instead.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_parse_fetch_trending_hashtags(
    client: *const FfiAlumniClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiApiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_fetch_trending_hashtags(ffi_response_to_core(resp)) {
            Ok(hashtags) => FfiApiResult::ok_hashtags(hashtags, false, resp.status),
            Err(_) => FfiApiResult::ok_hashtags(alumni_core::default_hashtags(), true, resp.status),
        }
    })
    .unwrap_or_else(|_| FfiApiResult::panic("panic in alumni_parse_fetch_trending_hashtags"))
}

/// The eight fallback hashtags, with `is_fallback = true`.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_default_hashtags() -> *mut FfiApiResult {
    catch_unwind(|| FfiApiResult::ok_hashtags(alumni_core::default_hashtags(), true, 0))
        .unwrap_or_else(|_| FfiApiResult::panic("panic in alumni_default_hashtags"))
}

/// Parse the response of a create-post request.
///
/// Returns `data_tag = PostJson` (the echo as received) for any 2xx JSON body.
/// A failure status gives `error_code = Http` with the backend's message (or
/// a generic one); a 2xx body that is not JSON gives `Deserialization`.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_parse_create_post(
    client: *const FfiAlumniClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiApiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let envelope = client.inner.parse_create_post(ffi_response_to_core(resp));
        match envelope.data {
            Some(post) if envelope.success => FfiApiResult::ok_post(&post, resp.status),
            // A success status whose body was not JSON.
            _ if (200..300).contains(&resp.status) => {
                FfiApiResult::failure(FfiErrorCode::Deserialization, resp.status, envelope.message)
            }
            _ => FfiApiResult::failure(FfiErrorCode::Http, resp.status, envelope.message),
        }
    })
    .unwrap_or_else(|_| FfiApiResult::panic("panic in alumni_parse_create_post"))
}

/// Parse the response of an upload request.
///
/// Returns `data_tag = FileUrl` on HTTP 200 with a `fileUrl` body.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_parse_upload_media(
    client: *const FfiAlumniClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiApiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_upload_media(ffi_response_to_core(resp)) {
            Ok(url) => FfiApiResult::ok_file_url(url),
            Err(e) => FfiApiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiApiResult::panic("panic in alumni_parse_upload_media"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `alumni_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::destroy(req) });
}

/// Free an `FfiApiResult` returned by any `alumni_parse_*` function.
/// Null is ignored.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_free_result(result: *mut FfiApiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiApiResult::destroy(result) });
}

/// Free a string returned by `alumni_upload_mime_type`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn alumni_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { drop_c_string(s) });
}
