//! C-layout mirrors of the core request, response and result types.
//!
//! # Design
//! Strings cross as NUL-terminated `c_char` pointers, lists as pointer plus
//! length, and enums carry explicit discriminants. Request bodies are byte buffers
//! because media uploads are binary multipart. Allocation and release of
//! these values stays in this module.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use alumni_core::error::ApiError;
use alumni_core::http::HttpMethod;
use alumni_core::types::{Hashtag, Post};

/// Opaque `AlumniClient` handle owned by the host.
pub struct FfiAlumniClient {
    pub(crate) inner: alumni_core::AlumniClient,
}

/// Heap C string with interior NULs removed.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "")).unwrap_or_default().into_raw()
}

/// Release a string produced by `to_c_string`. Null is ignored.
pub(crate) unsafe fn drop_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// One header line.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request ready for the host's HTTP stack.
///
/// Built by `alumni_build_*` functions. The host executes the request and
/// passes the response back through `alumni_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// Null when the request has no body.
    pub body: *mut u8,
    pub body_len: usize,
    /// Round-trip deadline in milliseconds; 0 means none.
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: alumni_core::HttpRequest) -> *mut Self {
        let url = to_c_string(&req.path);

        let (body, body_len) = match req.body {
            Some(bytes) if !bytes.is_empty() => {
                let boxed: Box<[u8]> = bytes.into_boxed_slice();
                let len = boxed.len();
                (Box::into_raw(boxed) as *mut u8, len)
            }
            _ => (std::ptr::null_mut(), 0),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(&k),
                    value: to_c_string(&v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let timeout_ms = req
            .timeout
            .map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX).max(1));

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            body_len,
            timeout_ms,
        }))
    }

    /// Free everything `from_core` allocated.
    pub(crate) unsafe fn destroy(ptr: *mut Self) {
        let req = unsafe { Box::from_raw(ptr) };
        unsafe { drop_c_string(req.url) };
        if !req.body.is_null() {
            let slice = std::ptr::slice_from_raw_parts_mut(req.body, req.body_len);
            drop(unsafe { Box::from_raw(slice) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                unsafe {
                    drop_c_string(h.key);
                    drop_c_string(h.value);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (borrowed from the host)
// ---------------------------------------------------------------------------

/// What the host received back.
///
/// The host constructs this on the stack after executing a request, then
/// passes a pointer to an `alumni_parse_*` function. The FFI layer reads
/// but does not free these fields. A null `body` is an empty body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiApiResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Deserialization = 2,
    Serialization = 3,
    InvalidArgument = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tag that tells `alumni_free_result` what `FfiApiResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `FfiHashtagList`.
    HashtagList = 1,
    /// NUL-terminated JSON of the created post.
    PostJson = 2,
    /// NUL-terminated remote file URL.
    FileUrl = 3,
}

#[repr(C)]
pub struct FfiHashtag {
    pub id: u64,
    pub tag: *mut c_char,
}

#[repr(C)]
pub struct FfiHashtagList {
    pub items: *mut FfiHashtag,
    pub len: u32,
    /// True when the list is the built-in fallback set.
    pub is_fallback: bool,
}

/// Tagged outcome of every `alumni_parse_*` call.
///
/// Success: `error_code == Ok`, no message, `data` typed by `data_tag`.
/// Failure: `data` is null and `error_message` is text the UI can show as-is.
#[repr(C)]
pub struct FfiApiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiApiResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16, data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiApiResult {
            error_code,
            error_message: message.as_deref().map_or(std::ptr::null_mut(), to_c_string),
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying an `FfiHashtagList`.
    pub(crate) fn ok_hashtags(hashtags: Vec<Hashtag>, is_fallback: bool, http_status: u16) -> *mut Self {
        let len = hashtags.len() as u32;
        let items = if hashtags.is_empty() {
            std::ptr::null_mut()
        } else {
            let boxed: Box<[FfiHashtag]> = hashtags
                .into_iter()
                .map(|h| FfiHashtag {
                    id: h.id,
                    tag: to_c_string(&h.tag),
                })
                .collect();
            Box::into_raw(boxed) as *mut FfiHashtag
        };
        let list = Box::new(FfiHashtagList { items, len, is_fallback });
        Self::boxed(
            FfiErrorCode::Ok,
            None,
            http_status,
            FfiDataTag::HashtagList,
            Box::into_raw(list) as *mut c_void,
        )
    }

    /// Build a success result carrying the created post as JSON.
    pub(crate) fn ok_post(post: &Post, http_status: u16) -> *mut Self {
        match serde_json::to_string(post) {
            Ok(json) => Self::boxed(
                FfiErrorCode::Ok,
                None,
                http_status,
                FfiDataTag::PostJson,
                to_c_string(&json) as *mut c_void,
            ),
            Err(e) => Self::boxed(FfiErrorCode::Serialization, Some(e.to_string()), http_status, FfiDataTag::None, std::ptr::null_mut()),
        }
    }

    pub(crate) fn ok_file_url(url: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 200, FfiDataTag::FileUrl, to_c_string(&url) as *mut c_void)
    }

    /// A failure with a display message, e.g. from a create-post envelope.
    pub(crate) fn failure(code: FfiErrorCode, http_status: u16, message: String) -> *mut Self {
        Self::boxed(code, Some(message), http_status, FfiDataTag::None, std::ptr::null_mut())
    }

    /// Maps the error category and keeps the display message.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            _ => FfiErrorCode::InvalidArgument,
        };
        Self::failure(code, err.status().unwrap_or(0), err.user_message())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg.to_string())
    }

    /// Free the result and whatever `data` points to.
    pub(crate) unsafe fn destroy(ptr: *mut Self) {
        let result = unsafe { Box::from_raw(ptr) };
        unsafe { drop_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::None => {}
            FfiDataTag::HashtagList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiHashtagList) };
                if !list.items.is_null() && list.len > 0 {
                    let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
                    let items = unsafe { Box::from_raw(slice) };
                    for item in items.iter() {
                        unsafe { drop_c_string(item.tag) };
                    }
                }
            }
            FfiDataTag::PostJson | FfiDataTag::FileUrl => unsafe {
                drop_c_string(result.data as *mut c_char);
            },
        }
    }
}
