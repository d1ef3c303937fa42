//! Drives the C surface the way a mobile host would: build a request through
//! FFI, execute it with a plain HTTP client, feed the response back through
//! FFI, and read the tagged result.

use std::ffi::{CStr, CString};
use std::net::SocketAddr;
use std::os::raw::c_char;

use alumni_ffi::types::*;
use alumni_ffi::*;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            alumni_mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

/// Execute an `FfiHttpRequest` and return `(status, body)`.
fn execute(req: *mut FfiHttpRequest) -> (u16, CString) {
    assert!(!req.is_null());
    let req = unsafe { &*req };
    let url = unsafe { CStr::from_ptr(req.url) }.to_str().unwrap().to_string();
    let headers: Vec<(String, String)> = if req.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) }
            .iter()
            .map(|h| unsafe {
                (
                    CStr::from_ptr(h.key).to_str().unwrap().to_string(),
                    CStr::from_ptr(h.value).to_str().unwrap().to_string(),
                )
            })
            .collect()
    };

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let mut resp = match req.method {
        FfiHttpMethod::Get => {
            let mut r = agent.get(url.as_str());
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            r.call().unwrap()
        }
        FfiHttpMethod::Post => {
            let mut r = agent.post(url.as_str());
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            let body = if req.body.is_null() {
                &[][..]
            } else {
                unsafe { std::slice::from_raw_parts(req.body, req.body_len) }
            };
            r.send(body).unwrap()
        }
    };
    let status = resp.status().as_u16();
    let body = resp.body_mut().read_to_string().unwrap();
    (status, CString::new(body).unwrap())
}

fn data_str<'a>(result: &FfiApiResult) -> &'a str {
    unsafe { CStr::from_ptr(result.data as *const c_char) }.to_str().unwrap()
}

#[test]
fn ffi_lifecycle() {
    let addr = start_server();
    let base_url = CString::new(format!("http://{addr}")).unwrap();
    let client = alumni_client_new(base_url.as_ptr());
    assert!(!client.is_null());
    let token = CString::new("host-token").unwrap();

    // Step 1: trending hashtags come from the server.
    let req = alumni_build_fetch_trending_hashtags(client);
    let (status, body) = execute(req);
    alumni_free_request(req);
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = alumni_parse_fetch_trending_hashtags(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.data_tag, FfiDataTag::HashtagList);
    let list = unsafe { &*(r.data as *const FfiHashtagList) };
    assert!(!list.is_fallback);
    assert!(list.len > 0);
    alumni_free_result(result);

    // Step 2: upload an image.
    let name = CString::new("campus.png").unwrap();
    let kind = CString::new("image").unwrap();
    let data = vec![7u8; 4096];
    let req = alumni_build_upload_media(client, token.as_ptr(), name.as_ptr(), data.as_ptr(), data.len(), kind.as_ptr());
    let (status, body) = execute(req);
    alumni_free_request(req);
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = alumni_parse_upload_media(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    assert_eq!(r.data_tag, FfiDataTag::FileUrl);
    let file_url = data_str(r).to_string();
    assert!(file_url.ends_with(".png"));
    alumni_free_result(result);

    // Step 3: create a post referencing the upload.
    let payload = serde_json::json!({
        "caption": "Back on campus",
        "hashtags": [{"id": 1, "tag": "Alumni"}],
        "audience": "connections",
        "media": {"url": file_url, "kind": "image"},
    });
    let payload = CString::new(payload.to_string()).unwrap();
    let req = alumni_build_create_post(client, token.as_ptr(), payload.as_ptr());
    let (status, body) = execute(req);
    alumni_free_request(req);
    assert_eq!(status, 201);
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = alumni_parse_create_post(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let post: serde_json::Value = serde_json::from_str(data_str(r)).unwrap();
    assert_eq!(post["caption"], "Back on campus");
    assert_eq!(post["media"]["url"], serde_json::Value::String(file_url));
    alumni_free_result(result);

    // Step 4: validation failure surfaces the server's message.
    let payload = CString::new(r#"{"caption":" "}"#).unwrap();
    let req = alumni_build_create_post(client, token.as_ptr(), payload.as_ptr());
    let (status, body) = execute(req);
    alumni_free_request(req);
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = alumni_parse_create_post(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Http);
    assert_eq!(r.http_status, 422);
    let msg = unsafe { CStr::from_ptr(r.error_message) }.to_str().unwrap();
    assert_eq!(msg, "Caption must not be empty");
    alumni_free_result(result);

    alumni_client_free(client);
}
