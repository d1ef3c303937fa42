//! Minimal `multipart/form-data` encoder (RFC 7578).
//!
//! Only what media uploads need: text fields and in-memory file parts.

use uuid::Uuid;

const CRLF: &str = "\r\n";

#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("----alumni-{}", Uuid::new_v4().simple()))
    }

    /// Fixed boundary, for reproducible bodies.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.push(&format!(
            "Content-Disposition: form-data; name=\"{}\"{CRLF}{CRLF}",
            escape(name)
        ));
        self.push(value);
        self.push(CRLF);
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.open_part();
        self.push(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{CRLF}",
            escape(name),
            escape(file_name)
        ));
        self.push(&format!("Content-Type: {content_type}{CRLF}{CRLF}"));
        self.body.extend_from_slice(bytes);
        self.push(CRLF);
        self
    }

    /// Close the form and return the encoded body.
    pub fn finish(mut self) -> Vec<u8> {
        let closing = format!("--{}--{CRLF}", self.boundary);
        self.push(&closing);
        self.body
    }

    fn open_part(&mut self) {
        let delimiter = format!("--{}{CRLF}", self.boundary);
        self.push(&delimiter);
    }

    fn push(&mut self, s: &str) {
        self.body.extend_from_slice(s.as_bytes());
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Quotes and line breaks would terminate the header parameter early.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
