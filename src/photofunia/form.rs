//! `multipart/form-data` encoding with a caller-chosen boundary.
//!
//! The service only accepts the boundary literals a browser would send, so the
//! boundary is fixed per endpoint instead of generated.

pub const UPLOAD_BOUNDARY: &str = "----WebKitFormBoundaryx4CBHpJEw9pPEXE4";
pub const EFFECT_BOUNDARY: &str = "----WebKitFormBoundaryL3VFyS6LkNI3s7UM";

pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new(boundary: &'static str) -> Self {
        MultipartForm { boundary, body: Vec::new() }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.push(&format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape_quotes(name)));
        self.push(value);
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.open_part();
        self.push(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            escape_quotes(name),
            escape_quotes(filename)
        ));
        self.push("Content-Type: application/octet-stream\r\n\r\n");
        self.body.extend_from_slice(data);
        self
    }

    /// Terminates the form and returns the encoded body.
    pub fn finish(mut self) -> Vec<u8> {
        if !self.body.is_empty() {
            self.push("\r\n");
        }
        let closing = format!("--{}--\r\n", self.boundary);
        self.push(&closing);
        self.body
    }

    fn open_part(&mut self) {
        if !self.body.is_empty() {
            self.push("\r\n");
        }
        let delimiter = format!("--{}\r\n", self.boundary);
        self.push(&delimiter);
    }

    fn push(&mut self, s: &str) {
        self.body.extend_from_slice(s.as_bytes());
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_are_delimited_by_the_boundary() {
        let body = MultipartForm::new(EFFECT_BOUNDARY)
            .text("hat", "on")
            .text("image", "abc123")
            .finish();
        let body = String::from_utf8(body).unwrap();

        let expected = "------WebKitFormBoundaryL3VFyS6LkNI3s7UM\r\n\
            Content-Disposition: form-data; name=\"hat\"\r\n\r\non\r\n\
            ------WebKitFormBoundaryL3VFyS6LkNI3s7UM\r\n\
            Content-Disposition: form-data; name=\"image\"\r\n\r\nabc123\r\n\
            ------WebKitFormBoundaryL3VFyS6LkNI3s7UM--\r\n";
        assert_eq!(body, expected);
    }

    #[test]
    fn file_part_keeps_bytes_verbatim() {
        let data = [0x89u8, b'P', b'N', b'G', 0x00, 0xff];
        let body = MultipartForm::new(UPLOAD_BOUNDARY).file("image", "image.png", &data).finish();

        let head = b"------WebKitFormBoundaryx4CBHpJEw9pPEXE4\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"image.png\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n";
        assert!(body.starts_with(head));
        assert_eq!(&body[head.len()..head.len() + data.len()], &data);
        assert!(body.ends_with(b"\r\n------WebKitFormBoundaryx4CBHpJEw9pPEXE4--\r\n"));
    }

    #[test]
    fn content_type_names_the_boundary() {
        let form = MultipartForm::new(UPLOAD_BOUNDARY);
        assert_eq!(form.content_type(), "multipart/form-data; boundary=----WebKitFormBoundaryx4CBHpJEw9pPEXE4");
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        let body = String::from_utf8(MultipartForm::new(EFFECT_BOUNDARY).text("a\"b", "v").finish()).unwrap();
        assert!(body.contains("name=\"a\\\"b\""));
    }
}
