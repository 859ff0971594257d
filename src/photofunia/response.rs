//! Wire model of the `/images` upload reply.
//!
//! Only `response.key` drives the pipeline. Everything is defaulted so replies
//! with missing or extra fields still decode.
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub response: UploadedImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadedImage {
    pub key: String,
    pub server: i64,
    pub existed: bool,
    pub expiry: i64,
    pub created: i64,
    pub lifetime: i64,
    pub image: ImageVariants,
    pub sid: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImageVariants {
    pub highres: ImageVariant,
    pub preview: ImageVariant,
    pub thumb: ImageVariant,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImageVariant {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl UploadResponse {
    pub fn key(&self) -> &str {
        &self.response.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let body = r#"{"response":{"key":"test-image-key","server":1,"existed":false,"expiry":1700003600,"created":1700000000,"lifetime":3600,
            "image":{"highres":{"url":"https://x/h.jpg","width":961,"height":1093},
                     "preview":{"url":"https://x/p.jpg","width":480,"height":546},
                     "thumb":{"url":"https://x/t.jpg","width":100,"height":114}},
            "sid":"test-sid"}}"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.key(), "test-image-key");
        assert_eq!(parsed.response.server, 1);
        assert_eq!(parsed.response.lifetime, 3600);
        assert_eq!(parsed.response.image.highres.width, 961);
        assert_eq!(parsed.response.image.thumb.url, "https://x/t.jpg");
        assert_eq!(parsed.response.sid, "test-sid");
    }

    #[test]
    fn tolerates_unknown_and_missing_fields() {
        let body = r#"{"response":{"key":"abc123","watermark":true},"status":"ok"}"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.key(), "abc123");
        assert_eq!(parsed.response.image.preview.height, 0);
    }

    #[test]
    fn absent_key_decodes_as_empty() {
        let parsed: UploadResponse = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert_eq!(parsed.key(), "");
    }

    #[test]
    fn non_json_fails_to_decode() {
        assert!(serde_json::from_str::<UploadResponse>("invalid json").is_err());
    }
}
