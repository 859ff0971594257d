//! Result-page scan for the processed image URL.
//!
//! This is a plain ordered text search, not an HTML parse: find the result
//! image marker, then the first `src="` after it, then the closing quote.
//! Each stage fails with its own error.
use crate::error::{FuniaError, FuniaResult};

const RESULT_IMAGE_MARKER: &str = r#"<img id="result-image""#;
const SRC_ATTR_START: &str = r#"src=""#;
const SRC_ATTR_END: char = '"';

pub fn extract_image_url(html: &str) -> FuniaResult<&str> {
    let marker = html.find(RESULT_IMAGE_MARKER).ok_or(FuniaError::ImageNotFound)?;
    let after_marker = &html[marker..];

    let src = after_marker.find(SRC_ATTR_START).ok_or(FuniaError::SrcAttribute)?;
    let value = &after_marker[src + SRC_ATTR_START.len()..];

    let end = value.find(SRC_ATTR_END).ok_or(FuniaError::UnterminatedAttribute)?;
    Ok(&value[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_src_of_result_image() {
        let html = r#"<html><body><img id="result-image" src="https://example.com/image.jpg" alt="Result"></body></html>"#;
        assert_eq!(extract_image_url(html).unwrap(), "https://example.com/image.jpg");
    }

    #[test]
    fn value_is_taken_verbatim_between_quotes() {
        let html = r#"<img id="result-image" src="https://x/y.jpg">"#;
        assert_eq!(extract_image_url(html).unwrap(), "https://x/y.jpg");
    }

    #[test]
    fn src_of_earlier_images_is_ignored() {
        let html = r#"<img src="https://x/logo.png"><img id="result-image" class="big" src="https://x/out.jpg">"#;
        assert_eq!(extract_image_url(html).unwrap(), "https://x/out.jpg");
    }

    #[test]
    fn first_src_after_marker_wins_even_outside_the_tag() {
        let html = r#"<img id="result-image" alt="r"><img src="https://x/next.jpg">"#;
        assert_eq!(extract_image_url(html).unwrap(), "https://x/next.jpg");
    }

    #[test]
    fn missing_marker() {
        let html = r#"<html><body><div>No image here</div><img src="https://x/y.jpg"></body></html>"#;
        assert!(matches!(extract_image_url(html), Err(FuniaError::ImageNotFound)));
    }

    #[test]
    fn marker_without_src() {
        let html = r#"<html><body><img id="result-image" alt="Result"></body></html>"#;
        assert!(matches!(extract_image_url(html), Err(FuniaError::SrcAttribute)));
    }

    #[test]
    fn src_without_closing_quote() {
        let html = r#"<img id="result-image" src="https://x/y.jpg"#;
        assert!(matches!(extract_image_url(html), Err(FuniaError::UnterminatedAttribute)));
    }

    #[test]
    fn empty_src_is_returned_as_is() {
        let html = r#"<img id="result-image" src="">"#;
        assert_eq!(extract_image_url(html).unwrap(), "");
    }
}
