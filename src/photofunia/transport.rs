//! Request construction with browser-like headers and the session cookie.
//!
//! The service rejects requests that do not look like they come from a
//! browser, so every request carries the same header set. `Content-Type` is
//! left to the caller.
use std::sync::Arc;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, COOKIE, ORIGIN,
    USER_AGENT as USER_AGENT_HEADER,
};
use reqwest::{Client, Method, Request, Response, Url};

use crate::error::{FuniaError, FuniaResult};
use crate::logger::{Field, Logger};
use crate::photofunia::session::{SessionManager, CONSENT_COOKIE, SESSION_COOKIE};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";
pub const ACCEPT_DOCUMENT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
pub const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";
pub const ACCEPT_IMAGE: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// The fixed browser header set, with `Origin` pointing at `base_url`.
pub fn browser_headers(base_url: &str) -> FuniaResult<HeaderMap> {
    let origin = HeaderValue::from_str(base_url)
        .map_err(|e| FuniaError::RequestConstruction(format!("invalid origin {}: {}", base_url, e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_DOCUMENT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(ORIGIN, origin);
    headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
    Ok(headers)
}

/// Overrides or adds a header on an already built request.
pub fn set_header(request: &mut Request, name: HeaderName, value: &str) -> FuniaResult<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| FuniaError::RequestConstruction(format!("invalid {} header: {}", name, e)))?;
    request.headers_mut().insert(name, value);
    Ok(())
}

pub struct Transport {
    http: Client,
    base_url: String,
    session: SessionManager,
    logger: Arc<dyn Logger>,
}

impl Transport {
    pub fn new(http: Client, base_url: String, session: SessionManager, logger: Arc<dyn Logger>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Transport { http, base_url, session, logger }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.token()
    }

    /// Swaps the underlying HTTP client, keeping the session.
    pub fn with_http(self, http: Client) -> Self {
        Transport { http, ..self }
    }

    pub fn with_logger(self, logger: Arc<dyn Logger>) -> Self {
        Transport { logger, ..self }
    }

    /// Builds a request carrying the browser headers and the session cookie,
    /// acquiring the session first if needed.
    pub async fn build_request(&mut self, method: Method, url: &str, body: Option<Vec<u8>>) -> FuniaResult<Request> {
        let parsed = Url::parse(url)
            .map_err(|e| FuniaError::RequestConstruction(format!("invalid URL {}: {}", url, e)))?;

        let mut headers = browser_headers(&self.base_url)?;

        let token = self.session.ensure(&self.http, &self.base_url, self.logger.as_ref()).await?;
        let cookie = HeaderValue::from_str(&format!("{}; {}={}", CONSENT_COOKIE, SESSION_COOKIE, token))
            .map_err(|e| FuniaError::RequestConstruction(format!("invalid session cookie: {}", e)))?;
        headers.insert(COOKIE, cookie);

        let mut builder = self.http.request(method.clone(), parsed).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(|e| FuniaError::RequestConstruction(e.to_string()))?;

        self.logger.debug("built request", &[Field::new("method", method), Field::new("url", url)]);
        Ok(request)
    }

    pub async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.http.execute(request).await
    }
}
