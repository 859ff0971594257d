//! Lazily acquired, never refreshed service session.
//!
//! The service hands out a `PHPSESSID` cookie from its cookie-warning page.
//! The first request that needs it triggers one bootstrap GET; the token is
//! then reused for the lifetime of the client.
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Client, Url};

use crate::error::{FuniaError, FuniaResult, StepFailure};
use crate::logger::{Field, Logger};
use crate::photofunia::transport::browser_headers;

pub const SESSION_COOKIE: &str = "PHPSESSID";
pub const CONSENT_COOKIE: &str = "accept_cookie=true";

#[derive(Debug, Default)]
pub struct SessionManager {
    token: Option<String>,
}

impl SessionManager {
    pub fn new(token: Option<String>) -> Self {
        SessionManager { token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the held token, bootstrapping a session first if none is held.
    pub async fn ensure(&mut self, http: &Client, base_url: &str, logger: &dyn Logger) -> FuniaResult<&str> {
        let token = match self.token.take() {
            Some(token) => token,
            None => acquire(http, base_url, logger).await?,
        };
        Ok(self.token.insert(token).as_str())
    }
}

async fn acquire(http: &Client, base_url: &str, logger: &dyn Logger) -> FuniaResult<String> {
    logger.info("generating new PHPSESSID", &[]);

    let url = format!("{}/cookie-warning", base_url);
    let url = Url::parse(&url)
        .map_err(|e| FuniaError::RequestConstruction(format!("invalid session URL {}: {}", url, e)))?;

    let mut headers = browser_headers(base_url)?;
    headers.insert(COOKIE, HeaderValue::from_static(CONSENT_COOKIE));

    let response = http
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| FuniaError::Session(e.into()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FuniaError::Session(StepFailure::Status(status)));
    }

    let token = response
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(FuniaError::Session(StepFailure::MissingCookie(SESSION_COOKIE)))?;

    logger.debug("acquired session", &[Field::new("cookie", SESSION_COOKIE)]);
    Ok(token)
}
