//! PhotoFunia effect client.
//!
//! An effect call runs four strictly sequential steps, each feeding the next:
//! - upload the image to `/images?server=1` and read back its key,
//! - post the effect form to `/categories/<path>?server=1`, following the
//!   redirect to the result page,
//! - fetch the result page and scrape the result image URL,
//! - download that image and return its bytes.
//!
//! Methods take `&mut self`: the session token is cached on the client, so
//! concurrent work should use one client per task. A call is cancelled by
//! dropping its future; wrap it in `tokio::time::timeout` for a per-call deadline.
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, REFERER};
use reqwest::{Client, Method, Url};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::{FuniaError, FuniaResult, StepFailure};
use crate::logger::{Field, Logger, NoopLogger};
use crate::photofunia::effect::Effect;
use crate::photofunia::form::{MultipartForm, EFFECT_BOUNDARY, UPLOAD_BOUNDARY};
use crate::photofunia::response::UploadResponse;
use crate::photofunia::scrape::extract_image_url;
use crate::photofunia::session::SessionManager;
use crate::photofunia::transport::{set_header, Transport, ACCEPT_IMAGE, ACCEPT_JSON};

pub struct PhotoFuniaClient {
    transport: Transport,
    logger: Arc<dyn Logger>,
    timeout: Duration,
}

pub struct PhotoFuniaClientBuilder {
    base_url: String,
    logger: Arc<dyn Logger>,
    timeout: Duration,
    session_id: Option<String>,
}

impl Default for PhotoFuniaClientBuilder {
    fn default() -> Self {
        PhotoFuniaClientBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            logger: Arc::new(NoopLogger),
            timeout: DEFAULT_TIMEOUT,
            session_id: None,
        }
    }
}

impl PhotoFuniaClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing session instead of bootstrapping one.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn build(self) -> FuniaResult<PhotoFuniaClient> {
        let transport = Transport::new(
            http_client(self.timeout)?,
            self.base_url,
            SessionManager::new(self.session_id),
            self.logger.clone(),
        );
        Ok(PhotoFuniaClient { transport, logger: self.logger, timeout: self.timeout })
    }
}

fn http_client(timeout: Duration) -> FuniaResult<Client> {
    Client::builder().timeout(timeout).build().map_err(FuniaError::HttpClient)
}

impl PhotoFuniaClient {
    /// Client for the public service with no logging and the default timeout.
    pub fn new() -> FuniaResult<Self> {
        Self::builder().build()
    }

    pub fn builder() -> PhotoFuniaClientBuilder {
        PhotoFuniaClientBuilder::default()
    }

    pub fn from_config(config: &Config) -> FuniaResult<Self> {
        Self::builder().base_url(config.base_url.clone()).timeout(config.timeout).build()
    }

    /// Same client with a different request timeout. The session is kept.
    pub fn with_timeout(self, timeout: Duration) -> FuniaResult<Self> {
        let transport = self.transport.with_http(http_client(timeout)?);
        Ok(PhotoFuniaClient { transport, logger: self.logger, timeout })
    }

    /// Same client logging through `logger`. The session is kept.
    pub fn with_logger(self, logger: impl Logger + 'static) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(logger);
        let transport = self.transport.with_logger(logger.clone());
        PhotoFuniaClient { transport, logger, timeout: self.timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// The session token, once one has been acquired.
    pub fn session_id(&self) -> Option<&str> {
        self.transport.session_id()
    }

    /// Applies the "fat maker" effect and returns the processed image.
    pub async fn fatify<R>(&mut self, image: R) -> FuniaResult<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        self.apply_effect(image, Effect::fat_maker()).await
    }

    /// Applies the clown effect, with or without the clown hat.
    pub async fn clownify<R>(&mut self, image: R, include_hat: bool) -> FuniaResult<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        self.apply_effect(image, Effect::clown(include_hat)).await
    }

    /// Uploads `image`, applies `effect` to it and downloads the result.
    ///
    /// The image stream is read to the end and dropped before anything is sent.
    pub async fn apply_effect<R>(&mut self, image: R, effect: Effect) -> FuniaResult<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let uploaded = self.upload_image(image).await?;
        let key = uploaded.key();
        if key.is_empty() {
            return Err(FuniaError::EmptyKey);
        }
        self.logger.info("got image key", &[Field::new("key", key)]);

        let result_url = self.request_effect(key, effect).await?;
        let html = self.fetch_result_page(&result_url).await?;
        let image_url = resolve_image_url(&result_url, extract_image_url(&html)?)?;
        self.logger.info("found image URL", &[Field::new("url", &image_url)]);

        self.download_image(&image_url, &result_url).await
    }

    async fn upload_image<R>(&mut self, mut image: R) -> FuniaResult<UploadResponse>
    where
        R: AsyncRead + Unpin,
    {
        let mut data = Vec::new();
        image
            .read_to_end(&mut data)
            .await
            .map_err(|e| FuniaError::Upload(StepFailure::Read(e)))?;
        drop(image);
        self.logger.info("read image data", &[Field::new("size", data.len())]);

        let form = MultipartForm::new(UPLOAD_BOUNDARY);
        let content_type = form.content_type();
        let body = form.file("image", "image.png", &data).finish();

        let url = format!("{}/images?server=1", self.base_url());
        let referer = format!("{}/categories/all_effects/clown", self.base_url());
        let mut request = self.transport.build_request(Method::POST, &url, Some(body)).await?;
        set_header(&mut request, ACCEPT, ACCEPT_JSON)?;
        set_header(&mut request, CONTENT_TYPE, &content_type)?;
        set_header(&mut request, REFERER, &referer)?;

        self.logger.info("sending request to PhotoFunia", &[]);
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| FuniaError::Upload(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FuniaError::Upload(StepFailure::Status(status)));
        }
        self.logger.info(
            "successfully received response from PhotoFunia",
            &[
                Field::new("contentType", header_str(&response, CONTENT_TYPE)),
                Field::new("contentLength", content_length(&response)),
            ],
        );

        let body = response.bytes().await.map_err(|e| FuniaError::Upload(e.into()))?;
        serde_json::from_slice(&body).map_err(|e| FuniaError::Upload(StepFailure::Decode(e)))
    }

    /// Posts the effect form and returns the URL of the page the service redirected to.
    async fn request_effect(&mut self, key: &str, effect: Effect) -> FuniaResult<String> {
        let path = effect.path().to_string();
        let name = effect.name().to_string();

        let mut params = effect.into_params();
        params.insert("image".to_string(), key.to_string());

        let form = params
            .iter()
            .fold(MultipartForm::new(EFFECT_BOUNDARY), |form, (k, v)| form.text(k, v));
        let content_type = form.content_type();
        let body = form.finish();

        let url = format!("{}/categories/{}?server=1", self.base_url(), path);
        let referer = format!("{}/categories/{}", self.base_url(), path);
        let mut request = self.transport.build_request(Method::POST, &url, Some(body)).await?;
        set_header(&mut request, CONTENT_TYPE, &content_type)?;
        set_header(&mut request, REFERER, &referer)?;

        self.logger.info(&format!("sending request to PhotoFunia {} effect", name), &[]);
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| FuniaError::EffectRequest(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FuniaError::EffectRequest(StepFailure::Status(status)));
        }

        let result_url = response.url().to_string();
        self.logger.info(
            &format!("successfully received response from PhotoFunia {} effect", name),
            &[
                Field::new("contentType", header_str(&response, CONTENT_TYPE)),
                Field::new("contentLength", content_length(&response)),
                Field::new("resultURL", &result_url),
            ],
        );
        Ok(result_url)
    }

    async fn fetch_result_page(&mut self, result_url: &str) -> FuniaResult<String> {
        let request = self.transport.build_request(Method::GET, result_url, None).await?;
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| FuniaError::ResultFetch(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FuniaError::ResultFetch(StepFailure::Status(status)));
        }

        response.text().await.map_err(|e| FuniaError::ResultFetch(e.into()))
    }

    async fn download_image(&mut self, image_url: &str, result_url: &str) -> FuniaResult<Vec<u8>> {
        let mut request = self.transport.build_request(Method::GET, image_url, None).await?;
        set_header(&mut request, ACCEPT, ACCEPT_IMAGE)?;
        set_header(&mut request, REFERER, result_url)?;

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| FuniaError::ImageDownload(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FuniaError::ImageDownload(StepFailure::Status(status)));
        }

        let data = response.bytes().await.map_err(|e| FuniaError::ImageDownload(e.into()))?;
        self.logger.info(
            "successfully downloaded image",
            &[Field::new("url", image_url), Field::new("size", data.len())],
        );
        Ok(data.to_vec())
    }
}

/// Resolves a scraped `src` against the result page so relative paths work.
fn resolve_image_url(result_url: &str, src: &str) -> FuniaResult<String> {
    let base = Url::parse(result_url)
        .map_err(|e| FuniaError::RequestConstruction(format!("invalid result URL {}: {}", result_url, e)))?;
    base.join(src)
        .map(|url| url.to_string())
        .map_err(|e| FuniaError::RequestConstruction(format!("invalid image URL {}: {}", src, e)))
}

fn header_str(response: &reqwest::Response, name: reqwest::header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn content_length(response: &reqwest::Response) -> String {
    response.content_length().map(|n| n.to_string()).unwrap_or_else(|| "-1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let client = PhotoFuniaClient::new().unwrap();
        assert_eq!(client.base_url(), "https://photofunia.com");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert!(client.session_id().is_none());
    }

    #[test]
    fn with_timeout_keeps_session() {
        let client = PhotoFuniaClient::builder()
            .base_url("http://localhost:8080/")
            .session_id("kept")
            .build()
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));
        assert_eq!(client.session_id(), Some("kept"));
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn image_url_resolution() {
        let page = "https://photofunia.com/results/abc";
        assert_eq!(resolve_image_url(page, "https://x/y.jpg").unwrap(), "https://x/y.jpg");
        assert_eq!(resolve_image_url(page, "/img/out.jpg").unwrap(), "https://photofunia.com/img/out.jpg");
        assert_eq!(resolve_image_url(page, "//cdn.test/o.jpg").unwrap(), "https://cdn.test/o.jpg");
        assert!(matches!(
            resolve_image_url("not a url", "/img/out.jpg"),
            Err(FuniaError::RequestConstruction(_))
        ));
    }

    #[test]
    fn with_logger_keeps_session_and_timeout() {
        let client = PhotoFuniaClient::builder()
            .session_id("kept")
            .timeout(Duration::from_secs(4))
            .build()
            .unwrap()
            .with_logger(crate::logger::TracingLogger);
        assert_eq!(client.session_id(), Some("kept"));
        assert_eq!(client.timeout(), Duration::from_secs(4));
    }

    #[test]
    fn from_config_uses_config_values() {
        let config = Config { base_url: "http://funia.test".to_string(), timeout: Duration::from_secs(7) };
        let client = PhotoFuniaClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://funia.test");
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }
}
