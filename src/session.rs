use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::debug;

use crate::document::Document;
use crate::error::CrawlError;

/// One browser-like session: a single current page, driven sequentially.
#[allow(async_fn_in_trait)]
pub trait PageSession {
    /// Load `url` and make it the current page.
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError>;

    /// Fixed pause so client-side rendering can settle.
    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Parse the current page.
    fn document(&self) -> Result<Document, CrawlError>;

    /// Click the first element matching a CSS selector on the current page.
    async fn click(&mut self, selector: &str) -> Result<(), CrawlError>;

    fn current_url(&self) -> Option<&str>;
}

/// Which page session `main` builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Pages rendered by spider.cloud (needs SPIDER_API_KEY).
    Spider,
    /// Plain HTTP GET, no script execution.
    Http,
}

/// Current page held by the non-interactive backends.
#[derive(Default)]
struct Loaded {
    url: Option<String>,
    html: Option<String>,
}

impl Loaded {
    fn document(&self) -> Result<Document, CrawlError> {
        match (&self.url, &self.html) {
            (Some(_), Some(html)) => Ok(Document::parse(html)),
            (Some(url), None) => Err(CrawlError::session(url, "page has no content")),
            _ => Err(CrawlError::session("<none>", "no page loaded")),
        }
    }
}

/// Session backed by spider.cloud's rendering scraper.
pub struct SpiderSession {
    spider: Spider,
    page: Loaded,
}

impl SpiderSession {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SPIDER_API_KEY")
            .map_err(|_| anyhow::anyhow!("SPIDER_API_KEY environment variable must be set"))?;
        let spider = Spider::new(Some(api_key))
            .map_err(|e| anyhow::anyhow!("Failed to create Spider client: {}", e))?;
        Ok(Self {
            spider,
            page: Loaded::default(),
        })
    }
}

impl PageSession for SpiderSession {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError> {
        let params = RequestParams {
            return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
            ..Default::default()
        };

        let response = self
            .spider
            .scrape_url(url, Some(params), "application/json")
            .await
            .map_err(|e| CrawlError::session(url, e))?;

        let parsed: serde_json::Value = match response.as_str() {
            Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
            None => response,
        };

        let first = parsed.as_array().and_then(|arr| arr.first());
        let status = first
            .and_then(|obj| obj.get("status"))
            .and_then(|s| s.as_i64());
        if let Some(status) = status.filter(|s| *s >= 400) {
            return Err(CrawlError::session(url, format!("HTTP {}", status)));
        }

        let html = first
            .and_then(|obj| obj.get("content"))
            .and_then(|c| c.as_str())
            .map(strip_scripts);
        debug!(url, bytes = html.as_ref().map_or(0, |h| h.len()), "spider page loaded");

        self.page = Loaded {
            url: Some(url.to_string()),
            html,
        };
        Ok(())
    }

    fn document(&self) -> Result<Document, CrawlError> {
        self.page.document()
    }

    async fn click(&mut self, _selector: &str) -> Result<(), CrawlError> {
        Err(CrawlError::Unsupported {
            backend: "spider",
            action: "click",
        })
    }

    fn current_url(&self) -> Option<&str> {
        self.page.url.as_deref()
    }
}

/// Session that fetches pages over plain HTTP.
pub struct HttpSession {
    client: reqwest::Client,
    page: Loaded,
}

impl HttpSession {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            page: Loaded::default(),
        })
    }
}

impl PageSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CrawlError::session(url, e))?;
        let html = response.text().await.map_err(|e| CrawlError::session(url, e))?;
        debug!(url, bytes = html.len(), "http page loaded");

        self.page = Loaded {
            url: Some(url.to_string()),
            html: Some(html),
        };
        Ok(())
    }

    fn document(&self) -> Result<Document, CrawlError> {
        self.page.document()
    }

    async fn click(&mut self, _selector: &str) -> Result<(), CrawlError> {
        Err(CrawlError::Unsupported {
            backend: "http",
            action: "click",
        })
    }

    fn current_url(&self) -> Option<&str> {
        self.page.url.as_deref()
    }
}

/// Remove `<script>` elements before the page is parsed.
fn strip_scripts(html: &str) -> String {
    let re = Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap();
    re.replace_all(html, "").to_string()
}
