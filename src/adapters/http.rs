use crate::adapters::cache::{CachedResponse, ResponseCache};
use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{Result, RetrieverError};
use async_trait::async_trait;
use reqwest::Client;

/// reqwest-backed fetcher with optional on-disk cache and header echo.
pub struct HttpFetcher {
    client: Client,
    cache: Option<ResponseCache>,
    print_http: bool,
}

impl HttpFetcher {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;

        let cache = config
            .cache_dir()
            .map(|dir| ResponseCache::open(dir))
            .transpose()?;
        if let Some(cache) = &cache {
            tracing::debug!("HTTP cache enabled at {}", cache.dir().display());
        }

        Ok(Self {
            client,
            cache,
            print_http: config.print_http(),
        })
    }

    pub fn with_client(client: Client, cache: Option<ResponseCache>, print_http: bool) -> Self {
        Self {
            client,
            cache,
            print_http,
        }
    }

    fn print_headers(&self, status: u16, headers: &[(String, String)]) {
        if !self.print_http {
            return;
        }
        eprintln!("\tstatus: {}", status);
        for (name, value) in headers {
            eprintln!("\t{}: {}", name, value);
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if let Some(entry) = self.cache.as_ref().and_then(|c| c.get(url)) {
            tracing::debug!("Cache hit for {}", url);
            self.print_headers(entry.status, &entry.headers);
            return Ok(entry.body);
        }

        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        self.print_headers(status.as_u16(), &headers);

        if !status.is_success() {
            return Err(RetrieverError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        if let Some(cache) = &self.cache {
            cache.put(&CachedResponse {
                url: url.to_string(),
                status: status.as_u16(),
                headers,
                body: body.clone(),
                fetched_at: chrono::Utc::now(),
            })?;
        }

        Ok(body)
    }
}
