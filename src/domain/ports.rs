use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Fetches the HTML body behind a query URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn cache_dir(&self) -> Option<&Path>;
    fn print_http(&self) -> bool;
    fn sleep(&self) -> Duration;
    fn header(&self) -> bool;
}
