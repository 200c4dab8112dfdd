use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::CatalogResult;

/// Status and raw body of an upstream GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy, for error reporting
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal HTTP seam so upstream access can be replaced in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> CatalogResult<HttpResponse>;
}

/// [`HttpGet`] over a shared `reqwest` client
#[derive(Clone, Debug)]
pub struct ReqwestHttpGet {
    client: Client,
}

impl ReqwestHttpGet {
    pub fn new(timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpGet for ReqwestHttpGet {
    async fn get(&self, url: &str) -> CatalogResult<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
