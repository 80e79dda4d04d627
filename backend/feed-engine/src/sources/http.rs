use super::{ContentSourceClient, SourcePage};
use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Source reached over HTTP
///
/// Issues `GET {base_url}?limit=N[&cursor=T]` and expects a JSON body of the
/// form `{"items": [...], "next_cursor": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpContentSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query(cursor: Option<&str>, limit: usize) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        query
    }

    fn map_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl ContentSourceClient for HttpContentSource {
    async fn fetch_page(&self, cursor: Option<String>, limit: usize) -> SourceResult<SourcePage> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&Self::query(cursor.as_deref(), limit))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let page = response
            .json::<SourcePage>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout)
                } else {
                    SourceError::Decode(e.to_string())
                }
            })?;

        debug!(
            url = %self.base_url,
            items = page.items.len(),
            has_next = page.next_cursor.is_some(),
            "Fetched page over HTTP"
        );

        Ok(page)
    }
}
