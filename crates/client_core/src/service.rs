//! Label service contract and its HTTP/JSON implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{LabelSubmission, Record, SampleIndex},
    protocol::{
        ItemsQuery, ItemsResponse, ProgressQuery, ProgressResponse, ITEMS_PATH, ITEM_PATH,
        LABEL_PATH, PROGRESS_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

#[async_trait]
pub trait LabelService: Send + Sync {
    async fn progress(&self, query: ProgressQuery) -> Result<ProgressResponse, ServiceError>;
    async fn fetch_items(&self, query: ItemsQuery) -> Result<ItemsResponse, ServiceError>;
    async fn fetch_item(&self, sample_index: SampleIndex) -> Result<Record, ServiceError>;
    async fn submit_label(&self, submission: &LabelSubmission) -> Result<(), ServiceError>;
}

pub struct HttpLabelService {
    http: Client,
    base_url: Url,
}

impl HttpLabelService {
    pub fn new(server_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(server_url, Client::new())
    }

    /// Builds a service whose requests give up after `timeout`. `None` keeps
    /// reqwest's default of waiting indefinitely.
    pub fn with_timeout(server_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(server_url, builder.build()?)
    }

    pub fn with_client(server_url: &str, http: Client) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path)?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status { status, body })
}

#[async_trait]
impl LabelService for HttpLabelService {
    async fn progress(&self, query: ProgressQuery) -> Result<ProgressResponse, ServiceError> {
        let url = self.endpoint(PROGRESS_PATH)?;
        debug!(%url, start = ?query.start, end = ?query.end, "requesting progress");
        let response = self.http.get(url).query(&query).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn fetch_items(&self, query: ItemsQuery) -> Result<ItemsResponse, ServiceError> {
        let url = self.endpoint(ITEMS_PATH)?;
        debug!(
            %url,
            start = query.start,
            end = query.end,
            skip_labeled = query.skip_labeled,
            show_labeled = query.show_labeled,
            "requesting items"
        );
        let response = self.http.get(url).query(&query).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn fetch_item(&self, sample_index: SampleIndex) -> Result<Record, ServiceError> {
        let url = self.endpoint(&format!("{ITEM_PATH}/{}", sample_index.0))?;
        let response = self.http.get(url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn submit_label(&self, submission: &LabelSubmission) -> Result<(), ServiceError> {
        let url = self.endpoint(LABEL_PATH)?;
        let response = self.http.post(url).json(submission).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
