use crate::error::CheckError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Source of raw homework status answers.
#[async_trait]
pub trait HomeworkApi {
    /// Fetches statuses changed since `from_date` (unix seconds, now if `None`).
    async fn get_api_answer(&self, from_date: Option<i64>) -> Result<Value, CheckError>;
}

pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(PracticumClient {
            client,
            endpoint,
            token,
        })
    }

    fn request(&self, from_date: i64) -> reqwest::Result<Request> {
        self.client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn get_api_answer(&self, from_date: Option<i64>) -> Result<Value, CheckError> {
        let timestamp = from_date.unwrap_or_else(|| Utc::now().timestamp());
        let request = self.request(timestamp).map_err(CheckError::Transport)?;
        debug!(from_date = timestamp, url = %request.url(), "requesting homework statuses");

        let response = self.client.execute(request).await.map_err(|e| {
            error!(error = %e, "api request failed");
            CheckError::Transport(e)
        })?;
        if response.status() != StatusCode::OK {
            error!(status = %response.status(), "api answered with unexpected status");
            return Err(CheckError::UnexpectedStatus(response.status()));
        }

        response.json::<Value>().await.map_err(|e| {
            error!(error = %e, "api response is not valid json");
            CheckError::Decode(e)
        })
    }
}
