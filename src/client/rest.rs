//! REST backend client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Team, TeamApi};
use crate::error::{ApiError, Result};
use crate::lineup::TeamId;

/// Backend used when neither flag, env nor config names one
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// JSON REST client for `/teams/{id}`
pub struct RestClient {
    http: HttpClient,
    base_url: String,
}

impl RestClient {
    /// Create a client for `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn team_path(team_id: &TeamId) -> String {
        format!("/teams/{}", team_id)
    }

    /// Send a request and decode the JSON response
    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            status if status.is_success() => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .ok()
                    .filter(|t| !t.trim().is_empty() && t.trim() != "{}")
                    .unwrap_or_else(|| path.to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl TeamApi for RestClient {
    async fn get_team(&self, team_id: &TeamId) -> Result<Team> {
        self.request::<Team, ()>(Method::GET, &Self::team_path(team_id), None)
            .await
    }

    async fn update_team(&self, team_id: &TeamId, team: &Team) -> Result<Team> {
        self.request(Method::PUT, &Self::team_path(team_id), Some(team))
            .await
    }
}
