//! services/dashboard/src/adapters/http_backend.rs
//!
//! This module contains the HTTP adapter for the club backend.
//! It implements the `BackendService` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use club_dashboard_core::domain::{AskRequest, PeriodQuery};
use club_dashboard_core::ports::{BackendReply, BackendService, PortError, PortResult};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `BackendService` over plain HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend`. Without a timeout, requests wait for
    /// whatever the OS and server decide.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the status and tries to decode the body; a body that is empty
    /// or not JSON becomes `None` instead of an error.
    async fn into_reply(response: reqwest::Response) -> BackendReply {
        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(e) => {
                debug!("Failed to read response body: {}", e);
                None
            }
        };
        BackendReply { status, body }
    }
}

fn transport(e: reqwest::Error) -> PortError {
    PortError::Transport(e.to_string())
}

//=========================================================================================
// `BackendService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendService for HttpBackend {
    async fn health(&self) -> PortResult<u16> {
        let response = self
            .client
            .get(self.url("/health/"))
            .send()
            .await
            .map_err(transport)?;
        Ok(response.status().as_u16())
    }

    async fn leaderboard(&self, period: &PeriodQuery) -> PortResult<BackendReply> {
        let response = self
            .client
            .get(self.url("/strava/leaderboard"))
            .query(&period.query_pairs())
            .send()
            .await
            .map_err(transport)?;
        Ok(Self::into_reply(response).await)
    }

    async fn refresh(&self) -> PortResult<BackendReply> {
        let response = self
            .client
            .post(self.url("/strava/refresh"))
            .send()
            .await
            .map_err(transport)?;
        Ok(Self::into_reply(response).await)
    }

    async fn ask(&self, request: &AskRequest) -> PortResult<BackendReply> {
        let response = self
            .client
            .get(self.url("/strava/ask"))
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(transport)?;
        Ok(Self::into_reply(response).await)
    }
}
