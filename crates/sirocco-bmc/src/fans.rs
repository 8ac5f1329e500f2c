//! Fan mode and duty control
//!
//! Duty writes for one node are dispatched concurrently through a task
//! group bounded to the fan count. Each outcome is collected on its own; a
//! failed write never cancels its siblings.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{BmcError, Result};
use crate::session::{BmcClient, Session};
use crate::types::FanMode;

/// Node-level fan operations
///
/// Implemented by [`FanController`] against the live API; tests swap in a
/// mock.
#[async_trait]
pub trait FanOps: Send + Sync {
    /// Switch the fan controller between manual and auto
    async fn set_mode(&self, mode: FanMode) -> Result<()>;

    /// Set one fan's duty and return the duty the firmware reports back
    async fn set_fan_duty(&self, index: usize, duty: u8) -> Result<u8>;

    /// Read the current fan status entries
    async fn fan_info(&self) -> Result<Vec<serde_json::Value>>;
}

/// Outcome of one fan's duty write
#[derive(Debug)]
pub struct FanOutcome {
    /// Fan index the write targeted
    pub index: usize,
    /// Applied duty reported by the firmware, or the failure
    pub result: Result<u8>,
}

#[derive(Debug, Deserialize)]
struct DutyResponse {
    duty: u8,
}

#[derive(Debug, Deserialize)]
struct FanInfoResponse {
    fans: Vec<serde_json::Value>,
}

/// Fan control operations against one authenticated BMC
#[derive(Debug, Clone)]
pub struct FanController {
    client: BmcClient,
    session: Session,
}

impl FanController {
    /// Pair an authenticated session with its client
    pub fn new(client: BmcClient, session: Session) -> Self {
        Self { client, session }
    }

    /// The BMC host this controller talks to
    pub fn host(&self) -> &str {
        self.client.host()
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header(reqwest::header::COOKIE, self.session.cookie_header())
            .header("X-Csrftoken", self.session.csrf_token())
    }
}

#[async_trait]
impl FanOps for FanController {
    async fn set_mode(&self, mode: FanMode) -> Result<()> {
        let url = self.client.api_url("settings/fans-mode");
        let response = self
            .authed(self.client.http().put(url))
            .json(&json!({ "control_mode": mode.to_string() }))
            .send()
            .await?;
        info!(host = %self.host(), %mode, status = %response.status(), "Fan mode set");
        Ok(())
    }

    async fn set_fan_duty(&self, index: usize, duty: u8) -> Result<u8> {
        let url = self.client.api_url(&format!("settings/fan/{index}"));
        let response = self
            .authed(self.client.http().put(url))
            .json(&json!({ "duty": duty }))
            .send()
            .await?;
        let body: DutyResponse = response
            .json()
            .await
            .map_err(|e| BmcError::Protocol(format!("duty response for fan {index}: {e}")))?;
        Ok(body.duty)
    }

    async fn fan_info(&self) -> Result<Vec<serde_json::Value>> {
        let url = self.client.api_url("status/fan_info");
        let response = self.authed(self.client.http().get(url)).send().await?;
        let body: FanInfoResponse = response
            .json()
            .await
            .map_err(|e| BmcError::Protocol(format!("fan info response: {e}")))?;
        Ok(body.fans)
    }
}

/// Write `duty` to every fan in `0..count`, all in flight at once
///
/// Returns one outcome per fan, in completion order. A failed write is
/// logged and collected without affecting its siblings.
pub async fn apply_duty<C>(fans: &C, duty: u8, count: usize) -> Vec<FanOutcome>
where
    C: FanOps + ?Sized,
{
    stream::iter(0..count)
        .map(|index| async move {
            let result = fans.set_fan_duty(index, duty).await;
            match &result {
                Ok(applied) => info!(fan = index, duty = applied, "Fan duty applied"),
                Err(e) => warn!(fan = index, error = %e, "Fan duty write failed"),
            }
            FanOutcome { index, result }
        })
        .buffer_unordered(count.max(1))
        .collect()
        .await
}
