// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! HTTP client for the ooga-lang execution service

use eyre::{Context, Result};
use ooga_common::types::{RunRequest, RunResponse};
use std::time::Duration;
use tracing::{debug, error, info};

/// Message shown when the service cannot be reached
pub const SERVICE_UNAVAILABLE: &str = "Unable to call the ooga-lang service";

/// Client that submits programs to the execution service
#[derive(Debug, Clone)]
pub struct ExecutionClient {
    client: reqwest::Client,
    server_url: String,
}

impl ExecutionClient {
    /// Create a new client for the service at `server_url`
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build HTTP client")?;

        debug!("Created execution client for: {}", server_url);
        Ok(Self { client, server_url: server_url.trim_end_matches('/').to_string() })
    }

    /// Get server URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Submit `code` and wait for the run to finish
    pub async fn run(&self, code: &str) -> Result<RunResponse> {
        let url = format!("{}/run", self.server_url);
        info!(%url, bytes = code.len(), "Submitting program");

        let response = self
            .client
            .post(&url)
            .json(&RunRequest::new(code))
            .send()
            .await
            .with_context(|| format!("Failed to reach execution service at {url}"))?;

        // A failed run may still arrive with an error status; its body wins
        let status = response.status();
        let body = response.bytes().await.wrap_err("Failed to read execution service response")?;
        let run: RunResponse = match serde_json::from_slice(&body) {
            Ok(run) => run,
            Err(e) if status.is_success() => {
                return Err(e).wrap_err("Failed to decode execution service response");
            }
            Err(_) => eyre::bail!("Execution service returned error status {status}"),
        };

        debug!(
            success = run.success,
            heaps = run.heaps.len(),
            stacks = run.stacks.len(),
            "Run finished"
        );
        Ok(run)
    }

    /// Like [`Self::run`], but a transport failure becomes a failed run
    pub async fn run_or_report(&self, code: &str) -> RunResponse {
        match self.run(code).await {
            Ok(run) => run,
            Err(e) => {
                error!("Run failed: {:?}", e);
                RunResponse::failure(SERVICE_UNAVAILABLE)
            }
        }
    }
}
