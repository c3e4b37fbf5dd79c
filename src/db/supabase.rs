use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{GatewayError, Result};
use crate::models::UniversityRecord;

/// Thin PostgREST client for the managed universities table.
///
/// Read-only: rows are fetched fresh per request and never cached.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    table: String,
    max_retries: u32,
}

impl SupabaseClient {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Database(format!("failed to build client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            table: config.table.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Fetch rows with the given PostgREST column projection (`*` for all).
    pub async fn select(&self, columns: &str) -> Result<Vec<UniversityRecord>> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let mut attempt = 0;

        loop {
            let result = self
                .http
                .get(&url)
                .query(&[("select", columns)])
                .header("apikey", &self.key)
                .bearer_auth(&self.key)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(GatewayError::Database(format!(
                            "Supabase returned {status}: {body}"
                        )));
                    }
                    return response
                        .json::<Vec<UniversityRecord>>()
                        .await
                        .map_err(|e| GatewayError::Database(format!("invalid response: {e}")));
                }
                // Retry transport-class failures only; an HTTP error status
                // means the backend answered and a retry would not help.
                Err(e) if attempt < self.max_retries && (e.is_timeout() || e.is_connect()) => {
                    attempt += 1;
                    tracing::warn!(
                        "Supabase request failed ({e}), retry {attempt}/{}",
                        self.max_retries
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
