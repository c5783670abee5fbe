use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::contracts::{Record, RecordStore, UpstreamError};
use crate::upstream::config::UpstreamConfig;
use crate::upstream::token::{CachedToken, TokenCache};

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    expire: u64,
}

/// `{code, msg, data}` wrapper around every record API response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<Option<T>, UpstreamError> {
        if self.code == 0 {
            Ok(self.data)
        } else {
            Err(rejection(self.code, self.msg))
        }
    }
}

/// Error codes meaning the bearer token is missing, invalid or expired.
const TOKEN_REJECTED_CODES: &[i64] = &[99991661, 99991663, 99991668];

/// Maps a non-zero upstream code to an error. Token rejections are
/// authentication failures, not record-level ones.
fn rejection(code: i64, msg: String) -> UpstreamError {
    if TOKEN_REJECTED_CODES.contains(&code) {
        UpstreamError::Auth(format!("access token rejected, code {}: {}", code, msg))
    } else {
        UpstreamError::Upstream { code, msg }
    }
}

/// Body of a failed response, when the upstream sends one.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    items: Option<Vec<Record>>,
}

#[derive(Debug, Serialize)]
struct UpdateRecordRequest {
    fields: Map<String, Value>,
}

/// Client for the upstream tabular record API.
///
/// Holds the app credentials and exchanges them for a tenant access token,
/// cached until `token_margin_secs` before it expires.
pub struct UpstreamClient {
    config: UpstreamConfig,
    client: reqwest::Client,
    token: Mutex<TokenCache>,
}

impl UpstreamClient {
    /// Creates a new upstream client.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            token: Mutex::new(TokenCache::new()),
        })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Returns the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn records_url(&self) -> String {
        self.api_url(&format!(
            "/bitable/v1/apps/{}/tables/{}/records",
            self.config.app_token, self.config.table_id
        ))
    }

    /// Returns a valid access token, requesting a new one if the cached
    /// token is missing or about to expire.
    pub async fn access_token(&self) -> Result<String, UpstreamError> {
        let mut cache = self.token.lock().await;
        let now = Instant::now();
        if let Some(token) = cache.get(now) {
            return Ok(token.to_string());
        }

        let (value, lifetime) = self.request_token().await?;
        tracing::info!(expires_in_secs = lifetime, "Refreshed upstream access token");

        cache.store(CachedToken::from_grant(
            value.clone(),
            Duration::from_secs(lifetime),
            Duration::from_secs(self.config.token_margin_secs),
            now,
        ));
        Ok(value)
    }

    async fn request_token(&self) -> Result<(String, u64), UpstreamError> {
        let url = self.api_url("/auth/v3/tenant_access_token/internal");
        let body = TokenRequest {
            app_id: &self.config.app_id,
            app_secret: &self.config.app_secret,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("Token request failed: {}", e)))?;

        let token: TokenResponse = decode(response, "token").await?;
        if token.code != 0 {
            return Err(UpstreamError::Auth(format!(
                "code {}: {}",
                token.code, token.msg
            )));
        }

        let value = token
            .tenant_access_token
            .ok_or_else(|| UpstreamError::Auth("token response has no access token".into()))?;
        Ok((value, token.expire))
    }

    /// Drops the cached token when the upstream refused it, so the next
    /// call exchanges the credentials again.
    async fn forget_rejected_token<T>(
        &self,
        result: Result<T, UpstreamError>,
    ) -> Result<T, UpstreamError> {
        if let Err(UpstreamError::Auth(reason)) = &result {
            tracing::warn!(reason = %reason, "Upstream rejected access token, clearing cache");
            self.token.lock().await.clear();
        }
        result
    }
}

impl RecordStore for UpstreamClient {
    async fn list_records(&self) -> Result<Vec<Record>, UpstreamError> {
        let result = self.list_records_once().await;
        self.forget_rejected_token(result).await
    }

    async fn update_record(
        &self,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), UpstreamError> {
        let result = self.update_record_once(record_id, fields).await;
        self.forget_rejected_token(result).await
    }
}

impl UpstreamClient {
    async fn list_records_once(&self) -> Result<Vec<Record>, UpstreamError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.records_url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("Record list request failed: {}", e)))?;

        let envelope: Envelope<RecordPage> = decode(response, "record list").await?;
        let records = envelope
            .into_result()?
            .and_then(|page| page.items)
            .unwrap_or_default();

        tracing::debug!(records = records.len(), "Listed upstream records");
        Ok(records)
    }

    async fn update_record_once(
        &self,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), UpstreamError> {
        let token = self.access_token().await?;
        let url = format!("{}/{}", self.records_url(), record_id);
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&UpdateRecordRequest { fields })
            .send()
            .await
            .map_err(|e| {
                UpstreamError::Transport(format!("Record update request failed: {}", e))
            })?;

        let envelope: Envelope<Value> = decode(response, "record update").await?;
        envelope.into_result()?;

        tracing::debug!(record_id = record_id, "Updated upstream record");
        Ok(())
    }
}

/// Decodes a JSON body from a 2xx response.
///
/// Any non-2xx status is a transport failure whatever the body says, except
/// a token rejection, which is an authentication failure. An undecodable
/// 2xx body is a parse failure.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::Transport(format!("Failed to read {} response: {}", context, e)))?;

    if !status.is_success() {
        if let Ok(ErrorBody { code, msg }) = serde_json::from_slice(&body) {
            if let auth @ UpstreamError::Auth(_) = rejection(code, msg) {
                return Err(auth);
            }
        }
        return Err(UpstreamError::Transport(format!(
            "{} request returned HTTP {}",
            context, status
        )));
    }

    serde_json::from_slice(&body)
        .map_err(|e| UpstreamError::Parse(format!("Failed to parse {} response: {}", context, e)))
}
