use async_trait::async_trait;
use aws_sdk_ecr::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ecr::operation::get_authorization_token::GetAuthorizationTokenOutput;
use aws_sdk_ecr::Client as EcrClient;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{LoginError, Result};

/// One entry of `authorizationData` as returned by ECR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAuthRecord {
    pub authorization_token: String,
    pub proxy_endpoint: String,
    pub expires_at: DateTime<Utc>,
}

/// Source of registry authorization tokens
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    /// Request tokens for `registry_ids`; an empty slice means the caller's default registry
    async fn fetch_authorization(&self, registry_ids: &[String]) -> Result<Vec<RawAuthRecord>>;
}

/// Fetches tokens with a single `GetAuthorizationToken` call
pub struct EcrTokenFetcher {
    client: EcrClient,
}

impl EcrTokenFetcher {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: EcrClient::new(config),
        }
    }
}

/// Prefer the service's own message, fall back to the whole error chain
fn format_sdk_error<E>(err: &E) -> String
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (None, Some(message)) => message.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

/// Convert `authorizationData` into records, in response order
fn raw_records(output: &GetAuthorizationTokenOutput) -> Result<Vec<RawAuthRecord>> {
    output
        .authorization_data()
        .iter()
        .map(|data| -> Result<RawAuthRecord> {
            let authorization_token = data
                .authorization_token()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| LoginError::Api("No authorization token in response".into()))?;
            let proxy_endpoint = data
                .proxy_endpoint()
                .filter(|e| !e.is_empty())
                .ok_or_else(|| LoginError::Api("No proxy endpoint in response".into()))?;
            let expires_at = data
                .expires_at()
                .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                .ok_or_else(|| LoginError::Api("No valid expiry in response".into()))?;

            Ok(RawAuthRecord {
                authorization_token: authorization_token.to_string(),
                proxy_endpoint: proxy_endpoint.to_string(),
                expires_at,
            })
        })
        .collect()
}

#[async_trait]
impl TokenFetcher for EcrTokenFetcher {
    async fn fetch_authorization(&self, registry_ids: &[String]) -> Result<Vec<RawAuthRecord>> {
        debug!("Requesting ECR authorization token for {:?}", registry_ids);

        let mut request = self.client.get_authorization_token();
        if !registry_ids.is_empty() {
            #[allow(deprecated)]
            {
                request = request.set_registry_ids(Some(registry_ids.to_vec()));
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| LoginError::Api(format_sdk_error(&e)))?;

        let records = raw_records(&response)?;

        info!("Received {} authorization record(s) from ECR", records.len());
        Ok(records)
    }
}
