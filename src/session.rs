// AWS session construction and region discovery

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ecr::error::DisplayErrorContext;
use tracing::{debug, info};

use crate::error::{LoginError, Result};
use crate::settings::Settings;

const IMDS_REGION_PATH: &str = "/latest/meta-data/placement/region";

/// Something that can tell which region this host runs in
#[async_trait]
pub trait RegionSource: Send + Sync {
    /// Look up the region, returning a human readable cause on failure
    async fn region(&self) -> std::result::Result<String, String>;
}

/// Region lookup through the EC2 instance metadata service
pub struct ImdsRegion;

#[async_trait]
impl RegionSource for ImdsRegion {
    async fn region(&self) -> std::result::Result<String, String> {
        let client = aws_config::imds::Client::builder().build();
        let region = client
            .get(IMDS_REGION_PATH)
            .await
            .map_err(|e| DisplayErrorContext(&e).to_string())?;
        let region: &str = region.as_ref();
        Ok(region.trim().to_string())
    }
}

/// Pick the explicit region, or ask `source` when none was configured
pub async fn resolve_region(settings: &Settings, source: &dyn RegionSource) -> Result<String> {
    if let Some(region) = &settings.region {
        debug!("Using region from AWS_REGION: {}", region);
        return Ok(region.clone());
    }

    debug!("AWS_REGION not set, querying instance metadata for region");
    let region = source.region().await.map_err(|cause| {
        LoginError::Config(format!(
            "AWS_REGION is not set and the region could not be read from instance metadata: {}",
            cause
        ))
    })?;

    if region.is_empty() {
        return Err(LoginError::Config(
            "AWS_REGION is not set and instance metadata returned an empty region".to_string(),
        ));
    }

    info!("Discovered region from instance metadata: {}", region);
    Ok(region)
}

/// Load AWS configuration using the default credential chain (env vars, profiles, instance role)
pub async fn load_session(region: String) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region))
        .load()
        .await
}
