// Process configuration, read once from the environment

use std::path::PathBuf;
use tracing::debug;

pub const REGION_VAR: &str = "AWS_REGION";
pub const REGISTRIES_VAR: &str = "REGISTRIES";
pub const TEMPLATE_VAR: &str = "TEMPLATE";

/// Where the output template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Template file given by `TEMPLATE`
    File(PathBuf),
    /// The built-in `docker login` template
    Builtin,
}

/// Settings for a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit region from `AWS_REGION`; `None` means ask instance metadata
    pub region: Option<String>,

    /// Registry account ids to request tokens for, empty for the caller's default registry
    pub registry_ids: Vec<String>,

    /// Template used to render the credentials
    pub template: TemplateSource,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = lookup(REGION_VAR).filter(|r| !r.is_empty());

        // Identifiers are passed through verbatim, whitespace included
        let registry_ids: Vec<String> = lookup(REGISTRIES_VAR)
            .map(|raw| raw.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        let template = match lookup(TEMPLATE_VAR) {
            Some(path) => TemplateSource::File(PathBuf::from(path)),
            None => TemplateSource::Builtin,
        };

        let settings = Self {
            region,
            registry_ids,
            template,
        };
        debug!("Loaded settings: {:?}", settings);
        settings
    }
}
