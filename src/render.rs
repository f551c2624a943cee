// Go text/template rendering of decoded credentials

use chrono::{DateTime, Timelike, Utc};
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::auth::AuthRecord;
use crate::error::{LoginError, Result};
use crate::settings::TemplateSource;

/// One `docker login` line per registry
pub const DEFAULT_TEMPLATE: &str = "{{range .}}docker login -u {{.User}} -p {{.Pass}} {{.ProxyEndpoint}}
{{end}}";


pub struct Renderer {
    template: Template,
    name: String,
}

impl Renderer {
    /// Load the template named by `source` and parse it
    pub fn load(source: &TemplateSource) -> Result<Self> {
        match source {
            TemplateSource::Builtin => Self::parse("default", DEFAULT_TEMPLATE),
            TemplateSource::File(path) => {
                info!("Loading template from {}", path.display());
                let text = std::fs::read_to_string(path).map_err(|e| {
                    LoginError::Template(format!("failed to read {}: {}", path.display(), e))
                })?;
                Self::parse(&path.display().to_string(), &text)
            }
        }
    }

    /// Parse template text
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut template = Template::default();
        template
            .parse(text)
            .map_err(|e| LoginError::Template(format!("failed to parse {}: {}", name, e)))?;
        Ok(Self {
            template,
            name: name.to_string(),
        })
    }

    /// Execute the template once with all records as the top-level value.
    ///
    /// Output is buffered so a failing template produces nothing.
    pub fn render(&self, records: &[AuthRecord]) -> Result<String> {
        debug!("Rendering {} record(s) with template {}", records.len(), self.name);
        let data = Value::Array(records.iter().map(record_value).collect());
        self.template
            .render(&Context::from(data))
            .map_err(|e| LoginError::Template(format!("failed to execute {}: {}", self.name, e)))
    }
}

/// Format an instant the way Go prints a UTC `time.Time`.
///
/// The fraction is omitted when zero and has its trailing zeros removed otherwise.
fn format_expires_at(at: &DateTime<Utc>) -> String {
    let mut out = at.format("%Y-%m-%d %H:%M:%S").to_string();
    let nanos = at.nanosecond();
    if nanos != 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push_str(" +0000 UTC");
    out
}

/// Expose a record to templates under its Go field names
fn record_value(record: &AuthRecord) -> Value {
    let fields = [
        ("Token", record.token.clone()),
        ("User", record.user.clone()),
        ("Pass", record.pass.clone()),
        ("ProxyEndpoint", record.proxy_endpoint.clone()),
        (
            "ExpiresAt",
            format_expires_at(&record.expires_at),
        ),
    ];
    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::String(value)))
            .collect::<HashMap<_, _>>(),
    )
}
