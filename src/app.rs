use std::io::Write;
use tracing::debug;

use crate::auth;
use crate::ecr::TokenFetcher;
use crate::error::Result;
use crate::render::Renderer;
use crate::settings::Settings;

/// Fetch, decode and render credentials, then write them to `out`.
///
/// The template is loaded before any API call so a bad `TEMPLATE` fails fast.
pub async fn login<W: Write>(
    fetcher: &dyn TokenFetcher,
    settings: &Settings,
    out: &mut W,
) -> Result<()> {
    let renderer = Renderer::load(&settings.template)?;

    let raw = fetcher.fetch_authorization(&settings.registry_ids).await?;
    let records = auth::decode_all(&raw)?;
    let rendered = renderer.render(&records)?;

    debug!("Writing {} bytes of output", rendered.len());
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
