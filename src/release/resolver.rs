//! Fetch-or-create resolution of the release for a tag.

use super::SyncContext;
use crate::error::{ReleaseError, Result};
use crate::github::{Release, ReleaseApi};

/// Return the release for `tag`, creating it if the lookup does not find one.
///
/// Any lookup failure (not only 404) is treated as absence. Creation is tried
/// exactly once; if it fails too the run is over.
pub async fn resolve<C: ReleaseApi>(ctx: &SyncContext<'_, C>, tag: &str) -> Result<Release> {
    let lookup = match ctx.client.get_release_by_tag(ctx.repository, tag).await {
        Ok(release) => {
            log::debug!("Found release {} for {tag} in {}", release.id, ctx.repository);
            ctx.config.success_println(&format!("Successfully retrieved {tag} release"));
            return Ok(release);
        }
        Err(e) => e,
    };

    if lookup.is_not_found() {
        log::debug!("No release for {tag} in {}; creating one", ctx.repository);
    } else {
        log::warn!("Lookup of release {tag} failed ({lookup}); trying to create it");
    }

    match ctx.client.create_release(ctx.repository, tag).await {
        Ok(release) => {
            log::debug!("Created release {} for {tag} in {}", release.id, ctx.repository);
            ctx.config.success_println(&format!("Successfully created {tag} release"));
            Ok(release)
        }
        Err(source) => Err(ReleaseError::ReleaseResolutionFailed {
            tag: tag.to_string(),
            lookup: lookup.to_string(),
            source,
        }),
    }
}
