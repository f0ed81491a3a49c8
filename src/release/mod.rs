//! Release synchronization: fetch-or-create the release for a tag, then
//! replace its assets with the local artifacts.
//!
//! Everything runs strictly in order (resolve, list, then per file: open,
//! delete stale, upload) and stops at the first error.

mod reconciler;
mod resolver;

pub use reconciler::{ReconcileReport, reconcile};
pub use resolver::resolve;

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::github::{ReleaseApi, Repository};
use std::path::PathBuf;

/// Everything a sync run needs, passed explicitly to each step
pub struct SyncContext<'a, C: ReleaseApi> {
    /// Release API client
    pub client: &'a C,
    /// Repository owning the release
    pub repository: &'a Repository,
    /// Runtime configuration for output
    pub config: &'a RuntimeConfig,
}

impl<'a, C: ReleaseApi> SyncContext<'a, C> {
    /// Bundle a client, repository, and output configuration
    pub fn new(client: &'a C, repository: &'a Repository, config: &'a RuntimeConfig) -> Self {
        Self {
            client,
            repository,
            config,
        }
    }
}

/// Ensure the release for `tag` exists and carries exactly one current asset
/// per local file.
pub async fn synchronize<C: ReleaseApi>(
    ctx: &SyncContext<'_, C>,
    tag: &str,
    files: &[PathBuf],
) -> Result<ReconcileReport> {
    let release = resolve(ctx, tag).await?;
    reconcile(ctx, &release, files).await
}
