//! The `tag` event path: configure, connect, synchronize.

use crate::cli::{Args, RuntimeConfig};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::release::{SyncContext, synchronize};

/// Resolve configuration and synchronize the release for the build's tag
pub async fn execute_sync(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let sync_config = SyncConfig::from_args(args)?;

    let client = GitHubClient::new(
        sync_config.base_url.clone(),
        sync_config.upload_url.clone(),
        &sync_config.token,
    )?;

    config.info_println(&format!(
        "Syncing {} artifact(s) to {} release {}",
        sync_config.files.len(),
        sync_config.repository,
        sync_config.tag
    ));
    if sync_config.files.is_empty() {
        config.warning_println("No files matched the given patterns; only the release will be ensured");
    }

    let ctx = SyncContext::new(&client, &sync_config.repository, config);
    let report = synchronize(&ctx, &sync_config.tag, &sync_config.files).await?;

    config.success_println(&format!(
        "Release {} of {} has {} synchronized artifact(s) ({} replaced)",
        sync_config.tag,
        sync_config.repository,
        report.uploaded.len(),
        report.deleted.len()
    ));

    Ok(())
}
