//! Asset reconciliation: replace assets by name with local artifacts.

use super::SyncContext;
use crate::error::{ReleaseError, Result};
use crate::github::{Asset, AssetUpload, Release, ReleaseApi, detect_content_type};
use std::io;
use std::path::{Path, PathBuf};

/// What a completed reconciliation changed on the release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Stale assets removed, in deletion order
    pub deleted: Vec<Asset>,
    /// Assets created, in upload order
    pub uploaded: Vec<Asset>,
}

/// Make the release carry one current asset per local file.
///
/// Existing assets are listed once up front. For each file, in order: the file
/// is opened, every listed asset with the same name as the file's basename is
/// deleted, then the file is uploaded. Assets with other names are left alone.
/// The first failure aborts the remaining files.
pub async fn reconcile<C: ReleaseApi>(
    ctx: &SyncContext<'_, C>,
    release: &Release,
    files: &[PathBuf],
) -> Result<ReconcileReport> {
    let mut remaining = ctx
        .client
        .list_release_assets(ctx.repository, release.id)
        .await
        .map_err(|source| ReleaseError::AssetListingFailed {
            release_id: release.id,
            source,
        })?;
    log::debug!("Release {} has {} existing asset(s)", release.id, remaining.len());

    let mut report = ReconcileReport::default();

    for path in files {
        // Opened before any deletion so an unreadable artifact never costs
        // the release its previous copy.
        let upload = open_artifact(path).await?;

        let (stale, kept): (Vec<Asset>, Vec<Asset>) =
            remaining.into_iter().partition(|asset| asset.name == upload.name);
        remaining = kept;

        for asset in stale {
            ctx.client
                .delete_release_asset(ctx.repository, asset.id)
                .await
                .map_err(|source| ReleaseError::AssetDeletionFailed {
                    path: path.clone(),
                    asset: asset.name.clone(),
                    source,
                })?;
            ctx.config
                .success_indent(&format!("Successfully deleted old {} artifact", asset.name));
            report.deleted.push(asset);
        }

        let asset = ctx
            .client
            .upload_release_asset(ctx.repository, release.id, upload)
            .await
            .map_err(|source| ReleaseError::AssetUploadFailed {
                path: path.clone(),
                source,
            })?;
        ctx.config.success_indent(&format!(
            "Successfully uploaded {} artifact ({} bytes)",
            path.display(),
            asset.size
        ));
        report.uploaded.push(asset);
    }

    Ok(report)
}

/// Open a local artifact and describe its upload
async fn open_artifact(path: &Path) -> Result<AssetUpload> {
    let unreadable = |source: io::Error| ReleaseError::LocalFileUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(unreadable)?;
    let metadata = file.metadata().await.map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            unreadable(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))
        })?;

    Ok(AssetUpload {
        content_type: detect_content_type(&name),
        name,
        size: metadata.len(),
        file,
    })
}
