//! # Kodegen Release Sync
//!
//! CI step that publishes build artifacts to the GitHub release of a pushed
//! tag.
//!
//! On a tag event the step looks up the release for the tag (creating it if
//! there is none), then replaces the release's assets with the given local
//! files, matching by file name. Assets whose names do not collide with a
//! local file are never touched, so re-running the step is safe.
//!
//! ## Usage
//!
//! ```bash
//! DRONE_BUILD_EVENT=tag DRONE_COMMIT_REF=refs/tags/v1.2.0 DRONE_REPO=owner/name \
//! PLUGIN_API_KEY=$TOKEN PLUGIN_FILES='dist/*.tar.gz,dist/*.sha256' \
//!     kodegen_release_sync
//! ```
//!
//! ## Library use
//!
//! The workflow is written against the [`ReleaseApi`] trait, so it can be
//! driven with any implementation of the five release operations:
//!
//! ```no_run
//! # async fn demo() -> kodegen_release_sync::Result<()> {
//! use kodegen_release_sync::{GitHubClient, Repository, SyncContext, synchronize};
//! use kodegen_release_sync::cli::RuntimeConfig;
//!
//! let client = GitHubClient::new(
//!     "https://api.github.com/".parse().unwrap(),
//!     "https://uploads.github.com/".parse().unwrap(),
//!     "token",
//! )?;
//! let repo = Repository::new("owner", "name");
//! let config = RuntimeConfig::default();
//! let ctx = SyncContext::new(&client, &repo, &config);
//! let files = vec![std::path::PathBuf::from("dist/app.tar.gz")];
//! let report = synchronize(&ctx, "v1.2.0", &files).await?;
//! println!("uploaded {} asset(s)", report.uploaded.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod release;

// Re-export main types for public API
pub use cli::Args;
pub use config::SyncConfig;
pub use error::{ConfigError, GitHubApiError, ReleaseError, Result};
pub use github::{Asset, AssetUpload, GitHubClient, Release, ReleaseApi, Repository};
pub use release::{ReconcileReport, SyncContext, reconcile, resolve, synchronize};
