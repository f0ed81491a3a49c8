//! Run configuration assembled from invocation parameters.
//!
//! All checks here happen before the first remote call, so a misconfigured
//! step fails without touching the release.

use crate::cli::Args;
use crate::error::{ConfigError, Result};
use crate::github::{DEFAULT_BASE_URL, DEFAULT_UPLOAD_URL, Repository};
use std::path::PathBuf;
use url::Url;

/// Immutable configuration for a single synchronization run
#[derive(Clone)]
pub struct SyncConfig {
    /// Metadata API root (always ends with `/`)
    pub base_url: Url,
    /// Upload API root (always ends with `/`)
    pub upload_url: Url,
    /// Access token
    pub token: String,
    /// Repository owning the release
    pub repository: Repository,
    /// Tag the release belongs to
    pub tag: String,
    /// Local artifacts, in pattern order
    pub files: Vec<PathBuf>,
}

impl SyncConfig {
    /// Build the run configuration for a tag event.
    ///
    /// Order matters: a missing credential is reported before anything else
    /// is inspected.
    pub fn from_args(args: &Args) -> Result<Self> {
        let token = args.credential().ok_or(ConfigError::MissingCredential)?;

        let base_url = parse_endpoint("base URL", args.base_url.as_deref(), DEFAULT_BASE_URL)?;
        let upload_url =
            parse_endpoint("upload URL", args.upload_url.as_deref(), DEFAULT_UPLOAD_URL)?;

        let files = expand_patterns(&args.files)?;

        let repository = resolve_repository(
            args.owner.as_deref(),
            args.name.as_deref(),
            args.repo.as_deref(),
        )?;

        let tag = resolve_tag(args.tag.as_deref(), args.git_ref.as_deref())
            .ok_or(ConfigError::MissingTag)?;

        log::info!(
            "Synchronizing {} file(s) to {repository}@{tag} via {base_url} / {upload_url}",
            files.len()
        );

        Ok(Self {
            base_url,
            upload_url,
            token: token.to_string(),
            repository,
            tag,
            files,
        })
    }
}

/// Apply the endpoint default and trailing-slash rule.
///
/// Absent or empty values resolve to `default`; anything else gets exactly
/// one `/` appended unless it already ends with one.
pub fn normalize_endpoint(value: Option<&str>, default: &str) -> String {
    match value {
        None | Some("") => default.to_string(),
        Some(url) if url.ends_with('/') => url.to_string(),
        Some(url) => format!("{url}/"),
    }
}

/// Normalize then parse an endpoint
fn parse_endpoint(option: &'static str, value: Option<&str>, default: &str) -> Result<Url> {
    let normalized = normalize_endpoint(value, default);
    Url::parse(&normalized).map_err(|source| {
        ConfigError::InvalidEndpoint {
            option,
            url: normalized,
            source,
        }
        .into()
    })
}

/// Expand each glob pattern independently and concatenate the results.
///
/// A pattern that matches nothing contributes nothing, and a blank pattern
/// (e.g. from a trailing comma) is skipped. Matches within one pattern come
/// back in the order the glob walker yields them (sorted by path).
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.trim().is_empty() {
            log::warn!("Skipping blank file pattern");
            continue;
        }

        let entries = glob::glob(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        let before = files.len();
        for entry in entries {
            let path = entry.map_err(|source| ConfigError::GlobFailed {
                pattern: pattern.clone(),
                source,
            })?;
            files.push(path);
        }

        if files.len() == before {
            log::warn!("Pattern '{pattern}' matched no files");
        }
    }

    Ok(files)
}

/// Derive the release tag: an explicit tag wins, otherwise the last path
/// segment of the git ref (`refs/tags/v1.2.0` → `v1.2.0`).
pub fn resolve_tag(tag: Option<&str>, git_ref: Option<&str>) -> Option<String> {
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        return Some(tag.to_string());
    }

    git_ref
        .map(|r| r.trim_end_matches('/'))
        .and_then(|r| r.rsplit('/').next())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Resolve the repository from owner/name, falling back to `owner/name` notation
pub fn resolve_repository(
    owner: Option<&str>,
    name: Option<&str>,
    full_name: Option<&str>,
) -> Result<Repository> {
    match (owner.filter(|o| !o.is_empty()), name.filter(|n| !n.is_empty())) {
        (Some(owner), Some(name)) => Ok(Repository::new(owner, name)),
        _ => match full_name.filter(|r| !r.is_empty()) {
            Some(full_name) => parse_repository(full_name),
            None => Err(ConfigError::MissingRepository.into()),
        },
    }
}

/// Parse `owner/name` into a [`Repository`]
pub fn parse_repository(value: &str) -> Result<Repository> {
    let parts: Vec<&str> = value.split('/').collect();
    match parts.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => {
            Ok(Repository::new(*owner, name.trim_end_matches(".git")))
        }
        _ => Err(ConfigError::InvalidRepository {
            value: value.to_string(),
        }
        .into()),
    }
}
