//! Error types for release synchronization.
//!
//! Every variant is terminal: the run stops at the first error and reports it
//! with the recovery suggestions attached to its kind.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release synchronization
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all synchronization operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Invocation parameters could not be turned into a run configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Neither lookup nor creation produced a release for the tag
    #[error("Failed to retrieve or create release for tag '{tag}' (lookup: {lookup}; create: {source})")]
    ReleaseResolutionFailed {
        /// Tag being resolved
        tag: String,
        /// Why the lookup did not return a release
        lookup: String,
        /// Why creation failed
        #[source]
        source: GitHubApiError,
    },

    /// Existing assets could not be enumerated
    #[error("Failed to fetch existing assets of release {release_id}: {source}")]
    AssetListingFailed {
        /// Release whose assets were being listed
        release_id: u64,
        /// Underlying API error
        #[source]
        source: GitHubApiError,
    },

    /// A designated artifact could not be opened
    #[error("Failed to read {} artifact: {source}", path.display())]
    LocalFileUnreadable {
        /// Local artifact path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A stale asset could not be removed
    #[error("Failed to delete {} artifact (asset '{asset}'): {source}", path.display())]
    AssetDeletionFailed {
        /// Local artifact path that collided with the asset
        path: PathBuf,
        /// Remote asset name
        asset: String,
        /// Underlying API error
        #[source]
        source: GitHubApiError,
    },

    /// A local artifact could not be uploaded
    #[error("Failed to upload {} artifact: {source}", path.display())]
    AssetUploadFailed {
        /// Local artifact path
        path: PathBuf,
        /// Underlying API error
        #[source]
        source: GitHubApiError,
    },

    /// GitHub client could not be constructed
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubApiError),
}

/// Configuration errors, raised before any remote call is made
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key was supplied
    #[error("You must provide an API key")]
    MissingCredential,

    /// Endpoint is not a valid URL
    #[error("Failed to parse {option} '{url}': {source}")]
    InvalidEndpoint {
        /// Which endpoint option was malformed
        option: &'static str,
        /// Normalized value that failed to parse
        url: String,
        /// Parse error
        #[source]
        source: url::ParseError,
    },

    /// Glob pattern is syntactically invalid
    #[error("Failed to glob {pattern}: {source}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Pattern error
        #[source]
        source: glob::PatternError,
    },

    /// A path matched by a pattern could not be inspected
    #[error("Failed to glob {pattern}: {source}")]
    GlobFailed {
        /// Pattern being expanded
        pattern: String,
        /// Glob iteration error
        #[source]
        source: glob::GlobError,
    },

    /// Repository owner or name not supplied
    #[error("Repository owner and name are required (set DRONE_REPO_OWNER and DRONE_REPO_NAME, or DRONE_REPO)")]
    MissingRepository,

    /// Repository string is not owner/name
    #[error("Invalid repository '{value}'. Expected: owner/name")]
    InvalidRepository {
        /// Value that failed to parse
        value: String,
    },

    /// Neither a tag nor a ref was supplied
    #[error("Could not determine tag (set DRONE_TAG or DRONE_COMMIT_REF)")]
    MissingTag,
}

/// Errors from the release-hosting API
#[derive(Error, Debug)]
pub enum GitHubApiError {
    /// The requested resource does not exist
    #[error("Not found: {url}")]
    NotFound {
        /// Requested URL
        url: String,
    },

    /// Any other non-success status
    #[error("HTTP {status} from {url}: {message}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
        /// Message from the response body
        message: String,
    },

    /// Connection, TLS, or decoding failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// API key cannot be sent as a header value
    #[error("Invalid API key: contains characters not allowed in an HTTP header")]
    InvalidCredential,

    /// Endpoint cannot carry request path segments
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// IO error while preparing a request body
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitHubApiError {
    /// Whether this error means the resource is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubApiError::NotFound { .. })
    }
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::MissingCredential) => vec![
                "Set the api_key plugin setting (PLUGIN_API_KEY) from a secret".to_string(),
                "Or export GITHUB_TOKEN in the step environment".to_string(),
            ],
            ReleaseError::Config(ConfigError::InvalidEndpoint { option, .. }) => vec![format!(
                "Check the {option} setting, e.g. https://github.example.com/api/v3/"
            )],
            ReleaseError::Config(ConfigError::InvalidPattern { .. }) => vec![
                "Fix the files setting; patterns use shell glob syntax (*, ?, [..])".to_string(),
            ],
            ReleaseError::ReleaseResolutionFailed { .. } => vec![
                "Verify the token has write access to the repository".to_string(),
                "Verify the tag was pushed to the remote".to_string(),
            ],
            ReleaseError::LocalFileUnreadable { path, .. } => vec![format!(
                "Ensure {} is produced by an earlier pipeline step",
                path.display()
            )],
            ReleaseError::AssetDeletionFailed { .. } | ReleaseError::AssetUploadFailed { .. } => {
                vec![
                    "Re-run the step; assets are replaced by name so a re-run is safe".to_string(),
                ]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Whether the run failed before contacting the API
    pub fn is_configuration(&self) -> bool {
        matches!(self, ReleaseError::Config(_))
    }
}
