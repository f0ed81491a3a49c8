//! Command line argument parsing and validation.
//!
//! Every option falls back to the environment variable the CI runtime sets,
//! so the binary runs unmodified as a pipeline plugin.

use clap::Parser;

/// Build event that activates the workflow
pub const TAG_EVENT: &str = "tag";

/// Sync build artifacts to the GitHub release of a pushed tag
#[derive(Parser, Debug, Clone)]
#[command(
    name = "kodegen_release_sync",
    version,
    about = "Sync build artifacts to the GitHub release of a pushed tag",
    long_about = "Fetch or create the GitHub release for the current tag and replace its
assets with the given local files (matched by file name).

Only runs for tag events; any other event exits successfully without changes.

Usage:
  kodegen_release_sync --event tag --ref refs/tags/v1.2.0 --repo owner/name \\
      --api-key $TOKEN --files 'dist/*.tar.gz' --files dist/app.sha256"
)]
pub struct Args {
    /// Build event that triggered the pipeline
    #[arg(long, env = "DRONE_BUILD_EVENT")]
    pub event: Option<String>,

    /// Git ref of the build; the tag is its last path segment
    #[arg(long = "ref", env = "DRONE_COMMIT_REF", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Tag name (takes precedence over --ref)
    #[arg(long, env = "DRONE_TAG")]
    pub tag: Option<String>,

    /// Repository owner
    #[arg(long, env = "DRONE_REPO_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "DRONE_REPO_NAME")]
    pub name: Option<String>,

    /// Repository as owner/name (used when --owner/--name are absent)
    #[arg(long, env = "DRONE_REPO", value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Metadata API root [default: https://api.github.com/]
    #[arg(long, env = "PLUGIN_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Upload API root [default: https://uploads.github.com/]
    #[arg(long, env = "PLUGIN_UPLOAD_URL", value_name = "URL")]
    pub upload_url: Option<String>,

    /// API access token
    #[arg(long, env = "PLUGIN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fallback access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, hide = true)]
    pub github_token: Option<String>,

    /// Glob patterns of files to upload (repeatable; comma separated in env)
    #[arg(long, env = "PLUGIN_FILES", value_delimiter = ',', value_name = "PATTERN")]
    pub files: Vec<String>,

    /// Suppress progress output (errors are still shown)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the triggering event is a tag push
    pub fn is_tag_event(&self) -> bool {
        self.event.as_deref() == Some(TAG_EVENT)
    }

    /// First non-empty token among --api-key and GITHUB_TOKEN
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .or_else(|| self.github_token.as_deref().filter(|k| !k.is_empty()))
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
        }
    }

    /// Runtime configuration that only reports errors
    pub fn quiet() -> Self {
        Self::new(true)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet)
    }
}

impl RuntimeConfig {
    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print informational message
    pub fn info_println(&self, message: &str) {
        let _ = self.output.info(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Print an indented success line (for per-item progress)
    pub fn success_indent(&self, message: &str) {
        let _ = self.output.success_indent(message);
    }
}
