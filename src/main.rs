//! Kodegen Release Sync - publish CI artifacts to the GitHub release of a tag.
//!
//! Exits 0 on success and on non-tag events, 1 on any fatal error.

use kodegen_release_sync::cli;
use kodegen_release_sync::cli::RuntimeConfig;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = RuntimeConfig::default();
            output.error_println(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
