//! Command execution: trigger gate, then one synchronization run.

mod sync;

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;

pub use sync::execute_sync;

/// Execute the workflow for parsed arguments, returning the exit code.
///
/// Non-tag events are a successful no-op and nothing else about the
/// invocation is inspected for them. Fatal errors are returned to the
/// caller, which prints them and exits non-zero.
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);

    if !args.is_tag_event() {
        log::info!(
            "Skipping release sync for event {:?}",
            args.event.as_deref().unwrap_or("<none>")
        );
        config.println("The GitHub Release plugin is only available for tags");
        return Ok(0);
    }

    execute_sync(&args, &config).await?;
    Ok(0)
}
