//! Best-effort check for shell-gpt with litellm support, and reinstallation.

use tracing::debug;

use crate::error::Result;
use crate::runner::{self, RunConfig};

const SGPT_PACKAGE: &str = "shell_gpt";
const LITELLM_PACKAGE: &str = "litellm";

/// True iff a `pip freeze` listing names both shell_gpt and litellm.
///
/// Case-insensitive substring match on the raw listing. A heuristic, not a
/// dependency-graph check.
pub fn freeze_lists_required(freeze_output: &str) -> bool {
    let packages = freeze_output.to_lowercase();
    packages.contains(SGPT_PACKAGE) && packages.contains(LITELLM_PACKAGE)
}

/// Query installed packages; any query failure reads as "not installed".
pub async fn is_installed() -> bool {
    match runner::capture_shell("pip freeze").await {
        Ok(out) => freeze_lists_required(&out),
        Err(e) => {
            debug!(error = %e, "pip freeze failed");
            false
        }
    }
}

/// Remove any existing shell-gpt and install the litellm-enabled build.
pub async fn install() -> Result<()> {
    runner::run_shell("pip uninstall shell-gpt -y", RunConfig::new().with_sudo(true)).await?;
    runner::run_shell("pip install shell-gpt[litellm]", RunConfig::new().with_sudo(true)).await
}
