use std::path::PathBuf;

/// Errors that abort the setup sequence.
///
/// Every variant is fatal: `main` prints the message and exits with code 1.
/// Invalid interactive input is handled inside the selection loop and never
/// surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("this program needs to be run with sudo privileges")]
    NotRoot,

    #[error("model name '{0}' should start with 'ollama/'. Example: ollama/llama3.2:latest")]
    BadModelPrefix(String),

    #[error("unable to fetch models from {url}: {source}")]
    ModelFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no models found on the server")]
    NoModels,

    #[error("config file {} not found. Ensure sgpt was initialized properly", .path.display())]
    ConfigMissing { path: PathBuf },

    #[error("command `{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("sgpt executable not found in PATH: {0}")]
    SgptNotFound(#[from] which::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
