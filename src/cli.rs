use clap::Parser;

/// Setup shell-gpt (sgpt) with an Ollama server.
///
/// Installs shell-gpt with litellm support, initializes its config file if
/// needed, and patches the config to route requests through the server.
/// Requires sudo privileges.
#[derive(Parser, Debug)]
#[command(name = "sgptfix")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// IP address of the Ollama server
    #[arg(short, long)]
    pub ip: String,

    /// Port of the Ollama server
    #[arg(short, long, default_value_t = 11434)]
    pub port: u16,

    /// Specific model to use (format: ollama/<model_name>); omit to pick
    /// interactively from the server's model list
    #[arg(short, long)]
    pub model: Option<String>,
}
