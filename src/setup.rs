//! The ordered setup steps.
//!
//! Privileges, model resolution, installation, config initialization, config
//! reconciliation, smoke test. Each step is skippable on its own pre-check
//! and announces what it did; the first failure aborts the whole run.

use std::io::{stdin, stdout};

use crate::cli::Args;
use crate::error::{Result, SetupError};
use crate::install;
use crate::ollama::{self, ModelChoice, OllamaClient};
use crate::runner;
use crate::sgptrc::{self, ApplyOutcome, Settings};
use crate::user::{self, RealUser};

/// Run the full setup sequence.
pub async fn run(args: &Args) -> Result<()> {
    if !user::is_root().await {
        return Err(SetupError::NotRoot);
    }

    let real_user = RealUser::from_env();
    let model = resolve_model(args).await?;
    println!("\nUsing model: {}", model.display);

    ensure_installed().await?;
    ensure_config_exists(&real_user).await?;
    ensure_config_applied(&real_user, args, &model)?;

    println!("Testing sgpt with a sample prompt...");
    runner::run_sgpt(&real_user, "\"Hello, how are you?\"").await
}

/// Take the model from the flag, or query the server and ask.
async fn resolve_model(args: &Args) -> Result<ModelChoice> {
    match &args.model {
        Some(display) => ollama::parse_model_flag(display),
        None => {
            println!("Fetching available models from {}...", args.ip);
            let choices = OllamaClient::new(&args.ip, args.port).list_models().await?;
            let selected = ollama::select_model(&choices, stdin().lock(), stdout().lock())?;
            selected.ok_or_else(|| {
                SetupError::from(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "input closed during model selection",
                ))
            })
        }
    }
}

async fn ensure_installed() -> Result<()> {
    if install::is_installed().await {
        println!("shell-gpt with litellm support is already installed. Skipping installation.");
        return Ok(());
    }
    println!("shell-gpt with litellm support not found. Installing...");
    install::install().await
}

/// Create the config file by running sgpt once, if it does not exist yet.
async fn ensure_config_exists(real_user: &RealUser) -> Result<()> {
    let path = sgptrc::sgptrc_path(&real_user.home);
    if path.exists() {
        println!("Config file already exists. Skipping initialization.");
        return Ok(());
    }
    println!("Config file not found. Initializing sgpt to generate it...");
    println!("Please enter a placeholder API key when prompted (e.g., 'testkey' or any gibberish):");
    runner::run_sgpt(real_user, "test").await?;
    println!("sgpt initialized successfully.");
    Ok(())
}

fn ensure_config_applied(real_user: &RealUser, args: &Args, model: &ModelChoice) -> Result<()> {
    let path = sgptrc::sgptrc_path(&real_user.home);
    let settings = Settings::new(&args.ip, args.port, &model.display);

    if sgptrc::is_satisfied(&path, &settings) {
        println!("Config file is already properly configured. Skipping modification.");
        return Ok(());
    }

    println!("Updating config file with new settings...");
    match sgptrc::apply(&path, &settings)? {
        ApplyOutcome::Updated => println!("Updated {} successfully.", path.display()),
        ApplyOutcome::NoMatchingKeys => println!("No changes were made to the config file."),
    }
    Ok(())
}
