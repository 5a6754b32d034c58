//! sgptfix - setup shell-gpt (sgpt) with an Ollama server.
//!
//! Installs shell-gpt with litellm support, initializes its config file if
//! needed, and reconciles the four managed `.sgptrc` settings against the
//! server given on the command line.

pub mod cli;
pub mod error;
pub mod install;
pub mod ollama;
pub mod runner;
pub mod setup;
pub mod sgptrc;
pub mod user;
