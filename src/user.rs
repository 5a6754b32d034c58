//! Resolution of the real invoking user when running under sudo.
//!
//! sudo re-executes the process as root but exposes the original login via
//! `SUDO_USER`. The config file lives under that user's home, not root's, so
//! every path decision goes through [`RealUser`].

use std::path::PathBuf;

use crate::runner;

/// The human user who invoked the tool, resolved through sudo if necessary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealUser {
    /// Login name, if one could be determined.
    pub name: Option<String>,
    /// Home directory of that user.
    pub home: PathBuf,
}

impl RealUser {
    /// Resolve from the ambient environment.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var("SUDO_USER").ok(),
            std::env::var("USER").ok(),
            dirs::home_dir(),
        )
    }

    /// Pure resolution from explicit inputs, so tests never touch the
    /// process environment.
    ///
    /// With `SUDO_USER` present the home is that user's directory. Without it
    /// we degrade to the current process's own user and home.
    pub fn resolve(
        sudo_user: Option<String>,
        user: Option<String>,
        process_home: Option<PathBuf>,
    ) -> Self {
        match sudo_user {
            Some(name) if !name.is_empty() => {
                let home = home_for(&name);
                Self {
                    name: Some(name),
                    home,
                }
            }
            _ => Self {
                name: user.filter(|u| !u.is_empty()),
                home: process_home.unwrap_or_else(|| PathBuf::from("/")),
            },
        }
    }
}

/// Conventional home directory for a login name.
fn home_for(name: &str) -> PathBuf {
    if name == "root" {
        PathBuf::from("/root")
    } else {
        PathBuf::from("/home").join(name)
    }
}

/// Whether the process is running with root privileges.
///
/// Shells out to `id -u` rather than linking libc for a single syscall; a
/// failed query reads as "not root".
pub async fn is_root() -> bool {
    match runner::capture_shell("id -u").await {
        Ok(out) => out.trim() == "0",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sudo_user_wins_over_process_identity() {
        let user = RealUser::resolve(
            Some("alice".to_string()),
            Some("root".to_string()),
            Some(PathBuf::from("/root")),
        );
        assert_eq!(user.name.as_deref(), Some("alice"));
        assert_eq!(user.home, PathBuf::from("/home/alice"));
    }

    #[test]
    fn test_no_sudo_falls_back_to_process_user_and_home() {
        let user = RealUser::resolve(
            None,
            Some("bob".to_string()),
            Some(PathBuf::from("/home/bob")),
        );
        assert_eq!(user.name.as_deref(), Some("bob"));
        assert_eq!(user.home, PathBuf::from("/home/bob"));
    }

    #[test]
    fn test_empty_sudo_user_treated_as_absent() {
        let user = RealUser::resolve(
            Some(String::new()),
            Some("bob".to_string()),
            Some(PathBuf::from("/home/bob")),
        );
        assert_eq!(user.name.as_deref(), Some("bob"));
        assert_eq!(user.home, PathBuf::from("/home/bob"));
    }

    #[test]
    fn test_sudo_from_root_shell() {
        let user = RealUser::resolve(Some("root".to_string()), None, None);
        assert_eq!(user.home, PathBuf::from("/root"));
    }

    #[test]
    fn test_nothing_known_degrades_gracefully() {
        let user = RealUser::resolve(None, None, None);
        assert!(user.name.is_none());
        assert_eq!(user.home, PathBuf::from("/"));
    }

    #[tokio::test]
    async fn test_is_root_does_not_panic() {
        // Result depends on the environment running the tests; only the
        // query itself is exercised here.
        let _ = is_root().await;
    }
}
