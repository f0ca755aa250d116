use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

use crate::config::AutomationConfig;
use crate::database::models::User;

use super::error::{HomeError, HomeResult};

/// External automation hook behind `GET /start`.
///
/// The configured command line is split on whitespace and spawned detached;
/// the request never waits for it. The triggering user's id is passed in
/// `SMARTHOME_USER_ID`.
#[derive(Debug, Clone, Default)]
pub struct AutomationHook {
    argv: Option<Vec<String>>,
}

impl AutomationHook {
    pub fn from_config(config: &AutomationConfig) -> Self {
        let argv = config
            .hook_command
            .as_deref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|argv| !argv.is_empty());
        Self { argv }
    }

    pub fn is_configured(&self) -> bool {
        self.argv.is_some()
    }

    /// Spawn the hook and return its pid.
    pub fn trigger(&self, user: &User) -> HomeResult<Option<u32>> {
        let Some((program, args)) = self.argv.as_ref().and_then(|argv| argv.split_first()) else {
            return Err(HomeError::HookUnavailable("Automation hook is not configured".to_string()));
        };

        let mut child = Command::new(program)
            .args(args)
            .env("SMARTHOME_USER_ID", user.id.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(HomeError::Hook)?;

        let pid = child.id();
        info!(user_id = user.id, pid, program = %program, "Started automation hook");

        // Reap the child so it does not linger as a zombie
        let user_id = user.id;
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => info!(user_id, "Automation hook finished"),
                Ok(status) => warn!(user_id, %status, "Automation hook exited with failure"),
                Err(e) => warn!(user_id, "Failed to wait on automation hook: {}", e),
            }
        });

        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 9,
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Ada".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn blank_command_means_unconfigured() {
        let hook = AutomationHook::from_config(&AutomationConfig {
            hook_command: Some("   ".to_string()),
        });
        assert!(!hook.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_hook_reports_unavailable() {
        let hook = AutomationHook::from_config(&AutomationConfig::default());
        assert!(matches!(hook.trigger(&user()), Err(HomeError::HookUnavailable(_))));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let hook = AutomationHook::from_config(&AutomationConfig {
            hook_command: Some("/nonexistent/smarthome-hook --flag".to_string()),
        });
        assert!(matches!(hook.trigger(&user()), Err(HomeError::Hook(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn configured_hook_spawns() {
        let hook = AutomationHook::from_config(&AutomationConfig {
            hook_command: Some("true".to_string()),
        });
        assert!(hook.is_configured());
        assert!(hook.trigger(&user()).is_ok());
    }
}
