//! Dependency refresh after the package cache changed.
//!
//! Two steps: `clean`, then `fetch` only if `clean` succeeded. Failures are
//! reported in the outcome and never fail the rename.

use std::path::Path;

use serde::Serialize;

use crate::defaults::RefreshSettings;
use crate::error::Error;
use crate::utils::command::{self, StreamedStatus};

/// Result of one refresh step.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshStep {
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StreamedStatus> for RefreshStep {
    fn from(status: StreamedStatus) -> Self {
        Self {
            command: status.command,
            success: status.success,
            exit_code: status.exit_code,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub clean: RefreshStep,
    /// `None` when `clean` failed and the fetch was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch: Option<RefreshStep>,
}

impl RefreshOutcome {
    pub fn succeeded(&self) -> bool {
        self.clean.success && self.fetch.as_ref().is_some_and(|step| step.success)
    }
}

/// Run the clean step, then the fetch step if clean exited successfully.
pub fn run_refresh(root: &Path, settings: &RefreshSettings) -> RefreshOutcome {
    let clean = run_step(root, "clean", &settings.clean);
    if !clean.success {
        log_status!("refresh", "Skipping dependency fetch because '{}' failed", clean.command);
        return RefreshOutcome { clean, fetch: None };
    }

    let fetch = run_step(root, "fetch", &settings.fetch);
    RefreshOutcome {
        clean,
        fetch: Some(fetch),
    }
}

fn run_step(root: &Path, label: &str, argv: &[String]) -> RefreshStep {
    let Some((program, args)) = argv.split_first() else {
        let placeholder = format!("<{}>", label);
        let err = Error::refresh_command_failed(
            &placeholder,
            None,
            Some("no command configured".to_string()),
        );
        log_status!("refresh", "{}", err.message);
        return RefreshStep {
            command: placeholder,
            success: false,
            exit_code: None,
            error: Some(err.message),
        };
    };

    let command_line = command::display_command(program, args);
    log_status!("refresh", "Running {}", command_line);

    match command::run_streaming(root, program, args) {
        Ok(status) => {
            if !status.success {
                let err = Error::refresh_command_failed(&status.command, status.exit_code, None);
                log_status!("refresh", "{}", err.message);
            }
            status.into()
        }
        Err(err) => {
            let err = Error::refresh_command_failed(&command_line, None, Some(err.message));
            log_status!("refresh", "{}", err.message);
            RefreshStep {
                command: command_line,
                success: false,
                exit_code: None,
                error: Some(err.message),
            }
        }
    }
}
