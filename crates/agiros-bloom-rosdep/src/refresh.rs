//! Refreshing the external rosdep data and asking whether to do so

use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, RosdepError};

/// Brings the external rosdep data up to date
pub trait DataRefresher {
    fn refresh(&self) -> Result<()>;
}

/// Runs an external command such as `agirosdep update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRefresher {
    program: String,
    args: Vec<String>,
}

impl CommandRefresher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Build from a command line split into words; the first word is the program
    pub fn from_command_line(words: &[String]) -> Result<Self> {
        let (program, args) = words
            .split_first()
            .ok_or_else(|| RosdepError::refresh_failed("refresh command is empty"))?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }
}

impl Default for CommandRefresher {
    fn default() -> Self {
        Self::new("agirosdep", vec!["update".to_string()])
    }
}

impl DataRefresher for CommandRefresher {
    fn refresh(&self) -> Result<()> {
        info!("Refreshing rosdep data: {} {}", self.program, self.args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        debug!("Running refresh command: {cmd:?}");

        let output = cmd.output().map_err(|e| {
            RosdepError::refresh_failed(format!("failed to execute {}: {e}", self.program))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RosdepError::refresh_failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Refresher that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresh;

impl DataRefresher for NoRefresh {
    fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

/// Decides whether a failed key is retried after a refresh
pub trait RetryPrompt {
    fn confirm_retry(&self, key: &str, error: &RosdepError) -> bool;
}

impl<F> RetryPrompt for F
where
    F: Fn(&str, &RosdepError) -> bool,
{
    fn confirm_retry(&self, key: &str, error: &RosdepError) -> bool {
        self(key, error)
    }
}

/// Prompt that always declines
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl RetryPrompt for NonInteractive {
    fn confirm_retry(&self, _key: &str, _error: &RosdepError) -> bool {
        false
    }
}
