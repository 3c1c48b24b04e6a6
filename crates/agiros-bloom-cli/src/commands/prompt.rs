//! Interactive refresh confirmation

use agiros_bloom_rosdep::{NonInteractive, RetryPrompt, RosdepError};
use dialoguer::Confirm;
use tracing::warn;

/// Asks on the terminal whether to refresh the rosdep data and retry
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl RetryPrompt for TerminalPrompt {
    fn confirm_retry(&self, key: &str, error: &RosdepError) -> bool {
        eprintln!("{error}");
        let answer = Confirm::new()
            .with_prompt(format!("Update the rosdep data and try resolving '{key}' again?"))
            .default(false)
            .interact();

        match answer {
            Ok(confirmed) => confirmed,
            Err(e) => {
                warn!("Could not read confirmation: {e}");
                false
            }
        }
    }
}

pub fn retry_prompt(interactive: bool) -> Box<dyn RetryPrompt> {
    if interactive {
        Box::new(TerminalPrompt)
    } else {
        Box::new(NonInteractive)
    }
}
