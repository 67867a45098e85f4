//! Dispatch types

use std::time::Duration;

use shared::LabelId;

use super::gateway::GatewayError;

/// Default delay between consecutive sends
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Dispatch tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Minimum delay between two consecutive sends
    pub pacing: Duration,
    /// Upper bound on a single send; `None` waits for the gateway forever
    pub send_timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            send_timeout: None,
        }
    }
}

/// Where a batch currently is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    ResolvingDevice,
    /// Sending label `index` of `total`
    Printing { index: usize, total: usize },
    Succeeded { printed: usize },
    PartialFailure { failed_index: usize, printed: usize },
    FatalFailure,
}

/// State plus the human-readable status line shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchStatus {
    pub state: DispatchState,
    pub message: String,
}

/// Terminal result of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Every label was sent
    Succeeded { printed: usize },

    /// Labels `0..failed_index` were sent, `failed_index..total` never were
    PartialFailure {
        printed: usize,
        total: usize,
        failed_index: usize,
        failed_label: LabelId,
        error: GatewayError,
    },

    /// Device resolution failed; nothing was sent
    FatalFailure { error: GatewayError },
}

impl PrintOutcome {
    /// Number of labels confirmed sent
    pub fn printed(&self) -> usize {
        match self {
            PrintOutcome::Succeeded { printed } => *printed,
            PrintOutcome::PartialFailure { printed, .. } => *printed,
            PrintOutcome::FatalFailure { .. } => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PrintOutcome::Succeeded { .. })
    }

    /// Terminal status line
    pub fn status_message(&self) -> String {
        match self {
            PrintOutcome::Succeeded { printed } => {
                format!("Successfully printed {} label(s)!", printed)
            }
            PrintOutcome::PartialFailure {
                printed,
                total,
                failed_index,
                error,
                ..
            } => format!(
                "Error: label {} of {} failed ({} printed): {}",
                failed_index + 1,
                total,
                printed,
                error
            ),
            PrintOutcome::FatalFailure { error } => format!("Error: {}", error),
        }
    }

    /// Re-base indices of an outcome produced for `labels[base..]`
    pub fn shifted(self, base: usize) -> Self {
        match self {
            PrintOutcome::Succeeded { printed } => PrintOutcome::Succeeded {
                printed: printed + base,
            },
            PrintOutcome::PartialFailure {
                printed,
                total,
                failed_index,
                failed_label,
                error,
            } => PrintOutcome::PartialFailure {
                printed: printed + base,
                total: total + base,
                failed_index: failed_index + base,
                failed_label,
                error,
            },
            fatal @ PrintOutcome::FatalFailure { .. } => fatal,
        }
    }
}

impl From<&PrintOutcome> for DispatchState {
    fn from(outcome: &PrintOutcome) -> Self {
        match outcome {
            PrintOutcome::Succeeded { printed } => DispatchState::Succeeded { printed: *printed },
            PrintOutcome::PartialFailure {
                printed,
                failed_index,
                ..
            } => DispatchState::PartialFailure {
                failed_index: *failed_index,
                printed: *printed,
            },
            PrintOutcome::FatalFailure { .. } => DispatchState::FatalFailure,
        }
    }
}
