//! Navigation-related state types.
//!
//! This module contains the enums describing where a wizard is in its
//! lifecycle and how it was opened.

/// Specifying the submission phases.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WizardPhase {
    Editing,
    Submitting,
    Closed,
}

/// Specifying how the wizard was opened.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WizardMode {
    New,      // Walking through a fresh record
    Existing, // Reviewing or editing a saved record
}

/// Result of asking the active section to submit.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SubmitOutcome {
    /// Section failed validation; no sync was attempted.
    Invalid { focus: Option<String> },
    /// Saved and moved on to the section at `index`.
    Advanced { index: usize },
    /// Saved the terminal section; the wizard is closed.
    Completed,
    /// Sync failed or timed out; the section stays editable.
    Failed { message: String },
    /// Sync settled after the wizard was restarted.
    Discarded,
}
