//! Wizard state-specific error types.

use crate::form::FormError;

/// Errors that can occur during wizard navigation and submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    /// A sync is already in flight
    #[error("A submission is already in progress")]
    Busy,

    /// The wizard has been completed
    #[error("Wizard is closed")]
    Closed,

    /// Already on the first section
    #[error("Already on the first section")]
    FirstSection,

    /// Already on the last section
    #[error("Already on the last section")]
    LastSection,

    /// Section index outside the wizard
    #[error("Section index {index} is out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },

    /// Section not reached yet in a new-record flow
    #[error("Section {index} has not been reached yet")]
    NotReached { index: usize },

    /// Jumping ahead is only possible on saved records
    #[error("Cannot jump forward to section {index} in a new record")]
    ForwardJumpNotAllowed { index: usize },

    /// Section with the given name does not exist
    #[error("Unknown section: {name}")]
    UnknownSection { name: String },

    /// No wizard with the given name
    #[error("Unknown wizard '{name}', expected 'onboarding' or 'recruit'")]
    UnknownWizard { name: String },

    /// Submitting is not allowed in view mode
    #[error("Record is open in view mode")]
    ReadOnly,

    /// Edit mode needs a saved record
    #[error("Record has not been created yet")]
    RecordNotCreated,

    /// View mode is only offered once a record is reopened
    #[error("Edit mode cannot be toggled while a new record is being filled in")]
    CreationInProgress,

    /// Field or list misuse
    #[error("Form error: {0}")]
    Form(#[from] FormError),
}
