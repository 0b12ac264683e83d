//! Wizard state management module.
//!
//! This module contains the state driving a multi-section wizard, including:
//! - `WizardState` holding the sections, the active index and the record
//! - Navigation types (phase, mode and submit outcomes)
//! - State error handling

mod error;
mod navigation;
mod wizard;

pub use error::WizardError;
pub use navigation::{SubmitOutcome, WizardMode, WizardPhase};
pub use wizard::{FetchTicket, PendingSubmit, SubmitStart, WizardState};
