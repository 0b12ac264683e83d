//! Concrete wizards.
//!
//! Each wizard is an ordered list of sections plus the record collection it
//! saves into.

pub mod onboarding;
pub mod recruit;
pub mod visa;

use crate::form::{validators, FieldCell, FieldGroup, ListManager, Section};
use crate::state::WizardError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Specifying the available wizards.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WizardKind {
    Onboarding,
    RecruitSubmission,
}

impl WizardKind {
    /// Fresh sections for a new run.
    ///
    pub fn sections(self) -> Vec<Box<dyn Section>> {
        match self {
            WizardKind::Onboarding => onboarding::sections(),
            WizardKind::RecruitSubmission => recruit::sections(),
        }
    }

    /// Record API collection the wizard saves into.
    ///
    pub fn collection(self) -> &'static str {
        match self {
            WizardKind::Onboarding => onboarding::COLLECTION,
            WizardKind::RecruitSubmission => recruit::COLLECTION,
        }
    }
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardKind::Onboarding => write!(f, "onboarding"),
            WizardKind::RecruitSubmission => write!(f, "recruit"),
        }
    }
}

impl FromStr for WizardKind {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "onboarding" => Ok(WizardKind::Onboarding),
            "recruit" | "recruit-submission" | "submission" => Ok(WizardKind::RecruitSubmission),
            _ => Err(WizardError::UnknownWizard {
                name: s.to_string(),
            }),
        }
    }
}

fn reference_template() -> FieldGroup {
    FieldGroup::new(vec![
        FieldCell::text("name").label("Name").required(),
        FieldCell::text("email")
            .label("Email")
            .required()
            .validate(validators::email()),
        FieldCell::text("phone")
            .label("Phone")
            .required()
            .validate(validators::phone())
            .transform_on_commit(validators::group_phone()),
        FieldCell::text("relationship").label("Relationship"),
    ])
}

/// Professional references shared by both wizards.
///
pub fn references_list(min_items: usize, max_items: Option<usize>) -> ListManager {
    ListManager::initialize(
        "references",
        &[],
        Arc::new(reference_template),
        min_items,
        max_items,
    )
}
