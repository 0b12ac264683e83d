//! Form validation engine.
//!
//! This module contains the building blocks shared by every wizard:
//! - Field cells with commit transforms and touch-gated errors
//! - The section validity aggregator
//! - List managers for repeating sub-forms
//! - Conditional requirement rules keyed on visa status
//! - Sections, the unit the orchestrator submits

mod error;
mod field;
mod group;
mod list;
mod rules;
mod section;
pub mod validators;
pub mod validity;

pub use error::FormError;
pub use field::{FieldCell, FieldState, FieldValue, Transform, Validator, REQUIRED_MESSAGE};
pub use group::FieldGroup;
pub use list::{ItemId, ItemTemplate, ListItem, ListManager, ListValidation};
pub use rules::{ConditionalRule, Requirement, Requirements, RuleSet, VisaStatus};
pub use section::{FormSection, Section};

use serde_json::{Map, Value};

/// Outcome of submitting a section or a field group.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_section_valid: bool,
    pub item: Map<String, Value>,
}
