//! Ordered groups of field cells.
//!
//! A group is the field half of a section and the whole of a list item. It
//! applies externally decided requirements, feeds the aggregator and builds
//! the JSON payload for its visible cells.

use super::error::FormError;
use super::field::{FieldCell, FieldValue};
use super::rules::{Requirement, Requirements};
use super::validity;
use super::ValidationResult;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default)]
pub struct FieldGroup {
    cells: Vec<FieldCell>,
}

impl FieldGroup {
    pub fn new(cells: Vec<FieldCell>) -> Self {
        FieldGroup { cells }
    }

    pub fn push(&mut self, cell: FieldCell) -> &mut Self {
        self.cells.push(cell);
        self
    }

    pub fn cells(&self) -> &[FieldCell] {
        &self.cells
    }

    pub fn get(&self, name: &str) -> Option<&FieldCell> {
        self.cells.iter().find(|c| c.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldCell> {
        self.cells.iter_mut().find(|c| c.name() == name)
    }

    /// Returns the named cell or an `UnknownField` error.
    ///
    pub fn cell_mut(&mut self, name: &str) -> Result<&mut FieldCell, FormError> {
        self.get_mut(name).ok_or_else(|| FormError::UnknownField {
            name: name.to_string(),
        })
    }

    /// Set and commit a value in one step, as a user typing then leaving the
    /// field would.
    pub fn enter(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        self.cell_mut(name)?.on_change(value).on_commit();
        Ok(())
    }

    pub fn requirement_of(cell: &FieldCell, requirements: &Requirements) -> Requirement {
        requirements.get_or(cell.name(), cell.base_requirement())
    }

    /// Cells that are not hidden under the given requirements.
    ///
    pub fn visible<'a>(
        &'a self,
        requirements: &'a Requirements,
    ) -> impl Iterator<Item = (&'a FieldCell, Requirement)> + 'a {
        self.cells
            .iter()
            .map(move |c| (c, Self::requirement_of(c, requirements)))
            .filter(|(_, r)| *r != Requirement::Hidden)
    }

    pub fn is_valid(&self, requirements: &Requirements) -> bool {
        let errors: Vec<Option<String>> = self
            .visible(requirements)
            .map(|(c, r)| c.error_for(r))
            .collect();
        let values: Vec<&FieldValue> = self
            .visible(requirements)
            .filter(|(_, r)| *r == Requirement::Required)
            .map(|(c, _)| c.value())
            .collect();
        validity::is_valid(&errors, &values)
    }

    /// Name of the first visible cell currently in error.
    ///
    pub fn first_error(&self, requirements: &Requirements) -> Option<String> {
        self.visible(requirements)
            .find(|(c, r)| c.error_for(*r).is_some())
            .map(|(c, _)| c.name().to_string())
    }

    /// Errors the user can currently see, as `(field, message)` pairs.
    ///
    pub fn visible_errors(&self, requirements: &Requirements) -> Vec<(String, String)> {
        self.visible(requirements)
            .filter_map(|(c, r)| c.visible_error_for(r).map(|e| (c.name().to_string(), e)))
            .collect()
    }

    pub fn force_validate(&mut self, requirements: &Requirements) {
        for cell in self.cells.iter_mut() {
            if Self::requirement_of(cell, requirements) != Requirement::Hidden {
                cell.force_validate();
            }
        }
    }

    /// Payload of the visible cells.
    ///
    pub fn item(&self, requirements: &Requirements) -> Map<String, Value> {
        self.visible(requirements)
            .map(|(c, _)| (c.name().to_string(), c.value().to_json()))
            .collect()
    }

    /// Validate, revealing errors on failure, and return the payload.
    ///
    pub fn submit(&mut self, requirements: &Requirements) -> ValidationResult {
        let is_section_valid = self.is_valid(requirements);
        if !is_section_valid {
            self.force_validate(requirements);
        }
        ValidationResult {
            is_section_valid,
            item: self.item(requirements),
        }
    }

    /// Seed cells from a saved payload. Keys absent from the payload keep
    /// their current value.
    pub fn load(&mut self, saved: &Map<String, Value>) {
        for cell in self.cells.iter_mut() {
            if let Some(value) = saved.get(cell.name()) {
                cell.set_default(FieldValue::from(value));
            }
        }
    }

    pub fn reset(&mut self, name: &str) -> Result<(), FormError> {
        self.cell_mut(name)?.reset();
        Ok(())
    }
}
