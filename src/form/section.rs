//! Wizard sections.
//!
//! The orchestrator only ever talks to a section through the [`Section`]
//! trait. [`FormSection`] is the standard implementation composed of a field
//! group, any number of list managers and an optional conditional rule set.

use super::error::FormError;
use super::field::FieldValue;
use super::group::FieldGroup;
use super::list::ListManager;
use super::rules::{Requirement, Requirements, RuleSet};
use super::ValidationResult;
use log::*;
use serde_json::{Map, Value};

/// One step of a wizard.
///
pub trait Section: Send {
    fn name(&self) -> &str;

    /// Validate the section and assemble its payload. Reveals errors on
    /// failure; never navigates and never performs I/O.
    fn submit(&mut self) -> ValidationResult;

    /// Seed default values from a saved record.
    fn load(&mut self, record: &Map<String, Value>);

    /// Current validity without revealing errors.
    fn is_valid(&self) -> bool;

    fn force_validate(&mut self);

    /// Access to the concrete form, for callers that edit fields.
    fn form_mut(&mut self) -> Option<&mut FormSection> {
        None
    }

    fn form(&self) -> Option<&FormSection> {
        None
    }
}

/// A section built from cells, lists and rules.
///
#[derive(Debug, Clone)]
pub struct FormSection {
    name: String,
    title: String,
    pub fields: FieldGroup,
    lists: Vec<ListManager>,
    rules: Option<RuleSet>,
    focus: Option<String>,
}

impl FormSection {
    pub fn new(name: &str, title: &str) -> Self {
        FormSection {
            name: name.to_string(),
            title: title.to_string(),
            fields: FieldGroup::default(),
            lists: vec![],
            rules: None,
            focus: None,
        }
    }

    pub fn field(mut self, cell: super::field::FieldCell) -> Self {
        self.fields.push(cell);
        self
    }

    pub fn list(mut self, list: ListManager) -> Self {
        self.lists.push(list);
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lists(&self) -> &[ListManager] {
        &self.lists
    }

    pub fn get_list(&self, name: &str) -> Option<&ListManager> {
        self.lists.iter().find(|l| l.name() == name)
    }

    pub fn list_mut(&mut self, name: &str) -> Result<&mut ListManager, FormError> {
        self.lists
            .iter_mut()
            .find(|l| l.name() == name)
            .ok_or_else(|| FormError::UnknownList {
                name: name.to_string(),
            })
    }

    /// Field the user should be sent to after a failed submit.
    ///
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Requirements decided by the rule set for the live trigger value.
    ///
    pub fn requirements(&self) -> Requirements {
        match &self.rules {
            Some(rules) => {
                let trigger = self
                    .fields
                    .get(rules.trigger())
                    .map(|c| c.value().clone())
                    .unwrap_or_default();
                rules.evaluate(&trigger)
            }
            None => Requirements::default(),
        }
    }

    fn list_requirement(list: &ListManager, requirements: &Requirements) -> Requirement {
        requirements.get_or(list.name(), Requirement::Required)
    }

    /// Whether a field or list should be shown at all.
    ///
    pub fn is_visible(&self, name: &str) -> bool {
        self.requirements().get(name) != Some(Requirement::Hidden)
    }

    /// Change a field's raw value.
    ///
    /// Changing the trigger field to a different visa status resets every
    /// rule target so no stale answer survives under the new rules.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let value = value.into();
        let is_trigger = self.rules.as_ref().map(|r| r.trigger() == name).unwrap_or(false);
        let cell = self.fields.cell_mut(name)?;
        let changed =
            is_trigger && RuleSet::status_of(cell.value()) != RuleSet::status_of(&value);
        cell.on_change(value);
        if changed {
            self.reset_rule_targets();
        }
        Ok(())
    }

    /// Commit (blur) a field.
    ///
    pub fn commit(&mut self, name: &str) -> Result<(), FormError> {
        self.fields.cell_mut(name)?.on_commit();
        Ok(())
    }

    /// Set and commit a field in one step.
    ///
    pub fn enter(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        self.set_value(name, value)?;
        self.commit(name)
    }

    fn reset_rule_targets(&mut self) {
        let targets: Vec<String> = match &self.rules {
            Some(rules) => rules.targets().iter().map(|t| t.to_string()).collect(),
            None => return,
        };
        debug!(
            "Trigger changed in section '{}', resetting {} dependent entries...",
            self.name,
            targets.len()
        );
        for target in targets.iter() {
            if let Some(cell) = self.fields.get_mut(target) {
                cell.reset();
            } else if let Some(list) = self.lists.iter_mut().find(|l| l.name() == target.as_str()) {
                list.reset();
            }
        }
    }

    /// Apply a map of answers as user input: the trigger first, then every
    /// other field, then lists (replacing their items). Unknown keys are
    /// skipped with a warning.
    pub fn apply_answers(&mut self, answers: &Map<String, Value>) -> Result<(), FormError> {
        if let Some(trigger) = self.rules.as_ref().map(|r| r.trigger().to_string()) {
            if let Some(value) = answers.get(&trigger) {
                self.enter(&trigger, FieldValue::from(value))?;
            }
        }
        let trigger = self.rules.as_ref().map(|r| r.trigger().to_string());
        for (key, value) in answers.iter() {
            if Some(key) == trigger.as_ref() {
                continue;
            }
            if self.fields.get(key).is_some() {
                self.enter(key, FieldValue::from(value))?;
            } else if self.get_list(key).is_some() {
                let list = self.list_mut(key)?;
                let items: Vec<Map<String, Value>> = value
                    .as_array()
                    .map(|a| a.iter().filter_map(|v| v.as_object().cloned()).collect())
                    .unwrap_or_default();
                list.reset();
                let ids: Vec<u64> = list.items().iter().map(|i| i.id()).collect();
                for id in ids {
                    list.remove_item(id)?;
                }
                for answer in items.iter() {
                    let id = list.add_item()?;
                    let item = list.item_mut(id)?;
                    for (field, value) in answer.iter() {
                        item.fields.enter(field, FieldValue::from(value))?;
                    }
                }
            } else {
                warn!("Skipping unknown answer '{}' for section '{}'.", key, self.name);
            }
        }
        Ok(())
    }

    /// Every error the user can currently see, as `(path, message)`.
    ///
    /// List errors use `list[index].field` paths.
    pub fn visible_errors(&self) -> Vec<(String, String)> {
        let requirements = self.requirements();
        let mut errors = self.fields.visible_errors(&requirements);
        for list in self.lists.iter() {
            if Self::list_requirement(list, &requirements) == Requirement::Hidden {
                continue;
            }
            for (id, field, message) in list.visible_errors() {
                let index = list.items().iter().position(|i| i.id() == id).unwrap_or(0);
                errors.push((format!("{}[{}].{}", list.name(), index, field), message));
            }
            if Self::list_requirement(list, &requirements) == Requirement::Required
                && list.len() < list.min_items()
            {
                errors.push((
                    list.name().to_string(),
                    format!("Add at least {} entries", list.min_items()),
                ));
            }
        }
        errors
    }

    /// Visible errors as one line of `Label: message` entries.
    ///
    pub fn error_summary(&self) -> String {
        self.visible_errors()
            .iter()
            .map(|(path, message)| format!("{}: {}", self.label_for(path), message))
            .collect::<Vec<String>>()
            .join("; ")
    }

    /// Label of a field or list path as reported by `visible_errors`.
    ///
    fn label_for(&self, path: &str) -> String {
        if let Some(cell) = self.fields.get(path) {
            return cell.get_label().to_string();
        }
        let entry = path.split_once('[').and_then(|(list, rest)| {
            let (index, field) = rest.split_once("].")?;
            Some((list, index.parse::<usize>().ok()?, field))
        });
        match entry {
            Some((list, index, field)) => self
                .get_list(list)
                .and_then(|l| l.items().get(index))
                .and_then(|i| i.fields.get(field))
                .map(|c| format!("{} #{} {}", list.replace('_', " "), index + 1, c.get_label()))
                .unwrap_or_else(|| path.to_string()),
            None => path.replace('_', " "),
        }
    }

    fn first_error(&self, requirements: &Requirements) -> Option<String> {
        if let Some(field) = self.fields.first_error(requirements) {
            return Some(field);
        }
        self.lists
            .iter()
            .find(|l| !l.is_valid(Self::list_requirement(l, requirements)))
            .map(|l| l.name().to_string())
    }
}

impl Section for FormSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn submit(&mut self) -> ValidationResult {
        let requirements = self.requirements();
        let fields = self.fields.submit(&requirements);
        let mut is_section_valid = fields.is_section_valid;
        let mut item = fields.item;
        for list in self.lists.iter_mut() {
            let requirement = Self::list_requirement(list, &requirements);
            if requirement == Requirement::Hidden {
                continue;
            }
            let result = list.submit_as(requirement);
            is_section_valid &= result.is_section_valid;
            item.insert(
                list.name().to_string(),
                Value::Array(result.list_items.into_iter().map(Value::Object).collect()),
            );
        }
        if is_section_valid {
            self.focus = None;
        } else {
            self.force_validate();
            self.focus = self.first_error(&requirements);
            debug!(
                "Section '{}' is invalid, focusing {:?}.",
                self.name, self.focus
            );
        }
        ValidationResult {
            is_section_valid,
            item,
        }
    }

    fn load(&mut self, record: &Map<String, Value>) {
        self.fields.load(record);
        for list in self.lists.iter_mut() {
            if let Some(saved) = record.get(list.name()).and_then(|v| v.as_array()) {
                let saved: Vec<Map<String, Value>> =
                    saved.iter().filter_map(|v| v.as_object().cloned()).collect();
                list.load(&saved);
            }
        }
    }

    fn is_valid(&self) -> bool {
        let requirements = self.requirements();
        self.fields.is_valid(&requirements)
            && self
                .lists
                .iter()
                .all(|l| l.is_valid(Self::list_requirement(l, &requirements)))
    }

    fn force_validate(&mut self) {
        let requirements = self.requirements();
        self.fields.force_validate(&requirements);
        for list in self.lists.iter_mut() {
            if Self::list_requirement(list, &requirements) != Requirement::Hidden {
                list.force_validations();
            }
        }
    }

    fn form_mut(&mut self) -> Option<&mut FormSection> {
        Some(self)
    }

    fn form(&self) -> Option<&FormSection> {
        Some(self)
    }
}
