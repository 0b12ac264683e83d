use super::error::WizardError;
use super::navigation::{SubmitOutcome, WizardMode, WizardPhase};
use crate::api::{Record, RecordApiError};
use crate::form::{FormSection, Section};
use log::*;
use serde_json::{Map, Value};

/// Snapshot of a valid section taken when a sync starts.
///
/// The payload is frozen here so edits made while the sync is pending never
/// leak into what gets merged into the record.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    generation: u64,
    index: usize,
    section: String,
    record_id: Option<String>,
    payload: Map<String, Value>,
    is_final: bool,
}

impl PendingSubmit {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Id to update, or `None` when the record must be created.
    ///
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// First half of a submit: either the section rejected its values or a sync
/// must be performed.
///
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    Invalid { focus: Option<String> },
    Pending(PendingSubmit),
}

/// Ticket for loading a saved record, tied to the generation it was issued in.
///
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub id: String,
    generation: u64,
}

/// Houses data representative of one wizard run.
///
pub struct WizardState {
    sections: Vec<Box<dyn Section>>,
    current: usize,
    furthest: usize,
    is_edit_mode: bool,
    phase: WizardPhase,
    mode: WizardMode,
    record: Record,
    has_fetched_once: bool,
    generation: u64,
}

impl WizardState {
    /// Start a wizard over the given sections. With a record id the wizard
    /// opens in view mode on the saved record; otherwise it walks a new one.
    ///
    pub fn new(sections: Vec<Box<dyn Section>>, record_id: Option<&str>) -> Self {
        let mut state = WizardState {
            sections: vec![],
            current: 0,
            furthest: 0,
            is_edit_mode: true,
            phase: WizardPhase::Editing,
            mode: WizardMode::New,
            record: Record::default(),
            has_fetched_once: false,
            generation: 0,
        };
        state.restart(sections, record_id);
        state
    }

    /// Replace the sections and begin again. Any sync still in flight is
    /// discarded when it settles.
    ///
    pub fn restart(
        &mut self,
        sections: Vec<Box<dyn Section>>,
        record_id: Option<&str>,
    ) -> &mut Self {
        self.generation += 1;
        self.sections = sections;
        self.current = 0;
        self.furthest = 0;
        self.phase = WizardPhase::Editing;
        self.has_fetched_once = false;
        match record_id {
            Some(id) => {
                self.mode = WizardMode::Existing;
                self.is_edit_mode = false;
                self.record = Record::with_id(id);
            }
            None => {
                self.mode = WizardMode::New;
                self.is_edit_mode = true;
                self.record = Record::default();
            }
        }
        debug!(
            "Wizard started with {} sections in {:?} mode (generation {}).",
            self.sections.len(),
            self.mode,
            self.generation
        );
        self
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Highest section index reached in this run.
    ///
    pub fn furthest_index(&self) -> usize {
        self.furthest
    }

    pub fn is_last_section(&self) -> bool {
        self.current + 1 == self.sections.len()
    }

    pub fn get_phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn get_mode(&self) -> WizardMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        self.is_edit_mode
    }

    pub fn is_closed(&self) -> bool {
        self.phase == WizardPhase::Closed
    }

    pub fn get_record(&self) -> &Record {
        &self.record
    }

    pub fn has_fetched_once(&self) -> bool {
        self.has_fetched_once
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name()).collect()
    }

    pub fn current_section(&self) -> Option<&dyn Section> {
        self.sections.get(self.current).map(|s| &**s)
    }

    /// Editable form of the section with the given name.
    ///
    pub fn form_mut(&mut self, name: &str) -> Result<&mut FormSection, WizardError> {
        self.sections
            .iter_mut()
            .find(|s| s.name() == name)
            .and_then(|s| s.form_mut())
            .ok_or_else(|| WizardError::UnknownSection {
                name: name.to_string(),
            })
    }

    pub fn form(&self, name: &str) -> Result<&FormSection, WizardError> {
        self.sections
            .iter()
            .find(|s| s.name() == name)
            .and_then(|s| s.form())
            .ok_or_else(|| WizardError::UnknownSection {
                name: name.to_string(),
            })
    }

    /// Whether an explicit submit of the active section would pass
    /// validation right now.
    ///
    pub fn can_advance(&self) -> bool {
        self.phase == WizardPhase::Editing
            && self.is_edit_mode
            && self.current_section().map(|s| s.is_valid()).unwrap_or(false)
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        match self.phase {
            WizardPhase::Editing => Ok(()),
            WizardPhase::Submitting => Err(WizardError::Busy),
            WizardPhase::Closed => Err(WizardError::Closed),
        }
    }

    /// Move to the next section without validating.
    ///
    pub fn next(&mut self) -> Result<usize, WizardError> {
        self.ensure_idle()?;
        let target = self.current + 1;
        if target >= self.sections.len() {
            return Err(WizardError::LastSection);
        }
        if self.mode == WizardMode::New && target > self.furthest {
            warn!("Skipping navigation to unreached section {}.", target);
            return Err(WizardError::NotReached { index: target });
        }
        self.current = target;
        Ok(target)
    }

    /// Move to the previous section without validating.
    ///
    pub fn previous(&mut self) -> Result<usize, WizardError> {
        self.ensure_idle()?;
        if self.current == 0 {
            return Err(WizardError::FirstSection);
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// Jump to any earlier section, or to any section of a saved record.
    ///
    pub fn jump_to(&mut self, index: usize) -> Result<usize, WizardError> {
        self.ensure_idle()?;
        if index >= self.sections.len() {
            return Err(WizardError::OutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        if index > self.current && self.mode == WizardMode::New {
            warn!("Rejected forward jump to section {} in a new record.", index);
            return Err(WizardError::ForwardJumpNotAllowed { index });
        }
        self.current = index;
        self.furthest = self.furthest.max(index);
        Ok(index)
    }

    /// Flip between view and edit mode. Only reopened records have a view
    /// mode; a record created in this run stays editable until it closes.
    ///
    pub fn toggle_edit_mode(&mut self) -> Result<bool, WizardError> {
        self.ensure_idle()?;
        if self.record.id.is_none() {
            return Err(WizardError::RecordNotCreated);
        }
        if self.mode == WizardMode::New {
            return Err(WizardError::CreationInProgress);
        }
        self.is_edit_mode = !self.is_edit_mode;
        debug!("Edit mode is now {}.", self.is_edit_mode);
        Ok(self.is_edit_mode)
    }

    /// Validate the active section and, when valid, enter the submitting
    /// phase with a snapshot of its payload.
    ///
    pub fn begin_submit(&mut self) -> Result<SubmitStart, WizardError> {
        self.ensure_idle()?;
        if !self.is_edit_mode {
            warn!("Rejected submit while viewing record.");
            return Err(WizardError::ReadOnly);
        }
        let index = self.current;
        let len = self.sections.len();
        let section = self
            .sections
            .get_mut(index)
            .ok_or(WizardError::OutOfRange { index, len })?;
        let result = section.submit();
        if !result.is_section_valid {
            let focus = section.form().and_then(|f| f.focus()).map(|f| f.to_string());
            return Ok(SubmitStart::Invalid { focus });
        }
        let is_final = index + 1 == len;
        let mut payload = result.item;
        if is_final {
            payload.insert("complete".to_string(), Value::Bool(true));
        }
        let pending = PendingSubmit {
            generation: self.generation,
            index,
            section: section.name().to_string(),
            record_id: self.record.id.clone(),
            payload,
            is_final,
        };
        self.phase = WizardPhase::Submitting;
        Ok(SubmitStart::Pending(pending))
    }

    /// Apply the settled sync for a pending submit.
    ///
    pub fn complete_submit(
        &mut self,
        pending: PendingSubmit,
        result: Result<Record, RecordApiError>,
    ) -> SubmitOutcome {
        if pending.generation != self.generation {
            debug!(
                "Discarding sync result for section '{}' from an earlier run.",
                pending.section
            );
            return SubmitOutcome::Discarded;
        }
        match result {
            Ok(saved) => {
                if self.record.id.is_none() {
                    self.record.id = saved.id;
                }
                self.record.merge(&pending.payload);
                if pending.is_final {
                    self.phase = WizardPhase::Closed;
                    SubmitOutcome::Completed
                } else {
                    self.current = pending.index + 1;
                    self.furthest = self.furthest.max(self.current);
                    self.phase = WizardPhase::Editing;
                    SubmitOutcome::Advanced {
                        index: self.current,
                    }
                }
            }
            Err(e) => {
                self.phase = WizardPhase::Editing;
                SubmitOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Ticket to fetch the saved record, or `None` when there is nothing to
    /// fetch or it was already fetched in this run.
    ///
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        if self.has_fetched_once {
            return None;
        }
        self.record.id.as_ref().map(|id| FetchTicket {
            id: id.clone(),
            generation: self.generation,
        })
    }

    /// Seed every section from the fetched record. Returns false when the
    /// wizard was restarted since the ticket was issued.
    ///
    pub fn complete_fetch(&mut self, ticket: FetchTicket, record: Record) -> bool {
        if ticket.generation != self.generation {
            debug!("Discarding fetched record {} from an earlier run.", ticket.id);
            return false;
        }
        self.load_record(record);
        true
    }

    /// Replace the shared record and seed every section from it.
    ///
    pub fn load_record(&mut self, record: Record) -> &mut Self {
        for section in self.sections.iter_mut() {
            section.load(&record.fields);
        }
        self.record = record;
        self.has_fetched_once = true;
        self
    }

    /// Release a submit whose sync never settled, so the section can be
    /// submitted again. Returns false when the submit belongs to an earlier
    /// run or the wizard is not submitting.
    ///
    pub fn abandon_submit(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != WizardPhase::Submitting {
            return false;
        }
        warn!("Abandoning unsettled submit of section {}.", self.current);
        self.phase = WizardPhase::Editing;
        true
    }
}
