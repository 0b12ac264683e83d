use crate::api::{Record, RecordApiError, RecordSync};
use crate::notify::{NoticeKind, Notifier};
use crate::state::{PendingSubmit, SubmitOutcome, SubmitStart, WizardError, WizardState};
use anyhow::Result;
use log::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Specify different network event types.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SubmitSection,
    OpenRecord,
}

/// Specify struct for managing wizard state with network events.
///
/// The state lock is never held across a sync call, so fields stay editable
/// while a submit is pending.
#[derive(Clone)]
pub struct Handler {
    state: Arc<Mutex<WizardState>>,
    sync: Arc<dyn RecordSync>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(
        state: Arc<Mutex<WizardState>>,
        sync: Arc<dyn RecordSync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Handler {
            state,
            sync,
            notifier,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound every sync call by the given duration.
    ///
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::SubmitSection => {
                self.submit_current_section().await?;
            }
            Event::OpenRecord => {
                self.open_record().await?;
            }
        }
        Ok(())
    }

    async fn bounded<F>(&self, call: F) -> Result<Record, RecordApiError>
    where
        F: Future<Output = Result<Record, RecordApiError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RecordApiError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// Validate the active section and sync it.
    ///
    /// Returns `WizardError::Busy` without touching the record API when a
    /// submit is already in flight. The sync runs in its own task, so the
    /// wizard settles even when the caller stops waiting for it.
    pub async fn submit_current_section(&self) -> Result<SubmitOutcome, WizardError> {
        let pending = {
            let mut state = self.state.lock().await;
            match state.begin_submit()? {
                SubmitStart::Invalid { focus } => {
                    warn!(
                        "Section {} is invalid, first error at {:?}.",
                        state.current_index(),
                        focus
                    );
                    return Ok(SubmitOutcome::Invalid { focus });
                }
                SubmitStart::Pending(pending) => pending,
            }
        };

        let generation = pending.generation();
        let handler = self.clone();
        let task = tokio::spawn(async move { handler.sync_section(pending).await });
        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Section sync task did not finish: {}", e);
                self.state.lock().await.abandon_submit(generation);
                let message = e.to_string();
                self.notifier.notify(
                    &format!("Could not save section: {}", message),
                    NoticeKind::Error,
                );
                Ok(SubmitOutcome::Failed { message })
            }
        }
    }

    async fn sync_section(&self, pending: PendingSubmit) -> SubmitOutcome {
        info!("Saving section '{}'...", pending.section());
        let result = match pending.record_id() {
            Some(id) => {
                self.bounded(self.sync.update_record(id, pending.payload()))
                    .await
            }
            None => self.bounded(self.sync.create_record(pending.payload())).await,
        };
        if let Err(e) = &result {
            error!("Failed to save section '{}': {}", pending.section(), e);
        }

        let section = pending.section().to_string();
        let outcome = {
            let mut state = self.state.lock().await;
            state.complete_submit(pending, result)
        };
        match &outcome {
            SubmitOutcome::Advanced { index } => {
                info!("Saved section '{}', moving to section {}.", section, index);
                self.notifier
                    .notify(&format!("Saved {}", section), NoticeKind::Success);
            }
            SubmitOutcome::Completed => {
                info!("Saved final section '{}', wizard complete.", section);
                self.notifier
                    .notify("Submission complete", NoticeKind::Success);
            }
            SubmitOutcome::Failed { message } => {
                self.notifier.notify(
                    &format!("Could not save {}: {}", section, message),
                    NoticeKind::Error,
                );
            }
            SubmitOutcome::Discarded | SubmitOutcome::Invalid { .. } => {}
        }
        outcome
    }

    /// Fetch the saved record once and seed every section from it.
    ///
    /// Returns whether a record was loaded.
    pub async fn open_record(&self) -> Result<bool, RecordApiError> {
        let ticket = {
            let state = self.state.lock().await;
            state.begin_fetch()
        };
        let ticket = match ticket {
            Some(ticket) => ticket,
            None => {
                debug!("Skipping record fetch, nothing to load.");
                return Ok(false);
            }
        };
        info!("Fetching record {}...", ticket.id);
        match self.bounded(self.sync.fetch_record_by_id(&ticket.id)).await {
            Ok(record) => {
                let mut state = self.state.lock().await;
                let loaded = state.complete_fetch(ticket, record);
                if loaded {
                    info!("Loaded record into {} sections.", state.len());
                }
                Ok(loaded)
            }
            Err(e) => {
                error!("Failed to fetch record {}: {}", ticket.id, e);
                self.notifier
                    .notify(&format!("Could not load record: {}", e), NoticeKind::Error);
                Err(e)
            }
        }
    }
}
