use crate::api::{Record, RecordApi, RecordSync};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::network::Handler as NetworkEventHandler;
use crate::notify::{LogNotifier, Notifier};
use crate::state::{SubmitOutcome, WizardState};
use crate::wizards::WizardKind;
use log::*;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Answers keyed by section name, each a map of field or list name to value.
///
pub type Answers = HashMap<String, Map<String, Value>>;

/// Read a YAML answers file.
///
pub fn load_answers(path: &Path) -> AppResult<Answers> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| AppError::Answers(e.to_string()))
}

/// Oversees a wizard run: state, network event handling and replay of
/// answers section by section.
///
pub struct App {
    kind: WizardKind,
    state: Arc<Mutex<WizardState>>,
    handler: NetworkEventHandler,
}

impl App {
    /// Start a wizard run against the configured record API and replay the
    /// given answers. Returns the saved record.
    ///
    pub async fn start(
        config: Config,
        kind: WizardKind,
        record_id: Option<&str>,
        answers: Answers,
    ) -> AppResult<Record> {
        info!("Starting {} wizard...", kind);
        let api = RecordApi::new(
            &config.api_base_url,
            config.access_token.as_deref(),
            kind.collection(),
        )?;
        let app = App::new(
            kind,
            record_id,
            Arc::new(api),
            Arc::new(LogNotifier),
            config.sync_timeout(),
        );
        let record = app.replay(&answers).await?;
        info!("Exiting application...");
        Ok(record)
    }

    pub fn new(
        kind: WizardKind,
        record_id: Option<&str>,
        sync: Arc<dyn RecordSync>,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> Self {
        let state = Arc::new(Mutex::new(WizardState::new(kind.sections(), record_id)));
        let handler =
            NetworkEventHandler::new(Arc::clone(&state), sync, notifier).with_timeout(timeout);
        App {
            kind,
            state,
            handler,
        }
    }

    pub fn state(&self) -> &Arc<Mutex<WizardState>> {
        &self.state
    }

    /// Load the saved record when editing one and switch to edit mode.
    ///
    async fn prepare(&self) -> AppResult<()> {
        let is_existing = self.state.lock().await.get_record().id.is_some();
        if !is_existing {
            return Ok(());
        }
        self.handler
            .open_record()
            .await
            .map_err(AppError::RecordApi)?;
        let mut state = self.state.lock().await;
        if !state.is_edit_mode() {
            state.toggle_edit_mode()?;
        }
        Ok(())
    }

    /// Apply each section's answers and submit it until the wizard closes.
    ///
    /// Sections without answers are submitted with whatever they hold, which
    /// for a saved record is the fetched data.
    pub async fn replay(&self, answers: &Answers) -> AppResult<Record> {
        self.prepare().await?;
        for name in answers.keys() {
            if self.state.lock().await.form(name).is_err() {
                warn!("Skipping answers for unknown section '{}' in {} wizard.", name, self.kind);
            }
        }

        loop {
            let section = {
                let mut state = self.state.lock().await;
                if state.is_closed() {
                    break;
                }
                let name = match state.current_section() {
                    Some(section) => section.name().to_string(),
                    None => return Err(AppError::Other("Wizard has no sections".to_string())),
                };
                if let Some(section_answers) = answers.get(&name) {
                    debug!("Applying {} answers to section '{}'...", section_answers.len(), name);
                    state.form_mut(&name)?.apply_answers(section_answers)?;
                }
                if let Ok(form) = state.form(&name) {
                    info!("Submitting {} section...", form.title());
                }
                name
            };

            match self.handler.submit_current_section().await? {
                SubmitOutcome::Advanced { .. } | SubmitOutcome::Completed => {}
                SubmitOutcome::Invalid { .. } => {
                    let state = self.state.lock().await;
                    let errors = state
                        .form(&section)
                        .map(|f| f.error_summary())
                        .unwrap_or_default();
                    return Err(AppError::SectionInvalid { section, errors });
                }
                SubmitOutcome::Failed { message } => {
                    return Err(AppError::SyncFailed { section, message });
                }
                SubmitOutcome::Discarded => {
                    return Err(AppError::Other("Wizard was restarted during replay".to_string()));
                }
            }
        }

        let state = self.state.lock().await;
        info!(
            "Completed {} wizard for record {}.",
            self.kind,
            state.get_record().id.as_deref().unwrap_or("<unsaved>")
        );
        Ok(state.get_record().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{BufferedNotifier, NoticeKind};
    use fake::uuid::UUIDv4;
    use fake::Fake;
    use httpmock::MockServer;
    use serde_json::json;
    use uuid::Uuid;

    const RECRUIT_ANSWERS: &str = r#"
candidate:
  full_name: Jane Doe
  email: jane@example.com
  phone: "5551234567"
  experience_years: 6.7
  primary_skills: Rust
visa:
  visa_status: Green Card
engagement:
  client: Acme
  job_title: Platform Engineer
  rate: 95
  rate_type: hourly
references:
  references:
    - name: Ann Smith
      email: ann@example.com
      phone: "555-222-3333"
    - name: Bob Jones
      email: bob@example.com
      phone: "(555) 444-5555"
"#;

    fn answers(yaml: &str) -> Answers {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[tokio::test]
    async fn replay_recruit_submission() {
        let server = MockServer::start();
        let create = server
            .mock_async(|when, then| {
                when.method("POST").path("/submissions/");
                then.status(201).json_body(json!({ "data": { "id": "sub-1" } }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method("PUT").path("/submissions/sub-1");
                then.status(200).json_body(json!({ "data": { "id": "sub-1" } }));
            })
            .await;
        let api = RecordApi::new(&server.base_url(), None, "submissions").unwrap();
        let notifier = Arc::new(BufferedNotifier::new());
        let app = App::new(
            WizardKind::RecruitSubmission,
            None,
            Arc::new(api),
            notifier.clone(),
            Duration::from_secs(5),
        );
        let record = app.replay(&answers(RECRUIT_ANSWERS)).await.unwrap();

        create.assert_hits_async(1).await;
        update.assert_hits_async(3).await;
        assert_eq!(record.id.as_deref(), Some("sub-1"));
        assert!(record.complete);
        assert_eq!(record.fields["experience_years"], json!(7.0));
        assert_eq!(record.fields["references"][1]["phone"], json!("555-444-5555"));
        assert!(!record.fields.contains_key("visa_expiry"));
        assert_eq!(notifier.count(NoticeKind::Success), 4);
    }

    #[tokio::test]
    async fn replay_stops_on_invalid_section() {
        let server = MockServer::start();
        let create = server
            .mock_async(|when, then| {
                when.method("POST").path("/submissions/");
                then.status(201).json_body(json!({ "data": { "id": "sub-2" } }));
            })
            .await;

        let api = RecordApi::new(&server.base_url(), None, "submissions").unwrap();
        let app = App::new(
            WizardKind::RecruitSubmission,
            None,
            Arc::new(api),
            Arc::new(BufferedNotifier::new()),
            Duration::from_secs(5),
        );
        let result = app
            .replay(&answers("candidate:\n  full_name: Jane Doe\n  email: not-an-email\n"))
            .await;

        create.assert_hits_async(0).await;
        match result {
            Err(AppError::SectionInvalid { section, errors }) => {
                assert_eq!(section, "candidate");
                assert!(errors.contains("Email: "));
                assert!(errors.contains("Phone: "));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(app.state().lock().await.current_index(), 0);
    }

    #[tokio::test]
    async fn replay_existing_record_loads_then_updates() {
        let token: Uuid = UUIDv4.fake();
        let server = MockServer::start();
        let fetch = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/submissions/sub-3")
                    .header("Authorization", &format!("Bearer {}", &token));
                then.status(200).json_body(json!({
                    "data": {
                        "id": "sub-3",
                        "full_name": "Jane Doe",
                        "email": "jane@example.com",
                        "phone": "555-123-4567",
                        "experience_years": 4,
                        "primary_skills": "Go",
                        "visa_status": "US Citizen",
                        "client": "Acme",
                        "job_title": "SRE",
                        "rate": 120000,
                        "rate_type": "annual",
                        "references": [
                            { "name": "Ann", "email": "ann@example.com", "phone": "5552223333" },
                            { "name": "Bob", "email": "bob@example.com", "phone": "5554445555" }
                        ]
                    }
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method("PUT").path("/submissions/sub-3");
                then.status(200).json_body(json!({ "data": { "id": "sub-3" } }));
            })
            .await;

        let api =
            RecordApi::new(&server.base_url(), Some(&token.to_string()), "submissions").unwrap();
        let app = App::new(
            WizardKind::RecruitSubmission,
            Some("sub-3"),
            Arc::new(api),
            Arc::new(BufferedNotifier::new()),
            Duration::from_secs(5),
        );
        let record = app
            .replay(&answers("engagement:\n  rate: 125000\n"))
            .await
            .unwrap();

        fetch.assert_hits_async(1).await;
        update.assert_hits_async(4).await;
        assert_eq!(record.fields["rate"], json!(125000.0));
        assert!(record.complete);
    }

    #[tokio::test]
    async fn replay_reports_sync_failure() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/onboarding/");
                then.status(503).body("maintenance");
            })
            .await;

        let api = RecordApi::new(&server.base_url(), None, "onboarding").unwrap();
        let app = App::new(
            WizardKind::Onboarding,
            None,
            Arc::new(api),
            Arc::new(BufferedNotifier::new()),
            Duration::from_secs(5),
        );
        let result = app
            .replay(&answers(
                "personal:\n  first_name: Jane\n  last_name: Doe\n  \
                 email: jane@example.com\n  phone: '5551234567'\n",
            ))
            .await;
        match result {
            Err(AppError::SyncFailed { section, message }) => {
                assert_eq!(section, "personal");
                assert!(message.contains("503"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn load_answers_rejects_bad_yaml() {
        let id: Uuid = UUIDv4.fake();
        let path = std::env::temp_dir().join(format!("answers-{}.yml", id));
        fs::write(&path, "candidate: [unclosed").unwrap();
        assert!(matches!(load_answers(&path), Err(AppError::Answers(_))));
        let _ = fs::remove_file(&path);
    }
}
