//! User-facing notices.
//!
//! Sync results are reported through a [`Notifier`]; the wizard never waits
//! on it.

use log::*;
use std::sync::Mutex;

/// Severity of a notice.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Fire-and-forget sink for user-facing messages.
///
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Writes notices through the log facade.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Info | NoticeKind::Success => info!("{}", message),
            NoticeKind::Error => error!("{}", message),
        }
    }
}

/// Keeps every notice in memory, in order.
///
#[derive(Debug, Default)]
pub struct BufferedNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        BufferedNotifier::default()
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        match self.notices.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices().iter().filter(|(k, _)| *k == kind).count()
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push((kind, message.to_string()));
        }
    }
}
