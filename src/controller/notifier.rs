use crate::notice;

/// The user-facing status line. Fire and forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Prints notifications to the console log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) { notice!("{message}"); }
}
