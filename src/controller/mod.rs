mod alignment_controller;
mod alignment_error;
mod location;
mod notifier;
mod query_tracker;
mod signal;
#[cfg(test)]
mod tests;

pub use alignment_controller::AlignmentController;
pub use alignment_error::AlignmentError;
pub use location::{LocationError, LocationFix, LocationProvider, StaticLocation};
pub use notifier::{LogNotifier, Notifier};
pub use query_tracker::QueryTracker;
pub use signal::ControllerEvent;
