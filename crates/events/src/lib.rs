//! Alert delivery for the Armis site monitor.
//!
//! - [`Notifier`] -- the capability every delivery channel implements.
//! - [`delivery`] -- SMTP email and JSON webhook channels.
//! - [`AlertDispatcher`] -- fans alerts out to the configured notifiers with a
//!   bounded timeout, off the request path.

pub mod delivery;
pub mod dispatcher;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailNotifier};
pub use delivery::webhook::{WebhookConfig, WebhookNotifier};
pub use dispatcher::{AlertDispatcher, DispatchOutcome, DispatchReport};
pub use notifier::{NotifyError, Notifier};
