//! Domain event dispatch: formatting, persistence, and realtime push.

pub mod dispatcher;
pub mod formatter;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use formatter::{Audience, NoticeDraft, NotificationFormatter};
