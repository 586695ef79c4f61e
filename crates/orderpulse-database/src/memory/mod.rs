//! In-memory repository implementations.
//!
//! State lives only as long as the process. Used by tests and by
//! deployments configured with `storage_backend = "memory"`.

pub mod notification;
pub mod user;

pub use notification::MemoryNotificationRepository;
pub use user::MemoryUserDirectory;
