//! Session management: identity gate, pool, handles, and lifecycle.

pub mod authenticator;
pub mod handle;
pub mod manager;
pub mod pool;

pub use authenticator::{IdentityGate, SessionIdentity};
pub use handle::ConnectionHandle;
pub use manager::{ConnectionManager, PublishOutcome, Session};
