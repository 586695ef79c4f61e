//! # orderpulse-core
//!
//! Core crate for OrderPulse. Contains configuration schemas, typed
//! identifiers, pagination types, the order domain events consumed by the
//! notification dispatcher, and the unified error system.
//!
//! This crate has **no** internal dependencies on other OrderPulse crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
