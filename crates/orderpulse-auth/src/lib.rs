//! # orderpulse-auth
//!
//! Bearer credential handling for OrderPulse. Credentials are HS256 JWTs
//! whose subject is the user id and whose optional `role` claim decides
//! which realtime topics a session may join.
//!
//! Token issuance belongs to the account service; the encoder here exists
//! for tooling and tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
