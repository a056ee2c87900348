//! Netherald record types shared by the data layer and its callers.
//!
//! These are resolved records: a `User` may carry its guild and friends as
//! nested records, a `Guild` carries its members. How deep that nesting goes
//! is decided by the loader in netherald-db, never by these types.
pub mod models;

pub use models::{Guild, User};
