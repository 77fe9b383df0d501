//! Authenticated request gateway.
//!
//! The [`Gateway`] sits between API callers and the HTTP transport. It
//! attaches the stored bearer token, notices an expired token from a `401`
//! answer, refreshes it and retries the request once.

mod client;
mod request;

pub use client::Gateway;
pub use request::{Outcome, RequestOptions};
