//! HTTP client for the Wurstmineberg API.
//!
//! Fetches the people roster and world statuses as JSON. Every request is a
//! single attempt; retrying is left to the caller's schedule.

pub mod client;

pub use client::{Client, Error, WorldSource};
