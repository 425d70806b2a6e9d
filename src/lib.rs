//! Leakwatch — chat-platform DLP scan worker.
//!
//! Consumes scan tasks from a durable queue, matches message text and
//! attachment text against the remotely managed pattern set, and records
//! every match with the results API.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod queue;
pub mod worker;
