//! Helpers for running the linkerd SMI integration tests against a live cluster.
pub mod cli;
pub mod command;
pub mod k8s;
pub mod logging;
pub mod retry;
pub mod test_helper;

pub use crate::retry::{retry_for, RetryPolicy};
pub use crate::test_helper::{init_or_exit, LinkerdError, TestHelper};
