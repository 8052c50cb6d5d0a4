//! Inbound adapters translating operator input into provisioning runs.

pub mod cli;
