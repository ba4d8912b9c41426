//! Integration tests module
//!
//! End-to-end updates against a local HTTP origin, plus CLI behaviour.

pub mod cli;
pub mod common;
pub mod update;
