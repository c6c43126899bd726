//! Workflows.
//!
//! This module contains **async orchestration logic only**: it sequences
//! ops calls and owns the policy for partial failure. It must NOT talk to
//! the chain seam directly.

pub mod bootstrap;
