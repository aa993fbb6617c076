//! # Sanduq Support
//!
//! Shared utilities for the Sanduq DI container:
//! - Text rendering for error messages (dependency chains, kind names)

pub mod rendering;
