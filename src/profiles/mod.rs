//! Profile storage layer
//!
//! This module handles all interactions with on-disk configuration profiles:
//! - Listing and parsing profile files
//! - Switching the active profile (marker + rendered settings)
//! - Profile validation
//! - Usage event logging

pub mod store;
pub mod usage;

pub use store::{ProfileStore, SwitchOutcome, ValidationIssue};
pub use usage::{append_event, load_events};
