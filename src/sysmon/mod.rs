//! System monitoring layer
//!
//! This module handles everything read from the host system:
//! - One-shot environment detection (hostname, user, kernel, directories)
//! - Live process listing for the monitor tab

pub mod detect;
pub mod procs;

pub use detect::{detect_system, SystemInfo};
pub use procs::list_processes;
