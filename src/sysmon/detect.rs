//! Host environment detection
//!
//! Collected once at startup and displayed on the Status tab.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Information about the detected host environment
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub hostname: String,
    pub username: String,
    pub os: &'static str,
    pub kernel: Option<String>,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

/// Detect the host environment
pub fn detect_system(config_dir: PathBuf, data_dir: PathBuf) -> Result<SystemInfo> {
    Ok(SystemInfo {
        hostname: get_hostname()?,
        username: get_username()?,
        os: env::consts::OS,
        kernel: get_kernel_release(),
        config_dir,
        data_dir,
    })
}

/// Get the system hostname
fn get_hostname() -> Result<String> {
    // Try /etc/hostname first
    if let Ok(hostname) = std::fs::read_to_string("/etc/hostname") {
        let hostname = hostname.trim().to_string();
        if !hostname.is_empty() {
            return Ok(hostname);
        }
    }

    // Fallback to hostname command
    let output = std::process::Command::new("hostname")
        .output()
        .context("Failed to get hostname")?;

    let hostname = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if hostname.is_empty() {
        Ok("unknown".to_string())
    } else {
        Ok(hostname)
    }
}

/// Get the current username
fn get_username() -> Result<String> {
    env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .context("Could not determine username from USER or LOGNAME environment variable")
}

/// Kernel release string, if uname is available
fn get_kernel_release() -> Option<String> {
    let output = std::process::Command::new("uname").arg("-r").output().ok()?;

    if !output.status.success() {
        return None;
    }

    let release = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if release.is_empty() {
        None
    } else {
        Some(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_username() {
        // This should work in most environments
        let result = get_username();
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }

    #[test]
    fn test_detect_system_populates_dirs() {
        let info = detect_system(PathBuf::from("/tmp/cfg"), PathBuf::from("/tmp/data")).unwrap();
        assert_eq!(info.config_dir, PathBuf::from("/tmp/cfg"));
        assert_eq!(info.data_dir, PathBuf::from("/tmp/data"));
        assert!(!info.hostname.is_empty());
    }
}
