//! Process listing for the monitor tab
//!
//! Shells out to `ps` and parses its fixed-column output. Rows that do not
//! parse are dropped rather than failing the whole listing.

use crate::types::ProcessInfo;
use anyhow::{Context, Result};
use std::process::Command;

/// List running processes, heaviest (by resident memory) first
///
/// `filter` is a case-insensitive substring match on the command name;
/// an empty filter keeps everything. At most `max_rows` rows are returned.
pub fn list_processes(filter: &str, max_rows: usize) -> Result<Vec<ProcessInfo>> {
    let output = Command::new("ps")
        .args(["-axo", "pid=,rss=,etime=,comm="])
        .output()
        .context("Failed to run ps")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ps failed: {}", stderr);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut processes = parse_ps_output(&stdout, filter);

    processes.sort_by(|a, b| b.rss_kb.cmp(&a.rss_kb).then_with(|| a.pid.cmp(&b.pid)));
    processes.truncate(max_rows);

    Ok(processes)
}

/// Parse `ps -axo pid=,rss=,etime=,comm=` output
fn parse_ps_output(stdout: &str, filter: &str) -> Vec<ProcessInfo> {
    let filter = filter.to_lowercase();
    let mut processes = Vec::new();

    for line in stdout.lines() {
        let Some(process) = parse_ps_line(line) else {
            continue;
        };

        if !filter.is_empty() && !process.command.to_lowercase().contains(&filter) {
            continue;
        }

        processes.push(process);
    }

    processes
}

/// Parse a single ps row: pid, rss (KB), etime, command
///
/// The command is the final field and may contain spaces.
fn parse_ps_line(line: &str) -> Option<ProcessInfo> {
    let mut fields = line.split_whitespace();

    let pid: u32 = fields.next()?.parse().ok()?;
    let rss_kb: u64 = fields.next()?.parse().ok()?;
    let elapsed = fields.next()?.to_string();
    let command = fields.collect::<Vec<_>>().join(" ");

    if command.is_empty() {
        return None;
    }

    Some(ProcessInfo {
        pid,
        rss_kb,
        elapsed,
        command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
    1   1200  10-03:22:11 systemd
  402  81432     02:11:05 confdeck
  511  40960        55:02 sshd: session
  777      0         0:01 kworker/0:1
garbage line without numbers
";

    #[test]
    fn test_parse_ps_output() {
        let processes = parse_ps_output(SAMPLE, "");
        assert_eq!(processes.len(), 4);
        assert_eq!(processes[1].pid, 402);
        assert_eq!(processes[1].rss_kb, 81432);
        assert_eq!(processes[1].elapsed, "02:11:05");
        assert_eq!(processes[2].command, "sshd: session");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let processes = parse_ps_output(SAMPLE, "CONF");
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].command, "confdeck");
    }

    #[test]
    fn test_garbage_lines_are_dropped() {
        let processes = parse_ps_output("no pid here\n", "");
        assert!(processes.is_empty());
    }

    #[test]
    fn test_memory_formatting() {
        let process = parse_ps_line("  402  81432  02:11:05 confdeck").unwrap();
        assert_eq!(process.formatted_memory(), "79.5 MB");
    }
}
