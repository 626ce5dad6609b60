//! Human-readable description of the host system for the model prompt.
//!
//! The generated shell commands run on this machine, so the system prompt
//! tells the model what it is targeting: OS name, kernel release and, on
//! Linux, the distribution from `/etc/os-release`.

use std::fs;
use std::process::Command;

/// Builds the platform sentence embedded in the system prompt.
///
/// Missing pieces (no `/etc/os-release`, `uname` unavailable) degrade to a
/// shorter sentence instead of failing.
pub fn description() -> String {
    let os = pretty_os_name(std::env::consts::OS);
    let release = kernel_release().unwrap_or_default();

    let distro = if std::env::consts::OS == "linux" {
        fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release(&content))
    } else {
        None
    };

    match distro {
        Some((id, version)) => format!(
            "The system the shell command will be executed on is {} {}, running {} version {}.",
            os, release, id, version
        ),
        None => format!(
            "The system the shell command will be executed on is {} {}.",
            os, release
        ),
    }
}

fn pretty_os_name(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        other => other,
    }
}

fn kernel_release() -> Option<String> {
    let output = Command::new("uname").arg("-r").output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Extracts `ID` and `VERSION_ID` from os-release file content.
fn parse_os_release(content: &str) -> Option<(String, String)> {
    let mut id = None;
    let mut version_id = None;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            id = Some(unquote(value));
        } else if let Some(value) = line.strip_prefix("VERSION_ID=") {
            version_id = Some(unquote(value));
        }
    }

    Some((id?, version_id?))
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_os_release_quoted_values() {
        let content = "NAME=\"Ubuntu\"\nID=\"ubuntu\"\nVERSION_ID=\"22.04\"\n";
        assert_eq!(
            parse_os_release(content),
            Some(("ubuntu".to_string(), "22.04".to_string()))
        );
    }

    #[test]
    fn test_parse_os_release_unquoted_values() {
        let content = "ID=fedora\nVERSION_ID=39\nPRETTY_NAME=\"Fedora Linux 39\"\n";
        assert_eq!(
            parse_os_release(content),
            Some(("fedora".to_string(), "39".to_string()))
        );
    }

    #[test]
    fn test_parse_os_release_missing_version_yields_none() {
        let content = "ID=arch\nPRETTY_NAME=\"Arch Linux\"\n";
        assert_eq!(parse_os_release(content), None);
    }

    #[test]
    fn test_description_mentions_execution_target() {
        let text = description();
        assert!(text.starts_with("The system the shell command will be executed on is"));
    }
}
