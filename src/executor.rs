//! Shell command execution.
//!
//! Two execution styles cover the session's needs: streaming (stdio inherited,
//! used in plain mode and for interactive editors) and captured (stdout
//! collected for the context buffer). `cd` is special-cased and performed
//! in-process so the directory change survives for the rest of the session.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};
use tracing::info;

/// Programs whose terminal UI would be corrupted by output capture.
const TEXT_EDITORS: &[&str] = &["vi", "vim", "emacs", "nano", "ed", "micro", "joe", "nvim"];

/// Trait for running shell commands.
///
/// This abstraction enables testing the session loop without spawning real
/// processes.
pub trait CommandRunner: Send + Sync {
    /// Runs a command with inherited stdio and returns its exit status.
    fn run_streaming(&self, command: &str) -> Result<ExitStatus>;

    /// Runs a command capturing its output.
    fn run_captured(&self, command: &str) -> Result<Output>;
}

/// Default runner executing commands through `sh -c`.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run_streaming(&self, command: &str) -> Result<ExitStatus> {
        info!("Executing shell command: {}", command);
        let status = Command::new("sh").arg("-c").arg(command).status()?;
        Ok(status)
    }

    fn run_captured(&self, command: &str) -> Result<Output> {
        info!("Executing shell command with capture: {}", command);
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .output()?;
        Ok(output)
    }
}

/// Returns true when the command invokes a known interactive text editor.
pub fn is_editor_command(command: &str) -> bool {
    match command.split_whitespace().next() {
        Some(program) => TEXT_EDITORS.contains(&program),
        None => false,
    }
}

/// Parses a `cd`-style command into its target directory.
///
/// Returns `None` for anything that is not a plain `cd`. A bare `cd` and a
/// leading `~` both resolve against the user's home directory.
pub fn parse_change_dir(command: &str) -> Option<PathBuf> {
    let mut words = command.split_whitespace();
    if words.next()? != "cd" {
        return None;
    }

    let target = words.collect::<Vec<_>>().join(" ");
    if target.is_empty() || target == "~" {
        return dirs::home_dir();
    }

    if let Some(rest) = target.strip_prefix("~/") {
        return Some(dirs::home_dir()?.join(rest));
    }

    Some(PathBuf::from(target))
}

/// Runs a command with inherited stdio, treating non-zero exit as an error.
pub fn run_streaming_checked(runner: &dyn CommandRunner, command: &str) -> Result<()> {
    let status = runner.run_streaming(command)?;
    if !status.success() {
        return Err(anyhow!("Command exited with status: {}", status));
    }
    Ok(())
}

/// Runs a command capturing stdout, treating non-zero exit as an error.
///
/// On success returns the captured stdout as text.
pub fn run_captured_checked(runner: &dyn CommandRunner, command: &str) -> Result<String> {
    let output = runner.run_captured(command)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.trim().is_empty() {
            return Err(anyhow!("Command exited with status: {}", output.status));
        }
        return Err(anyhow!(
            "Command exited with status: {}: {}",
            output.status,
            stderr.trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    struct MockRunner {
        status_code: i32,
        stdout: &'static str,
        stderr: &'static str,
    }

    impl CommandRunner for MockRunner {
        fn run_streaming(&self, _command: &str) -> Result<ExitStatus> {
            Ok(ExitStatus::from_raw(self.status_code << 8))
        }

        fn run_captured(&self, _command: &str) -> Result<Output> {
            Ok(Output {
                status: ExitStatus::from_raw(self.status_code << 8),
                stdout: self.stdout.as_bytes().to_vec(),
                stderr: self.stderr.as_bytes().to_vec(),
            })
        }
    }

    #[test]
    fn test_is_editor_command_recognizes_editors() {
        assert!(is_editor_command("vim notes.txt"));
        assert!(is_editor_command("nano /etc/hosts"));
        assert!(is_editor_command("nvim"));
        assert!(!is_editor_command("ls -la"));
        assert!(!is_editor_command("vimdiff a b"));
        assert!(!is_editor_command(""));
    }

    #[test]
    fn test_parse_change_dir_plain_path() {
        assert_eq!(
            parse_change_dir("cd subdir"),
            Some(PathBuf::from("subdir"))
        );
        assert_eq!(
            parse_change_dir("cd /tmp/work"),
            Some(PathBuf::from("/tmp/work"))
        );
    }

    #[test]
    fn test_parse_change_dir_non_cd_commands() {
        assert_eq!(parse_change_dir("ls -la"), None);
        assert_eq!(parse_change_dir("cdparanoia"), None);
        assert_eq!(parse_change_dir(""), None);
    }

    #[test]
    fn test_parse_change_dir_expands_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(parse_change_dir("cd ~"), Some(home.clone()));
        assert_eq!(parse_change_dir("cd"), Some(home.clone()));
        assert_eq!(
            parse_change_dir("cd ~/projects"),
            Some(home.join("projects"))
        );
    }

    #[test]
    fn test_run_streaming_checked_success() {
        let runner = MockRunner {
            status_code: 0,
            stdout: "",
            stderr: "",
        };
        assert!(run_streaming_checked(&runner, "true").is_ok());
    }

    #[test]
    fn test_run_streaming_checked_nonzero_exit_is_error() {
        let runner = MockRunner {
            status_code: 2,
            stdout: "",
            stderr: "",
        };
        let err = run_streaming_checked(&runner, "false").unwrap_err();
        assert!(err.to_string().contains("exited with status"));
    }

    #[test]
    fn test_run_captured_checked_returns_stdout() {
        let runner = MockRunner {
            status_code: 0,
            stdout: "total 12\n",
            stderr: "",
        };
        assert_eq!(run_captured_checked(&runner, "ls").unwrap(), "total 12\n");
    }

    #[test]
    fn test_run_captured_checked_failure_includes_stderr() {
        let runner = MockRunner {
            status_code: 1,
            stdout: "",
            stderr: "ls: nope: No such file or directory\n",
        };
        let err = run_captured_checked(&runner, "ls nope").unwrap_err();
        assert!(err.to_string().contains("No such file or directory"));
    }

    #[test]
    fn test_shell_runner_captures_real_output() {
        let runner = ShellRunner;
        let output = run_captured_checked(&runner, "echo captured").unwrap();
        assert_eq!(output, "captured\n");
    }
}
