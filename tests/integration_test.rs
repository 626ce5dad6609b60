use anyhow::Result;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper to run shai with scripted stdin and capture output.
fn run_shai(args: &[&str], stdin: &str) -> Result<std::process::Output> {
    let mut cmd = Command::new("cargo");
    cmd.arg("run");
    cmd.arg("--quiet");
    cmd.arg("--");
    cmd.args(args);

    // Enable mock mode for deterministic testing
    cmd.env("SHAI_USE_MOCK", "1");

    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    child
        .stdin
        .as_mut()
        .expect("child stdin should be piped")
        .write_all(stdin.as_bytes())?;
    let output = child.wait_with_output()?;
    Ok(output)
}

#[test]
fn test_usage_hint_without_prompt() -> Result<()> {
    let output = run_shai(&[], "")?;

    assert!(output.status.success(), "Usage hint path should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Describe what you want to do as a single sentence"),
        "Should print the usage hint. Stdout: {}",
        stdout
    );

    Ok(())
}

#[test]
fn test_menu_shows_deduplicated_suggestion_and_controls() -> Result<()> {
    // The mock client returns the same command for every generation, so the
    // menu must show exactly one suggestion plus the three control options.
    let output = run_shai(&["list", "files"], "4\n")?;

    assert!(output.status.success(), "Dismiss should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1. ls -la"), "Stdout: {}", stdout);
    assert!(stdout.contains("2. Generate new suggestions"));
    assert!(stdout.contains("3. Enter a new command"));
    assert!(stdout.contains("4. Dismiss"));
    assert!(!stdout.contains("5."), "Menu should have exactly 4 entries");

    Ok(())
}

#[test]
fn test_select_and_confirm_executes_command() -> Result<()> {
    // Unknown task -> mock suggests an echo command. Select it and confirm
    // with a blank line; the command output must reach the terminal.
    let output = run_shai(&["say", "hi"], "1\n\n")?;

    assert!(output.status.success(), "Single-shot execution should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Confirm ["), "Should ask for confirmation");
    assert!(
        stdout.contains("hello from shai"),
        "Should execute the suggested command. Stdout: {}",
        stdout
    );

    Ok(())
}

#[test]
fn test_confirm_edit_overrides_suggestion() -> Result<()> {
    let output = run_shai(&["say", "hi"], "1\necho edited-command-ran\n")?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("edited-command-ran"),
        "Edited text should be executed instead of the suggestion. Stdout: {}",
        stdout
    );
    assert!(!stdout.contains("hello from shai"));

    Ok(())
}

#[test]
fn test_regenerate_then_dismiss() -> Result<()> {
    let output = run_shai(&["list", "files"], "2\n4\n")?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Two menu rounds were shown.
    assert_eq!(stdout.matches("Select a command:").count(), 2);

    Ok(())
}

#[test]
fn test_enter_new_command_switches_prompt() -> Result<()> {
    let output = run_shai(&["list", "files"], "3\ncheck disk space\n4\n")?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("New command: "));
    // The second round reflects the replacement prompt.
    assert!(
        stdout.contains("1. df -h"),
        "New prompt should drive new suggestions. Stdout: {}",
        stdout
    );

    Ok(())
}

#[test]
fn test_context_mode_warns_and_shows_cwd() -> Result<()> {
    let output = run_shai(&["--ctx", "list", "files"], "4\n")?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Context mode"),
        "Should warn that outputs leave the machine. Stdout: {}",
        stdout
    );
    assert!(stdout.contains(">>> "), "Should display the working directory");

    Ok(())
}

#[test]
fn test_context_mode_captures_and_continues() -> Result<()> {
    // Execute, see the echoed capture, then get prompted for the next task.
    let output = run_shai(&["--ctx", "say", "hi"], "1\n\n")?;

    assert!(output.status.success(), "EOF at next-task prompt should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hello from shai"), "Stdout: {}", stdout);
    assert!(
        stdout.contains("New command: "),
        "Context mode should ask for the next task after executing"
    );
    assert!(stdout.contains("Exiting..."));

    Ok(())
}

#[test]
fn test_eof_at_menu_exits_cleanly() -> Result<()> {
    let output = run_shai(&["list", "files"], "")?;

    assert!(output.status.success(), "EOF should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Exiting..."));

    Ok(())
}
