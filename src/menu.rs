//! Interactive selection and text prompts.
//!
//! Presents the candidate commands plus the three fixed control actions as a
//! numbered single-choice menu, and handles the confirm/edit and new-task
//! prompts. All prompts take injected reader/writer pairs so the flows are
//! testable with scripted input; an EOF on the reader is reported as `None`
//! and treated by callers as the user bailing out.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::Path;

pub const OPT_GEN_SUGGESTIONS: &str = "Generate new suggestions";
pub const OPT_NEW_COMMAND: &str = "Enter a new command";
pub const OPT_DISMISS: &str = "Dismiss";

/// Outcome of one menu round.
///
/// Closed so the session loop can match it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    /// A concrete suggested command was picked.
    Command(String),
    /// Ask the model again with the same prompt.
    Regenerate,
    /// Replace the prompt with fresh free text.
    NewPrompt,
    /// End the session.
    Dismiss,
}

/// Builds the display labels for a menu round: suggestions first, then the
/// three control actions, always last and always exactly once.
pub fn candidate_labels(commands: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = commands.to_vec();
    labels.push(OPT_GEN_SUGGESTIONS.to_string());
    labels.push(OPT_NEW_COMMAND.to_string());
    labels.push(OPT_DISMISS.to_string());
    labels
}

/// Presents the menu and reads a selection.
///
/// Long labels are wrapped to `width` for display only; the selected command
/// is returned unwrapped. Invalid input re-prompts; EOF yields `None`.
pub fn select_with_io<R: BufRead, W: Write>(
    commands: &[String],
    input: &mut R,
    output: &mut W,
    width: usize,
) -> Result<Option<MenuChoice>> {
    let labels = candidate_labels(commands);

    writeln!(output, "Select a command:")?;
    for (i, label) in labels.iter().enumerate() {
        let numbered = format!("{}. {}", i + 1, label);
        let wrapped = textwrap::fill(
            &numbered,
            textwrap::Options::new(width.max(10)).subsequent_indent("  "),
        );
        writeln!(output, "{}", wrapped)?;
    }

    loop {
        write!(output, "\nChoose an option (1-{}): ", labels.len())?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };

        match line.trim().parse::<usize>() {
            Ok(choice) if choice >= 1 && choice <= labels.len() => {
                let picked = &labels[choice - 1];
                let control_base = labels.len() - 3;
                return Ok(Some(match choice - 1 {
                    i if i == control_base => MenuChoice::Regenerate,
                    i if i == control_base + 1 => MenuChoice::NewPrompt,
                    i if i == control_base + 2 => MenuChoice::Dismiss,
                    _ => MenuChoice::Command(picked.clone()),
                }));
            }
            _ => {
                writeln!(
                    output,
                    "Invalid choice. Please enter a number between 1 and {}.",
                    labels.len()
                )?;
            }
        }
    }
}

/// Confirm/edit prompt for the selected command.
///
/// Blank input keeps the suggested command; any other input replaces it.
/// EOF yields `None`.
pub fn confirm_with_io<R: BufRead, W: Write>(
    command: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    write!(output, "Confirm [{}]: ", command)?;
    output.flush()?;

    let Some(line) = read_line(input)? else {
        return Ok(None);
    };

    let edited = line.trim();
    if edited.is_empty() {
        Ok(Some(command.to_string()))
    } else {
        Ok(Some(edited.to_string()))
    }
}

/// Reads the next free-text task.
///
/// In context mode the current working directory is displayed first, so the
/// user sees where the next command will run. EOF yields `None`.
pub fn read_new_prompt_with_io<R: BufRead, W: Write>(
    cwd: Option<&Path>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    if let Some(cwd) = cwd {
        writeln!(output, ">>> {}", cwd.display())?;
    }
    write!(output, "New command: ")?;
    output.flush()?;

    match read_line(input)? {
        Some(line) => Ok(Some(line.trim().to_string())),
        None => Ok(None),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
