//! The suggestion/selection/execution loop.
//!
//! One `Session` drives repeated rounds of: generate candidate commands for
//! the current prompt, present them in the menu, then act on the choice. In
//! plain mode a confirmed command runs once with inherited stdio and the
//! session ends. In context mode the session keeps going: captured output is
//! fed into the context buffer, `cd` changes the process working directory,
//! editors run uncaptured, and the user is asked for the next task.

use crate::config::Config;
use crate::context::ContextBuffer;
use crate::executor::{self, CommandRunner, ShellRunner};
use crate::llm::{ChatClient, SuggestionEngine};
use crate::menu::{self, MenuChoice};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::warn;

const WARNING_COLOR: &str = "\x1b[93m";
const RESET_COLOR: &str = "\x1b[0m";

/// What the session should do after a command was handled.
enum Flow {
    /// Plain mode: the single command ran, the session is done.
    Finished,
    /// Context mode: ask for the next task and keep looping.
    Continue,
}

pub struct Session {
    engine: SuggestionEngine,
    context: ContextBuffer,
    prompt: String,
    context_mode: bool,
    skip_confirm: bool,
    suggestion_count: usize,
}

impl Session {
    pub fn new(client: Box<dyn ChatClient>, prompt: String, config: &Config) -> Self {
        Self {
            engine: SuggestionEngine::new(client),
            context: ContextBuffer::new(),
            prompt,
            context_mode: config.context_mode,
            skip_confirm: config.skip_confirm,
            suggestion_count: config.suggestion_count.max(1),
        }
    }

    /// Runs the loop against the real shell and terminal.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        let width = textwrap::termwidth();
        self.run_with_io(&ShellRunner, &mut input, &mut output, width)
            .await
    }

    /// Runs the loop with injected runner and I/O (for testing).
    ///
    /// Returns `Ok(())` on every user-driven exit: dismissal, a finished
    /// plain-mode execution, or EOF at any prompt. Only failures the loop
    /// cannot recover from (chat API errors, broken terminal I/O) bubble up.
    pub async fn run_with_io<R: BufRead, W: Write>(
        &mut self,
        runner: &dyn CommandRunner,
        input: &mut R,
        output: &mut W,
        width: usize,
    ) -> Result<()> {
        if self.context_mode {
            writeln!(
                output,
                "{}WARNING{} Context mode: command outputs will be sent to the model provider, be careful with sensitive data...\n",
                WARNING_COLOR, RESET_COLOR
            )?;
            writeln!(output, ">>> {}", std::env::current_dir()?.display())?;
        }

        loop {
            let commands = self
                .engine
                .generate(
                    &self.prompt,
                    self.context.get_context(),
                    self.suggestion_count,
                )
                .await?;

            let Some(choice) = menu::select_with_io(&commands, input, output, width)? else {
                return exit_notice(output);
            };

            match choice {
                MenuChoice::Dismiss => return Ok(()),
                MenuChoice::Regenerate => continue,
                MenuChoice::NewPrompt => {
                    let Some(prompt) = menu::read_new_prompt_with_io(None, input, output)? else {
                        return exit_notice(output);
                    };
                    self.prompt = prompt;
                }
                MenuChoice::Command(selected) => {
                    let command = if self.skip_confirm {
                        selected
                    } else {
                        let Some(confirmed) = menu::confirm_with_io(&selected, input, output)?
                        else {
                            return exit_notice(output);
                        };
                        confirmed
                    };

                    match self.execute(&command, runner, output) {
                        Ok(Flow::Finished) => return Ok(()),
                        Ok(Flow::Continue) => {
                            let cwd = std::env::current_dir()?;
                            let Some(prompt) =
                                menu::read_new_prompt_with_io(Some(&cwd), input, output)?
                            else {
                                return exit_notice(output);
                            };
                            self.prompt = prompt;
                        }
                        Err(e) => {
                            // Execution failures never kill the loop; the
                            // round restarts with the unchanged prompt.
                            warn!("Command execution failed: {}", e);
                            writeln!(
                                output,
                                "{}Error{} executing command: {}",
                                WARNING_COLOR, RESET_COLOR, e
                            )?;
                        }
                    }
                }
            }
        }
    }

    fn execute<W: Write>(
        &mut self,
        command: &str,
        runner: &dyn CommandRunner,
        output: &mut W,
    ) -> Result<Flow> {
        if !self.context_mode {
            executor::run_streaming_checked(runner, command)?;
            return Ok(Flow::Finished);
        }

        if executor::is_editor_command(command) {
            // Capturing would corrupt the editor UI, so nothing is added to
            // the context buffer either.
            executor::run_streaming_checked(runner, command)?;
        } else if let Some(target) = executor::parse_change_dir(command) {
            std::env::set_current_dir(&target)?;
        } else {
            let captured = executor::run_captured_checked(runner, command)?;
            if !captured.is_empty() {
                writeln!(output, "\n{}", captured)?;
            }
            self.context.add_chunk(&captured);
        }

        Ok(Flow::Continue)
    }
}

fn exit_notice<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output, "Exiting...")?;
    Ok(())
}
