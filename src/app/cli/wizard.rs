use std::fs;
use std::path::Path;

use super::input::{Entry, prompt_line, prompt_text};
use crate::app::api;
use crate::app::session_controller::SessionController;
use crate::domain::{AppError, Wizard, WizardStep};
use crate::ports::ChatService;

const RESET_COMMAND: &str = ":reset";
const SAVE_COMMAND: &str = ":save";

fn step_instruction(step: WizardStep) -> &'static str {
    match step {
        WizardStep::ScriptInput => {
            "Paste your script content (without a title), enter @path to import a file, or press Enter to open your editor."
        }
        WizardStep::TemplateInput => {
            "Got the script. Now provide the \"Prompt Visual Image\" template (@path imports a file)."
        }
        WizardStep::ThemeInput => {
            "Got the script and the template. What theme should replace YYYYYYYYYY in [Theme: YYYYYYYYYY]?"
        }
        WizardStep::Processing | WizardStep::ResultAndContinue => "",
    }
}

pub fn run_wizard(config: Option<&Path>, mock: bool, output: Option<&Path>) -> Result<(), AppError> {
    let config = api::load_configuration(config)?;
    let mut controller = api::controller(&config, mock)?;
    let mut wizard = Wizard::new();

    loop {
        let step = wizard.step();
        match step {
            WizardStep::ScriptInput | WizardStep::TemplateInput | WizardStep::ThemeInput => {
                println!("\n{}", step.title());
                println!("{}", step_instruction(step));

                let entry = if step != WizardStep::ThemeInput {
                    recover(prompt_text(step.input_name().unwrap_or("Input"), true))?
                } else {
                    Some(match prompt_line("Theme", false)? {
                        Entry::Text(value) => Some(value),
                        Entry::Blank => Some(String::new()),
                        Entry::Cancelled => None,
                    })
                };
                let Some(entry) = entry else {
                    continue;
                };
                let Some(input) = entry else {
                    return Ok(());
                };

                let Some(generation) = recover(wizard.submit(&input))? else {
                    continue;
                };

                if let Some(generation) = generation {
                    println!("⏳ Generating Source Context and Prompts...");
                    match controller.start(&generation.theme, &generation.script, &generation.template)
                    {
                        Ok(text) => {
                            println!("\n{}", text);
                            wizard.generation_succeeded(text);
                        }
                        Err(e @ AppError::Configuration(_)) => return Err(e),
                        Err(e) => {
                            eprintln!("❌ Generation failed: {}", e);
                            eprintln!("Check your API key or try again.");
                            wizard.generation_failed();
                        }
                    }
                }
            }
            WizardStep::Processing => wizard.generation_failed(),
            WizardStep::ResultAndContinue => {
                if let Some(theme) = wizard.theme() {
                    println!("\n[Theme: {}]", theme);
                }
                let prompt = format!(
                    "Next script chunk (@path, {}, {} <file>, Enter to finish)",
                    RESET_COMMAND, SAVE_COMMAND
                );
                let Some(entry) = recover(prompt_line(&prompt, true))? else {
                    continue;
                };
                let chunk = match entry {
                    Entry::Text(value) => value,
                    Entry::Blank | Entry::Cancelled => break,
                };

                recover(handle_chunk(&mut controller, &mut wizard, &chunk))?;
            }
        }
    }

    if let Some(path) = output {
        save_transcript(&wizard, path)?;
    }
    Ok(())
}

/// Report input errors the user can correct and keep the wizard running.
///
/// Only terminal and prompt failures end the wizard.
fn recover<T>(result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e @ (AppError::Io(_) | AppError::EmptyInput(_))) => {
            println!("⚠️  {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Apply one entry of the result step: a command or a new script chunk.
fn handle_chunk<S: ChatService>(
    controller: &mut SessionController<S>,
    wizard: &mut Wizard,
    chunk: &str,
) -> Result<(), AppError> {
    let command = chunk.trim();
    if command == RESET_COMMAND {
        controller.reset();
        wizard.reset();
        println!("🔄 Started over");
        return Ok(());
    }
    if let Some(path) = command.strip_prefix(SAVE_COMMAND) {
        return save_transcript(wizard, Path::new(path.trim()));
    }

    wizard.begin_continuation(chunk)?;
    println!("⏳ Continuing...");
    match controller.continue_generation(chunk) {
        Ok(text) => {
            println!("\n{}", text);
            wizard.continuation_succeeded(text);
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            wizard.continuation_failed(format!(
                "Could not generate prompts for this chunk. Try again. ({})",
                e
            ));
        }
    }
    Ok(())
}

fn save_transcript(wizard: &Wizard, path: &Path) -> Result<(), AppError> {
    if path.as_os_str().is_empty() {
        println!("⚠️  Usage: {} <file>", SAVE_COMMAND);
        return Ok(());
    }
    fs::write(path, wizard.transcript().render(wizard.theme()))?;
    println!("✅ Saved transcript to {}", path.display());
    Ok(())
}
