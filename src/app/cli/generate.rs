use std::fs;
use std::path::{Path, PathBuf};

use super::input::read_text_file;
use crate::app::api;
use crate::domain::{AppError, GenerationConfig};

pub struct GenerateArgs {
    pub script: PathBuf,
    pub template: PathBuf,
    pub theme: String,
    pub next: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

pub fn run_generate(config: Option<&Path>, mock: bool, args: GenerateArgs) -> Result<(), AppError> {
    let inputs = GenerationConfig {
        theme: non_blank("Theme", args.theme)?,
        script: non_blank("Script", read_text_file(&args.script)?)?,
        template: non_blank("Template", read_text_file(&args.template)?)?,
    };
    let chunks = args
        .next
        .iter()
        .map(|path| read_text_file(path).and_then(|text| non_blank("Script chunk", text)))
        .collect::<Result<Vec<_>, _>>()?;

    let config = api::load_configuration(config)?;
    let mut controller = api::controller(&config, mock)?;
    let outcome = api::generate(&mut controller, &inputs, &chunks)?;

    println!("{}", outcome.transcript.model_output());

    if let Some(path) = args.output {
        fs::write(&path, outcome.transcript.render(Some(&inputs.theme)))?;
        eprintln!("✅ Saved transcript to {}", path.display());
    }
    eprintln!(
        "Last Source Context: {}, last Prompt: {}",
        outcome.counters.last_source_index, outcome.counters.last_prompt_index
    );
    Ok(())
}

fn non_blank(name: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::EmptyInput(name.to_string()));
    }
    Ok(value)
}
