use std::path::Path;

use super::input::read_text_file;
use crate::app::api;
use crate::domain::{AppError, MarkerKind};

pub fn run_markers(file: &Path) -> Result<(), AppError> {
    let counters = api::scan_markers(&read_text_file(file)?);
    let source = MarkerKind::SourceContext.label();
    let prompt = MarkerKind::Prompt.label();
    println!("{}: {}", source, counters.last_source_index);
    println!("{}: {}", prompt, counters.last_prompt_index);
    println!(
        "Next: {} {}, {} {}",
        source,
        counters.next_source_index(),
        prompt,
        counters.next_prompt_index()
    );
    Ok(())
}
