//! Text acquisition for CLI inputs: pasted text, `@path` imports, or the editor.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use dialoguer::{Editor, Error as DialoguerError, Input};

use crate::domain::AppError;

/// Read a whole file as UTF-8 text.
pub fn read_text_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| {
        AppError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })
}

/// What the user entered at a prompt.
pub enum Entry {
    Text(String),
    Blank,
    Cancelled,
}

/// Prompt for one line; `@path` imports a file when `allow_file` is set.
pub fn prompt_line(prompt: &str, allow_file: bool) -> Result<Entry, AppError> {
    let value = match Input::<String>::new().with_prompt(prompt).allow_empty(true).interact_text() {
        Ok(value) => value,
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => {
            return Ok(Entry::Cancelled);
        }
        Err(err) => return Err(AppError::Validation(format!("Failed to read input: {}", err))),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Entry::Blank);
    }
    if allow_file && let Some(path) = trimmed.strip_prefix('@') {
        return read_text_file(Path::new(path.trim())).map(Entry::Text);
    }
    Ok(Entry::Text(value))
}

/// Open `$EDITOR` for multi-line input. `None` when the editor was closed without saving.
pub fn prompt_editor() -> Result<Option<String>, AppError> {
    Editor::new()
        .edit("")
        .map_err(|err| AppError::Validation(format!("Failed to open editor: {}", err)))
}

/// Prompt for a step value: a line, a file import, or blank to open the editor.
pub fn prompt_text(prompt: &str, allow_file: bool) -> Result<Option<String>, AppError> {
    match prompt_line(prompt, allow_file)? {
        Entry::Text(value) => Ok(Some(value)),
        Entry::Cancelled => Ok(None),
        Entry::Blank => Ok(Some(prompt_editor()?.unwrap_or_default())),
    }
}
