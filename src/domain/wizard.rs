//! Linear input wizard and the transcript it accumulates.

use std::fmt::Write as _;

use crate::domain::AppError;

/// Wizard position. Steps only move forward, except a failed generation
/// returning to [`WizardStep::ThemeInput`] and [`Wizard::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    ScriptInput = 0,
    TemplateInput = 1,
    ThemeInput = 2,
    Processing = 3,
    ResultAndContinue = 4,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::ScriptInput => "Step 1: Script content",
            WizardStep::TemplateInput => "Step 2: Prompt Visual Image template",
            WizardStep::ThemeInput => "Step 3: Theme",
            WizardStep::Processing => "Generating",
            WizardStep::ResultAndContinue => "Results",
        }
    }

    /// Name of the value collected at this step, if any.
    pub fn input_name(&self) -> Option<&'static str> {
        match self {
            WizardStep::ScriptInput => Some("Script"),
            WizardStep::TemplateInput => Some("Template"),
            WizardStep::ThemeInput => Some("Theme"),
            WizardStep::Processing => None,
            WizardStep::ResultAndContinue => Some("Script chunk"),
        }
    }
}

/// Inputs for the first generation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub theme: String,
    pub script: String,
    pub template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into(), is_error: false }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, content: content.into(), is_error: false }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, content: content.into(), is_error: true }
    }
}

/// Display history of a wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Concatenated successful model replies, the generated prompt list.
    pub fn model_output(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == ChatRole::Model && !m.is_error)
            .map(|m| m.content.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain-text rendering with a header for every message.
    pub fn render(&self, theme: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(theme) = theme {
            let _ = writeln!(out, "# Theme: {}", theme);
        }
        let _ = writeln!(out, "# Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        for message in &self.messages {
            let heading = match (message.role, message.is_error) {
                (ChatRole::User, _) => "[Your next script]",
                (ChatRole::Model, false) => "[Visualizer]",
                (ChatRole::Model, true) => "[Error]",
            };
            let _ = write!(out, "\n{}\n{}\n", heading, message.content.trim_end());
        }
        out
    }
}

/// Step-by-step collection of script, template and theme, followed by
/// continuation turns.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    script: String,
    template: String,
    theme: String,
    transcript: Transcript,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::ScriptInput,
            script: String::new(),
            template: String::new(),
            theme: String::new(),
            transcript: Transcript::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn theme(&self) -> Option<&str> {
        (!self.theme.is_empty()).then_some(self.theme.as_str())
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Accept input for the current input step.
    ///
    /// Returns the generation inputs once the theme is accepted and the wizard
    /// enters [`WizardStep::Processing`].
    pub fn submit(&mut self, input: &str) -> Result<Option<GenerationConfig>, AppError> {
        let name = match self.step {
            WizardStep::ScriptInput | WizardStep::TemplateInput | WizardStep::ThemeInput => {
                self.step.input_name().unwrap_or("Input")
            }
            other => {
                return Err(AppError::Validation(format!(
                    "'{}' does not accept wizard input",
                    other.title()
                )));
            }
        };
        if input.trim().is_empty() {
            return Err(AppError::EmptyInput(name.to_string()));
        }

        match self.step {
            WizardStep::ScriptInput => {
                self.script = input.to_string();
                self.step = WizardStep::TemplateInput;
                Ok(None)
            }
            WizardStep::TemplateInput => {
                self.template = input.to_string();
                self.step = WizardStep::ThemeInput;
                Ok(None)
            }
            _ => {
                self.theme = input.to_string();
                self.step = WizardStep::Processing;
                Ok(Some(GenerationConfig {
                    theme: self.theme.clone(),
                    script: self.script.clone(),
                    template: self.template.clone(),
                }))
            }
        }
    }

    /// First generation returned `text`.
    pub fn generation_succeeded(&mut self, text: impl Into<String>) {
        self.transcript = Transcript::default();
        self.transcript.push(ChatMessage::model(text));
        self.step = WizardStep::ResultAndContinue;
    }

    /// First generation failed; the theme can be entered again.
    pub fn generation_failed(&mut self) {
        self.step = WizardStep::ThemeInput;
    }

    /// Validate and record a continuation chunk as a user message.
    pub fn begin_continuation(&mut self, chunk: &str) -> Result<(), AppError> {
        if self.step != WizardStep::ResultAndContinue {
            return Err(AppError::Validation(
                "Continuation is only available after the first generation".to_string(),
            ));
        }
        if chunk.trim().is_empty() {
            return Err(AppError::EmptyInput("Script chunk".to_string()));
        }
        self.transcript.push(ChatMessage::user(chunk));
        Ok(())
    }

    pub fn continuation_succeeded(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::model(text));
    }

    pub fn continuation_failed(&mut self, message: impl Into<String>) {
        self.transcript.push(ChatMessage::error(message));
    }

    /// Discard all inputs and history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
