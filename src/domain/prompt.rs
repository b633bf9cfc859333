//! Request text sent to the chat model.
//!
//! User-supplied text travels as context values, so braces inside a script or
//! template are never evaluated as template syntax.

use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::AppError;
use crate::domain::markers::Counters;

pub const THEME_PLACEHOLDER: &str = "[Theme: YYYYYYYYYY]";
pub const SCRIPT_PLACEHOLDER: &str = "[Paste Script]";

pub const TEMPLATE_START: &str = "--- \"PROMPT VISUAL IMAGE\" TEMPLATE START ---";
pub const TEMPLATE_END: &str = "--- \"PROMPT VISUAL IMAGE\" TEMPLATE END ---";
pub const SCRIPT_START: &str = "--- SCRIPT CONTENT START ---";
pub const SCRIPT_END: &str = "--- SCRIPT CONTENT END ---";
pub const NEW_SCRIPT_START: &str = "--- NEW SCRIPT START ---";
pub const NEW_SCRIPT_END: &str = "--- NEW SCRIPT END ---";

const SYSTEM_INSTRUCTION: &str = "\
You are an expert Visual Prompt Director.
Your task is to take a Video Script and a Visual Prompt Template, and produce output made of \"Source Context\" and \"Prompt\" entries.

CRITICAL RULES:
1. \"Source Context\" MUST be an EXACT VERBATIM EXCERPT from the provided \"Script Content\". Never rephrase, summarize, or invent text that is not in the script.
2. Strictly follow the requested output format.
3. No commentary, no conversational filler, and no Markdown decoration unless the template asks for it.
4. Keep \"Source Context\" and \"Prompt\" numbering continuous across every interaction.
5. If the previous output ended at N, the next entry starts at N+1.
";

const INITIAL_REQUEST: &str = r#"I have a "Prompt Visual Image" template and a "Script Content".

PLEASE PERFORM THE FOLLOWING ACTIONS:
1. Take the {{ theme_placeholder }} section in the template below and replace YYYYYYYYYY with: "{{ theme }}".
2. Take the {{ script_placeholder }} section in the template below and replace it with the "SCRIPT CONTENT" provided below.
3. Generate the output based on the logic inside the "Prompt Visual Image" template.

{{ template_start }}
{{ template }}
{{ template_end }}

{{ script_start }}
{{ script }}
{{ script_end }}

OUTPUT FORMAT REQUIREMENTS:
Source Context:
Source Context 1: [Exact text copy-pasted from Script]
Source Context 2: [Exact text copy-pasted from Script]

Prompt:
Prompt 1: ...
Prompt 2: ...

IMPORTANT: every "Source Context" must be a direct copy-paste from the "SCRIPT CONTENT" above.
(List only the prompts. No commentary, no blank lines between entries.)
"#;

const CONTINUATION_REQUEST: &str = r#"Here is the NEW SCRIPT CONTENT to continue the story:

{{ new_script_start }}
{{ script }}
{{ new_script_end }}

INSTRUCTIONS:
1. Continue generating Source Context and Visual Prompts for this new script section using the previous "Prompt Visual Image" template logic.
2. IMPORTANT: "Source Context" MUST be extracted exactly (copy-paste) from the new script above.
3. IMPORTANT: Verify the numbering.
   - The last Source Context index was likely around {{ last_source }}. The new one MUST start at {{ next_source }}.
   - The last Prompt index was likely around {{ last_prompt }}. The new one MUST start at {{ next_prompt }}.
4. Keep the same strict output format.
"#;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env
    })
}

/// Fixed system instruction for every session.
pub fn system_instruction() -> String {
    SYSTEM_INSTRUCTION.to_string()
}

/// First turn of a session: template, script and theme with the output format rules.
pub fn initial_request(theme: &str, script: &str, template: &str) -> Result<String, AppError> {
    render(
        "initial request",
        INITIAL_REQUEST,
        context! {
            theme => theme,
            script => script,
            template => template,
            theme_placeholder => THEME_PLACEHOLDER,
            script_placeholder => SCRIPT_PLACEHOLDER,
            template_start => TEMPLATE_START,
            template_end => TEMPLATE_END,
            script_start => SCRIPT_START,
            script_end => SCRIPT_END,
        },
    )
}

/// Follow-up turn carrying a new script chunk and the numbering hint from `counters`.
pub fn continuation_request(script: &str, counters: &Counters) -> Result<String, AppError> {
    render(
        "continuation request",
        CONTINUATION_REQUEST,
        context! {
            script => script,
            new_script_start => NEW_SCRIPT_START,
            new_script_end => NEW_SCRIPT_END,
            last_source => counters.last_source_index,
            next_source => counters.next_source_index(),
            last_prompt => counters.last_prompt_index,
            next_prompt => counters.next_prompt_index(),
        },
    )
}

fn render(name: &str, source: &str, ctx: minijinja::Value) -> Result<String, AppError> {
    environment().render_str(source, ctx).map_err(|err| AppError::PromptRender {
        template: name.to_string(),
        reason: err.to_string(),
    })
}

/// Text between the first `start` line and the following `end` line, if both are present.
pub fn section_between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let begin = text.find(start)? + start.len();
    let rest = &text[begin..];
    let finish = rest.find(end)?;
    Some(rest[..finish].trim_matches('\n'))
}
