//! Marker tracking for numbered `Source Context N:` / `Prompt N:` output.
//!
//! Model output is free-form, so scanning is best-effort: anything that does not
//! look like a marker with a parseable index is skipped.

use std::sync::OnceLock;

use regex::Regex;

/// Kind of numbered marker found in model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    SourceContext,
    Prompt,
}

impl MarkerKind {
    pub fn label(&self) -> &'static str {
        match self {
            MarkerKind::SourceContext => "Source Context",
            MarkerKind::Prompt => "Prompt",
        }
    }
}

/// Running maximum marker indices observed in a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub last_source_index: u32,
    pub last_prompt_index: u32,
}

impl Counters {
    pub fn new(last_source_index: u32, last_prompt_index: u32) -> Self {
        Self { last_source_index, last_prompt_index }
    }

    /// Counters holding the highest markers found in `text`.
    pub fn from_text(text: &str) -> Self {
        let mut counters = Self::default();
        counters.scan(text);
        counters
    }

    /// Raise counters to the highest markers found in `text`.
    ///
    /// Counters never decrease.
    pub fn scan(&mut self, text: &str) {
        for (kind, index) in markers(text) {
            self.absorb(kind, index);
        }
    }

    /// Record a single marker, keeping the maximum.
    pub fn absorb(&mut self, kind: MarkerKind, index: u32) {
        let slot = match kind {
            MarkerKind::SourceContext => &mut self.last_source_index,
            MarkerKind::Prompt => &mut self.last_prompt_index,
        };
        if index > *slot {
            *slot = index;
        }
    }

    pub fn next_source_index(&self) -> u32 {
        self.last_source_index.saturating_add(1)
    }

    pub fn next_prompt_index(&self) -> u32 {
        self.last_prompt_index.saturating_add(1)
    }
}

static SOURCE_CONTEXT_RE: OnceLock<Regex> = OnceLock::new();
static PROMPT_RE: OnceLock<Regex> = OnceLock::new();

fn source_context_re() -> &'static Regex {
    SOURCE_CONTEXT_RE
        .get_or_init(|| Regex::new(r"(?i)Source Context (\d+):").expect("valid marker pattern"))
}

fn prompt_re() -> &'static Regex {
    PROMPT_RE.get_or_init(|| Regex::new(r"(?i)Prompt (\d+):").expect("valid marker pattern"))
}

/// Lazily yield every marker in `text`: all Source Context markers, then all Prompt markers.
///
/// Indices that do not fit in a `u32` are dropped.
pub fn markers(text: &str) -> impl Iterator<Item = (MarkerKind, u32)> + '_ {
    let sources = captures(source_context_re(), text, MarkerKind::SourceContext);
    let prompts = captures(prompt_re(), text, MarkerKind::Prompt);
    sources.chain(prompts)
}

fn captures<'t>(
    re: &'static Regex,
    text: &'t str,
    kind: MarkerKind,
) -> impl Iterator<Item = (MarkerKind, u32)> + 't {
    re.captures_iter(text)
        .filter_map(move |caps| caps.get(1)?.as_str().parse::<u32>().ok().map(|n| (kind, n)))
}
