//! Decorates syntax-highlighted code blocks with a labelled container so the
//! theme can display the block's language. Runs as the `after_post_render`
//! filter over a post's rendered HTML.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::debug;

/// The marker class injected into every annotated `<figure>`.
pub const MARKER_CLASS: &str = "iseeu";

/// The language shown for blocks without a language or marked `plain`.
const FALLBACK_LANGUAGE: &str = "code";

const FIGURE_OPEN: &str = r#"<figure class="highlight "#;

fn figure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<figure class="highlight ([a-zA-Z+\-/#]+)">.*?</figure>"#)
            .expect("figure pattern is a valid regex")
    })
}

/// The payload the host hands to `after_post_render` filters. Only the
/// rendered `content` is of interest here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub content: String,
}

impl From<String> for RenderResult {
    fn from(content: String) -> RenderResult {
        RenderResult { content }
    }
}

/// Rewrites `data.content` in place, wrapping each highlighted code block.
pub fn after_post_render(data: &mut RenderResult) {
    if let Cow::Owned(content) = annotate_code_blocks(&data.content) {
        data.content = content;
    }
}

/// Wraps every `<figure class="highlight LANG">…</figure>` in `content` with
/// `<div class="highlight-container" data-rel="Lang">`, and tags the figure
/// itself with [`MARKER_CLASS`]. Matching is textual and non-recursive; a
/// figure that spans several lines is left alone.
pub fn annotate_code_blocks(content: &str) -> Cow<'_, str> {
    let mut count = 0usize;
    let annotated = figure_pattern().replace_all(content, |caps: &Captures| {
        count += 1;
        wrap_block(&caps[0], &caps[1])
    });
    if count > 0 {
        debug!(blocks = count, "annotated highlighted code blocks");
    }
    annotated
}

fn wrap_block(block: &str, language: &str) -> String {
    let language = display_language(language);
    let marked = block.replacen(
        FIGURE_OPEN,
        &format!(r#"<figure class="{} highlight "#, MARKER_CLASS),
        1,
    );
    format!(
        r#"<div class="highlight-container" data-rel="{}">{}</div>"#,
        capitalize(language),
        marked
    )
}

fn display_language(language: &str) -> &str {
    match language {
        "" | "plain" => FALLBACK_LANGUAGE,
        other => other,
    }
}

/// Upper-cases the first character and leaves the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
