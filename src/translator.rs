//! Field translation: prompt construction, the canonical short-circuit,
//! and plain-text post-processing of model output.

use crate::config::Config;
use crate::fields::FieldKind;
use crate::i18n::{Language, MarkupCheck};
use crate::openai::complete_chat;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Translation prompt for descriptions, which carry HTML markup.
const DESCRIPTION_PROMPT: &str = r#"You are a professional localization engine. Translate human-readable text from the provided text into {target_language}.

Rules:
1. Do not add, remove, reorder, or rename any tags, attributes, or attributes.
2. Preserve whitespace exactly: spaces, newlines, tabs, indentation, and blank lines must remain unchanged.
3. Preserve all entities and punctuation as written (for example: &nbsp;, &amp;, &copy;, &ndash;).
4. Translate only human-visible text nodes. Translate attribute values intended for users: alt, title, placeholder, aria-label.
5. Keep numbers, URLs, placeholders, and templating intact: {{...}}, #{...}, <%= %>, %{...}, :em, :en.
6. Do not change code blocks or technical literals inside <code>, <pre>, <kbd>, <samp>, <var>, or <tt> tags.
7. Keep capitalization style (Title Case, ALL CAPS) where natural in the target language; otherwise follow target language conventions.
8. Maintain meaning and tone (formal vs. informal) consistent with the source.
9. Output only the translated markup, no explanations, no extra characters before or after.
10. The count and order of tags before and after must match exactly.

Extra guidance:
1. Translate visible UI text inside tags like <p>, <span>, <a>, <button>, <label>, <option>, <li>, <h1>-<h6>, <td>, <th>, <div>.
2. If a sentence spans inline tags (for example, <strong>, <em>, <b>, <i>, <u>, <sup>, <sub>), translate the entire sentence and place the tags around the appropriate translated words.
3. For punctuation attached to tags, keep punctuation placement identical.
4. If a term is a product/brand name, leave it untranslated unless it has a common exonym in the target language.

Delivery:
Return the translated text with the same indentation and line breaks as the input. No commentary.

Text to translate: {text}"#;

/// Simple translation prompt for summaries (plain text, hard character limit).
const SUMMARY_PROMPT: &str = r#"Translate the following text to {target_language}.

IMPORTANT RULES:
- Return ONLY plain text (no HTML, no special characters, no formatting)
- Maximum 100 characters
- Keep the meaning and tone
- If the text is too long, make it shorter while keeping the key message
- Do not add explanations or extra text

Text to translate: {text}"#;

/// Simple translation prompt for keywords (plain text, hard character limit).
const KEYWORD_PROMPT: &str = r#"Translate the following search keyword to {target_language}.

IMPORTANT RULES:
- Return ONLY plain text (no HTML, no special characters, no formatting)
- Maximum 40 characters
- Keep it concise and search-friendly
- Translate naturally while maintaining search relevance
- Do not add explanations or extra text
- If it's a brand name or proper noun, you may keep it in English if appropriate

Text to translate: {text}"#;

fn prompt_template(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Summary => SUMMARY_PROMPT,
        FieldKind::Keyword => KEYWORD_PROMPT,
        FieldKind::Description => DESCRIPTION_PROMPT,
    }
}

/// Fill the prompt template for one field translation.
///
/// Templates receive the human-readable language name, never the locale
/// code: the model translates to "French", not to "fr-FR".
fn build_user_prompt(kind: FieldKind, language_name: &str, text: &str) -> String {
    prompt_template(kind)
        .replace("{target_language}", language_name)
        .replace("{text}", text)
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
}

/// Force model output into bare text within the field's character cap.
///
/// Models occasionally wrap short answers in tags despite the prompt, so
/// stripping is unconditional. Lengths count characters, not bytes.
fn postprocess_plain_text(raw: &str, max_chars: Option<usize>) -> String {
    let stripped = tag_regex().replace_all(raw, "");
    let collapsed = whitespace_regex().replace_all(&stripped, " ");
    let trimmed = collapsed.trim();

    match max_chars {
        Some(max) if trimmed.chars().count() > max => {
            let kept: String = trimmed.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
        _ => trimmed.to_string(),
    }
}

/// Translate one field of the listing into the target language.
///
/// The canonical language never reaches the model: its translation is the
/// source text verbatim. Plain-text fields are stripped, collapsed, and
/// capped after translation; descriptions are returned as the model wrote
/// them, with an advisory markup structure check logged.
pub async fn translate_field(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    language: Language,
    kind: FieldKind,
) -> Result<String> {
    if language.is_canonical() {
        return Ok(text.to_string());
    }

    let profile = kind.profile(config);
    let user_prompt = build_user_prompt(kind, language.name(), text);
    let operation = format!("{} translation to {}", kind, language.name());

    let raw = complete_chat(
        client,
        config,
        &operation,
        profile.persona,
        &user_prompt,
        profile.max_tokens,
    )
    .await?;

    if profile.plain_text_only {
        return Ok(postprocess_plain_text(&raw, profile.max_chars));
    }

    let translated = raw.trim().to_string();
    let report = MarkupCheck::check(text, &translated);
    if report.has_errors() {
        warn!(
            "Markup check failed for {} {}: {:?}",
            language.code(),
            kind,
            report.errors
        );
    }
    if report.has_warnings() {
        debug!(
            "Markup check warnings for {} {}: {:?}",
            language.code(),
            kind,
            report.warnings
        );
    }

    Ok(translated)
}
