//! Caption generation for the upload.

use std::sync::OnceLock;

use astroreel_models::ContentItem;
use regex::Regex;

/// Hard caption limit imposed by the remote service.
pub const MAX_CAPTION_LEN: usize = 2200;

/// Budget for the descriptive text, leaving room for hashtags.
const TEXT_BUDGET: usize = 2000;

/// Hashtags beyond this count are dropped.
const MAX_HASHTAGS: usize = 10;

const FOLLOW_LINE: &str = "Follow @astroreel for daily space updates! \u{1F30C}\u{2728}";

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

/// Remove HTML tags that news summaries sometimes carry.
fn strip_html(text: &str) -> String {
    if text.contains('<') {
        html_tag_re().replace_all(text, "").into_owned()
    } else {
        text.to_string()
    }
}

/// Truncate at a word boundary, appending an ellipsis when cut.
fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .take_while(|(i, _)| *i < max_len)
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let head = &text[..cut];
    let head = head.rsplit_once(' ').map(|(keep, _)| keep).unwrap_or(head);
    format!("{}...", head.trim_end())
}

/// Build the upload caption: title line, cleaned description, follow
/// line, and the first few configured hashtags.
pub fn build_caption(item: &ContentItem, hashtags: &[String]) -> String {
    let description = truncate_at_word(&strip_html(&item.description), TEXT_BUDGET);
    let tags = hashtags
        .iter()
        .take(MAX_HASHTAGS)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    let mut parts = vec![format!("\u{1F680} {}", item.title)];
    if !description.is_empty() {
        parts.push(String::new());
        parts.push(description);
    }
    parts.push(String::new());
    parts.push(FOLLOW_LINE.to_string());
    if !tags.is_empty() {
        parts.push(String::new());
        parts.push(tags);
    }

    parts.join("\n")
}
