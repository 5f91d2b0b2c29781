//! crates/club_dashboard_core/src/sanitize.rs
//!
//! Escapes untrusted text for display and applies the two bits of
//! formatting the chat panel allows: clickable links and line breaks.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static BARE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("link pattern is valid"));

/// Renders `text` as a safe markup fragment.
///
/// Steps run in a fixed order: escape, then link, then line breaks.
pub fn render(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let escaped = escape(text);
    let linked = autolink(&escaped);
    linked.replace('\n', "<br>")
}

/// Escapes `&`, `<` and `>`. `&` goes first so later entities stay intact.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn autolink(escaped: &str) -> String {
    BARE_LINK
        .replace_all(escaped, |caps: &Captures| {
            let url = &caps[0];
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                url.replace('"', "&quot;"),
                url
            )
        })
        .into_owned()
}
