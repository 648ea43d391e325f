//! Fixed-template caption generation.
//!
//! The caption is the cleaned, uppercased video title followed by a blank
//! line and a fixed hashtag block. It is a total function: every metadata
//! record produces a caption.

use crate::core::config::caption::{HASHTAG_BLOCK, PLACEHOLDER_TITLE};
use crate::core::types::VideoMetadata;
use lazy_regex::regex;

/// Builds the caption for a resolved video.
///
/// # Examples
/// ```
/// use downloadex::core::caption::caption_for_title;
///
/// assert!(caption_for_title("Epic Fail! #funny").starts_with("EPIC FAIL!\n\n\n        \n#cinesnaps"));
/// assert!(caption_for_title("").starts_with("THE GORGE\n\n"));
/// ```
pub fn build_caption(metadata: &VideoMetadata) -> String {
    caption_for_title(&metadata.title)
}

/// Same as [`build_caption`], from a bare title.
pub fn caption_for_title(title: &str) -> String {
    let cleaned = clean_title(title);
    let heading = if cleaned.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        cleaned.to_uppercase()
    };

    let mut caption = String::with_capacity(heading.len() + 2 + HASHTAG_BLOCK.len());
    caption.push_str(&heading);
    caption.push_str("\n\n");
    caption.push_str(HASHTAG_BLOCK);
    caption
}

/// Drops hashtags, mentions and stray `#`/`@` symbols, then normalizes spacing.
fn clean_title(title: &str) -> String {
    let stripped = regex!(r"[#@][\p{L}\p{N}_]*").replace_all(title, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts an edited (HTML) caption back into the plain text that gets copied.
///
/// `<br>` becomes a newline, other tags are dropped, `&nbsp;` becomes a space.
pub fn caption_to_plain_text(html: &str) -> String {
    let with_breaks = regex!(r"(?i)<br\s*/?>").replace_all(html, "\n");
    let without_tags = regex!(r"<[^>]*>").replace_all(&with_breaks, "");
    without_tags.replace("&nbsp;", " ").trim().to_string()
}
