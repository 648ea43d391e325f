//! Manual download instructions, the last download strategy.

use crate::core::types::{MediaFormat, MirrorLink};
use serde::Serialize;

/// Everything the user needs to save the file by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordance {
    pub media_url: String,
    pub filename: String,
    pub format: MediaFormat,
    pub mirrors: Vec<MirrorLink>,
    /// Whether the caption was delivered to the clipboard before the download.
    pub caption_copied: bool,
}

/// Renders the "Download Instructions" block as plain text.
///
/// # Examples
/// ```
/// use downloadex::core::types::MediaFormat;
/// use downloadex::download::instructions::{render_instructions, Affordance};
///
/// let text = render_instructions(&Affordance {
///     media_url: "https://cdn.example.com/v.mp4".to_string(),
///     filename: "DownloadeX_TikTok_1.mp4".to_string(),
///     format: MediaFormat::Video,
///     mirrors: Vec::new(),
///     caption_copied: false,
/// });
/// assert!(text.starts_with("📥 Download Instructions"));
/// assert!(text.contains("https://cdn.example.com/v.mp4"));
/// ```
pub fn render_instructions(affordance: &Affordance) -> String {
    let noun = match affordance.format {
        MediaFormat::Video => "video",
        MediaFormat::AudioOnly => "audio",
    };

    let mut lines = vec![
        "📥 Download Instructions".to_string(),
        String::new(),
        format!("1. Open the {} link:", noun),
        format!("   {}", affordance.media_url),
        format!("2. Right-click on the {} and select \"Save {} as…\"", noun, noun),
        format!("3. Save it as: {}", affordance.filename),
    ];

    if !affordance.mirrors.is_empty() {
        lines.push(String::new());
        lines.push("Alternative download sites:".to_string());
        for mirror in &affordance.mirrors {
            lines.push(format!("   • {}: {}", mirror.label, mirror.url));
        }
    }

    if affordance.caption_copied {
        lines.push(String::new());
        lines.push("✂️ Your caption has been copied and is ready to paste.".to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn affordance() -> Affordance {
        Affordance {
            media_url: "https://cdn.test/v.mp4".to_string(),
            filename: "DownloadeX_TikTok_1700000000000.mp4".to_string(),
            format: MediaFormat::Video,
            mirrors: Vec::new(),
            caption_copied: false,
        }
    }

    #[test]
    fn test_plain_instructions() {
        assert_eq!(
            render_instructions(&affordance()),
            "📥 Download Instructions\n\
             \n\
             1. Open the video link:\n   https://cdn.test/v.mp4\n\
             2. Right-click on the video and select \"Save video as…\"\n\
             3. Save it as: DownloadeX_TikTok_1700000000000.mp4"
        );
    }

    #[test]
    fn test_mirrors_and_caption_note() {
        let mut a = affordance();
        a.format = MediaFormat::AudioOnly;
        a.mirrors = vec![MirrorLink::new("Y2Mate (high quality)", "https://y2mate.com/youtube/dQw4w9WgXcQ")];
        a.caption_copied = true;

        let text = render_instructions(&a);
        assert!(text.contains("Save audio as…"));
        assert!(text.contains("   • Y2Mate (high quality): https://y2mate.com/youtube/dQw4w9WgXcQ"));
        assert!(text.ends_with("ready to paste."));
    }

    #[test]
    fn test_no_markup() {
        let text = render_instructions(&affordance());
        assert!(!text.contains('<'));
    }
}
