//! Timed text overlay specifications.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum rendered hook length in characters.
pub const MAX_HOOK_CHARS: usize = 40;
/// Maximum rendered CTA length in characters.
pub const MAX_CTA_CHARS: usize = 30;

/// Hook overlay duration in seconds (clamped to the total).
pub const HOOK_DURATION_SECS: f64 = 3.0;
/// CTA overlay duration in seconds (clamped to the total).
pub const CTA_DURATION_SECS: f64 = 2.0;

/// Vertical placement of an overlay within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

/// Text styling for an overlay. Stroke outline keeps text legible over
/// arbitrary background content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayStyle {
    /// Font size in points.
    pub font_size: u32,
    /// Fill color (FFmpeg color name or 0xRRGGBB).
    pub color: String,
    /// Stroke/border color.
    pub stroke_color: String,
}

impl OverlayStyle {
    /// Hook styling: large yellow text with a black outline.
    pub fn hook() -> Self {
        Self {
            font_size: 60,
            color: "yellow".to_string(),
            stroke_color: "black".to_string(),
        }
    }

    /// CTA styling: white text with a black outline.
    pub fn cta() -> Self {
        Self {
            font_size: 50,
            color: "white".to_string(),
            stroke_color: "black".to_string(),
        }
    }
}

/// One timed text element positioned over the background track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverlaySpec {
    /// Text to render (already truncated and uppercased).
    pub text: String,
    /// Start time in seconds from the beginning of the video.
    pub start_secs: f64,
    /// On-screen duration in seconds.
    pub duration_secs: f64,
    /// Vertical placement.
    pub anchor: VerticalAnchor,
    /// Text styling.
    pub style: OverlayStyle,
}

impl OverlaySpec {
    /// End time in seconds.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// Truncate `text` to at most `max_chars`, preferring to cut at a word
/// boundary. Falls back to a hard cut when the first word alone is longer
/// than the limit.
pub fn truncate_to_words(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut result = String::new();
    for word in text.split_whitespace() {
        let candidate_len = if result.is_empty() {
            word.chars().count()
        } else {
            result.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > max_chars {
            break;
        }
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }

    if result.is_empty() {
        // Single word longer than the cap: hard cut.
        text.chars().take(max_chars).collect()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_to_words("TEST HOOK", 40), "TEST HOOK");
    }

    #[test]
    fn test_truncate_favors_whole_words() {
        let text = "This AI tool will completely change how you work";
        let cut = truncate_to_words(text, 30);
        assert!(cut.chars().count() <= 30);
        assert_eq!(cut, "This AI tool will completely");
        // No partial word at the end
        assert!(text.split_whitespace().any(|w| cut.ends_with(w)));
    }

    #[test]
    fn test_truncate_single_long_word_hard_cut() {
        let cut = truncate_to_words("Supercalifragilisticexpialidocious", 10);
        assert_eq!(cut, "Supercalif");
    }

    #[test]
    fn test_overlay_end_secs() {
        let spec = OverlaySpec {
            text: "X".to_string(),
            start_secs: 10.4,
            duration_secs: 2.0,
            anchor: VerticalAnchor::Bottom,
            style: OverlayStyle::cta(),
        };
        assert!((spec.end_secs() - 12.4).abs() < f64::EPSILON);
    }
}
