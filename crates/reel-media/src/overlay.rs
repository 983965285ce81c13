//! Drawtext overlay filter construction.
//!
//! Overlays are rendered with FFmpeg's drawtext filter: word-wrapped to
//! the frame width, centered horizontally, outlined for legibility, and
//! time-gated with `enable=between(t,..)`.

use std::path::{Path, PathBuf};

use reel_models::{OverlaySpec, RenderTarget, VerticalAnchor};

/// Candidate font files checked in order. The first bold sans-serif wins.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Locate a usable font file on this host. `None` means overlays are
/// skipped for this job (degrade, never abort).
pub fn find_font_file() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

/// Escape text for use inside a drawtext `text=` argument.
pub fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '\'' => escaped.push_str(r"\'"),
            ':' => escaped.push_str(r"\:"),
            '%' => escaped.push_str(r"\%"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Estimated characters per wrapped line for a font size and frame width.
/// Uses an average glyph width of ~0.55em over 90% of the frame.
pub fn chars_per_line(font_size: u32, frame_width: u32) -> usize {
    let usable = frame_width as f64 * 0.9;
    let glyph = font_size as f64 * 0.55;
    ((usable / glyph).floor() as usize).max(1)
}

/// Greedy word wrap to `max_chars` per line, joined with newlines.
pub fn wrap_text(text: &str, max_chars: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// Vertical position expression for an anchor.
fn y_expr(anchor: VerticalAnchor) -> &'static str {
    match anchor {
        VerticalAnchor::Top => "h*0.12",
        VerticalAnchor::Center => "(h-text_h)/2",
        VerticalAnchor::Bottom => "h-text_h-h*0.08",
    }
}

/// Build the drawtext filter for one overlay spec.
pub fn drawtext_filter(spec: &OverlaySpec, target: &RenderTarget, font: &Path) -> String {
    let wrapped = wrap_text(&spec.text, chars_per_line(spec.style.font_size, target.width));
    let text = escape_drawtext(&wrapped);
    let font_path = escape_drawtext(&font.to_string_lossy());

    format!(
        "drawtext=fontfile='{font}':text='{text}':fontsize={size}:fontcolor={color}:\
         bordercolor={stroke}:borderw=4:x=(w-text_w)/2:y={y}:\
         enable='between(t,{start:.3},{end:.3})'",
        font = font_path,
        text = text,
        size = spec.style.font_size,
        color = spec.style.color,
        stroke = spec.style.stroke_color,
        y = y_expr(spec.anchor),
        start = spec.start_secs,
        end = spec.end_secs(),
    )
}

/// Build a comma-joined drawtext chain for all overlays. Returns `None`
/// when there are no overlays or no usable font, in which case the final
/// encode runs without a text filter.
pub fn build_overlay_chain(
    specs: &[OverlaySpec],
    target: &RenderTarget,
    font: Option<&Path>,
) -> Option<String> {
    let font = font?;
    if specs.is_empty() {
        return None;
    }
    let filters: Vec<String> = specs
        .iter()
        .map(|s| drawtext_filter(s, target, font))
        .collect();
    Some(filters.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::OverlayStyle;

    fn hook_spec(text: &str) -> OverlaySpec {
        OverlaySpec {
            text: text.to_string(),
            start_secs: 0.0,
            duration_secs: 3.0,
            anchor: VerticalAnchor::Center,
            style: OverlayStyle::hook(),
        }
    }

    #[test]
    fn test_escape_drawtext() {
        assert_eq!(escape_drawtext("100% AI: it's here"), r"100\% AI\: it\'s here");
    }

    #[test]
    fn test_wrap_text_greedy() {
        assert_eq!(wrap_text("one two three four", 9), "one two\nthree\nfour");
        // Text shorter than the limit stays on one line
        assert_eq!(wrap_text("short", 20), "short");
    }

    #[test]
    fn test_chars_per_line_bounds() {
        // 1080 wide at 60pt: ~29 chars
        let n = chars_per_line(60, 1080);
        assert!((20..40).contains(&n), "got {}", n);
        assert_eq!(chars_per_line(4000, 100), 1);
    }

    #[test]
    fn test_drawtext_filter_contents() {
        let target = RenderTarget::vertical_1080();
        let filter = drawtext_filter(&hook_spec("TEST HOOK"), &target, Path::new("/fonts/a.ttf"));
        assert!(filter.contains("text='TEST HOOK'"));
        assert!(filter.contains("fontsize=60"));
        assert!(filter.contains("fontcolor=yellow"));
        assert!(filter.contains("enable='between(t,0.000,3.000)'"));
        assert!(filter.contains("y=(h-text_h)/2"));
    }

    #[test]
    fn test_bottom_anchor_expression() {
        let target = RenderTarget::vertical_1080();
        let spec = OverlaySpec {
            anchor: VerticalAnchor::Bottom,
            ..hook_spec("CTA")
        };
        let filter = drawtext_filter(&spec, &target, Path::new("/fonts/a.ttf"));
        assert!(filter.contains("y=h-text_h-h*0.08"));
    }

    #[test]
    fn test_chain_requires_font() {
        let target = RenderTarget::vertical_1080();
        let specs = vec![hook_spec("X")];
        assert!(build_overlay_chain(&specs, &target, None).is_none());
        let chain = build_overlay_chain(&specs, &target, Some(Path::new("/f.ttf"))).unwrap();
        assert!(chain.contains("drawtext"));
    }

    #[test]
    fn test_chain_joins_with_comma() {
        let target = RenderTarget::vertical_1080();
        let specs = vec![hook_spec("A"), hook_spec("B")];
        let chain = build_overlay_chain(&specs, &target, Some(Path::new("/f.ttf"))).unwrap();
        assert_eq!(chain.matches("drawtext=").count(), 2);
        assert!(chain.contains("',drawtext="));
    }
}
