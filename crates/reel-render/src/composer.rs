//! Overlay composition: turns a script's hook and CTA into timed
//! overlay specs positioned over the background track.

use reel_models::{
    truncate_to_words, OverlaySpec, OverlayStyle, Script, VerticalAnchor, CTA_DURATION_SECS,
    HOOK_DURATION_SECS, MAX_CTA_CHARS, MAX_HOOK_CHARS,
};

/// Build the hook and CTA overlays for a video of `total_duration_secs`.
///
/// The hook occupies the opening seconds front and center; the CTA sits
/// at the bottom over the closing seconds. Both windows are clamped so
/// a very short video still gets well-formed overlays, and an empty
/// hook or CTA simply produces no overlay for that slot.
pub fn compose_overlays(script: &Script, total_duration_secs: f64) -> Vec<OverlaySpec> {
    let mut overlays = Vec::with_capacity(2);

    let hook = script.hook.trim();
    if !hook.is_empty() {
        overlays.push(OverlaySpec {
            text: truncate_to_words(hook, MAX_HOOK_CHARS).to_uppercase(),
            start_secs: 0.0,
            duration_secs: HOOK_DURATION_SECS.min(total_duration_secs),
            anchor: VerticalAnchor::Center,
            style: OverlayStyle::hook(),
        });
    }

    let cta = script.cta.trim();
    if !cta.is_empty() {
        let start = (total_duration_secs - CTA_DURATION_SECS).max(0.0);
        overlays.push(OverlaySpec {
            text: truncate_to_words(cta, MAX_CTA_CHARS).to_uppercase(),
            start_secs: start,
            duration_secs: total_duration_secs - start,
            anchor: VerticalAnchor::Bottom,
            style: OverlayStyle::cta(),
        });
    }

    overlays
}
