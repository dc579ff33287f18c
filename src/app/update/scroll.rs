use super::Effect;
use crate::app::state::{App, PlayerState, ESTIMATED_CHARS_PER_LINE, TRAILING_SPACER_PX};
use crate::config::AppConfig;
use iced::widget::scrollable::RelativeOffset;
use tracing::trace;

/// Vertical space the header and transport controls occupy around the list.
const PLAYER_CHROME_PX: f32 = 180.0;

impl App {
    /// Scroll geometry update from the segment list. Fresh content bounds
    /// refine the per-segment height estimates, and a snap that was deferred
    /// for missing measurements is retried here.
    pub(super) fn handle_scrolled(
        &mut self,
        absolute_y: f32,
        viewport_height: f32,
        content_height: f32,
        effects: &mut Vec<Effect>,
    ) {
        let Some(player) = &mut self.player else {
            return;
        };
        if absolute_y.is_finite() {
            player.scroll_y = absolute_y.max(0.0);
        }
        if viewport_height.is_finite() && viewport_height > 0.0 {
            player.viewport_height = viewport_height;
        }
        if content_height.is_finite()
            && content_height > 0.0
            && (content_height - player.content_height).abs() > f32::EPSILON
        {
            player.content_height = content_height;
            refresh_height_estimates(player);
        }
        if let Some(idx) = player.pending_snap {
            if let Some(offset) = segment_scroll_offset(player, idx) {
                trace!(segment = idx, "Running deferred segment snap");
                player.pending_snap = None;
                effects.push(Effect::ScrollTo(offset));
            }
        }
    }
}

/// Seed scroll geometry from font metrics at player creation. The scrollable
/// only reports content bounds once the user scrolls, so without a seed the
/// first segment tap would have no heights to snap against. Real bounds
/// replace these numbers as soon as a scroll event arrives.
pub(super) fn seed_scroll_geometry(player: &mut PlayerState, config: &AppConfig) {
    let line_px = config.font_size as f32 * config.line_spacing;
    let lines: f32 = player
        .segments
        .iter()
        .map(|segment| segment_weight(&segment.text))
        .sum();
    player.content_height = lines * line_px + TRAILING_SPACER_PX;
    player.viewport_height = (config.window_height - PLAYER_CHROME_PX).max(1.0);
    refresh_height_estimates(player);
}

/// Distribute the measured content height over the segments, weighting each
/// by its rendered line count. The trailing spacer has a fixed height and is
/// excluded from the distribution.
pub(super) fn refresh_height_estimates(player: &mut PlayerState) {
    let segment_count = player.segments.len();
    player.heights.reset(segment_count);
    player.heights.record(segment_count, TRAILING_SPACER_PX);

    let usable = (player.content_height - TRAILING_SPACER_PX).max(0.0);
    let weights: Vec<f32> = player.segments.iter().map(|s| segment_weight(&s.text)).collect();
    let total: f32 = weights.iter().sum();
    if usable <= 0.0 || total <= f32::EPSILON {
        return;
    }
    for (idx, weight) in weights.iter().enumerate() {
        player.heights.record(idx, usable * weight / total);
    }
}

/// Approximate rendered lines: category label plus padding, then the wrapped
/// narration text.
fn segment_weight(text: &str) -> f32 {
    let text_lines = (text.chars().count() as f32 / ESTIMATED_CHARS_PER_LINE).ceil().max(1.0);
    2.0 + text_lines
}

/// Relative scroll offset that brings `idx` into view, or `None` while the
/// geometry needed to compute it is not known yet.
pub(super) fn segment_scroll_offset(player: &PlayerState, idx: usize) -> Option<RelativeOffset> {
    let pixels = player.heights.offset_for(idx)?;
    if player.content_height <= 0.0 {
        return None;
    }
    let scrollable = player.content_height - player.viewport_height;
    if scrollable <= 0.0 {
        return Some(RelativeOffset::START);
    }
    Some(RelativeOffset {
        x: 0.0,
        y: (pixels / scrollable).clamp(0.0, 1.0),
    })
}
