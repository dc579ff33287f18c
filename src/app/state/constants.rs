use iced::widget::scrollable::Id as ScrollId;
use once_cell::sync::Lazy;

/// Limits for config clamping and fixed player geometry.
pub(crate) const MIN_FONT_SIZE: u32 = 12;
pub(crate) const MAX_FONT_SIZE: u32 = 32;
/// Height of the empty view after the last segment, so the final segment can
/// scroll clear of the bottom controls.
pub(crate) const TRAILING_SPACER_PX: f32 = 150.0;
/// How long the selection screen keeps a validation warning on screen.
pub(crate) const WARNING_VISIBLE_SECS: f32 = 2.0;
/// Rough character count per rendered line, used to estimate segment heights
/// until real geometry arrives.
pub(crate) const ESTIMATED_CHARS_PER_LINE: f32 = 22.0;

pub(crate) static SEGMENT_SCROLL_ID: Lazy<ScrollId> =
    Lazy::new(|| ScrollId::new("segment-scroll"));
