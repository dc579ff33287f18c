//! Segment assembly and scroll geometry for the player screen.
//!
//! A segment is one (category, narration text) pair. Playback, highlighting
//! and auto-scroll all index into the same ordered segment list, so this
//! module is the single source of truth for its ordering and for the
//! character-offset arithmetic used to resume speech mid-segment.

use crate::artwork::{ArtworkData, CANONICAL_CATEGORIES, Category};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub category: Category,
    pub text: String,
}

/// Vertical slack that keeps a scrolled-to segment clear of the fixed header.
pub const HEADER_CLEARANCE_PX: f32 = 80.0;

/// Build the ordered segment list for the selected categories. Order follows
/// [`CANONICAL_CATEGORIES`], not selection order; categories whose narration
/// text is empty are dropped. An empty selection yields an empty list.
pub fn build_segments(artwork: &ArtworkData, selected: &[Category]) -> Vec<Segment> {
    CANONICAL_CATEGORIES
        .into_iter()
        .filter(|category| selected.contains(category))
        .filter_map(|category| {
            let text = category.text(artwork).trim();
            if text.is_empty() {
                None
            } else {
                Some(Segment {
                    category,
                    text: text.to_string(),
                })
            }
        })
        .collect()
}

/// Measured render heights, one slot per segment plus a trailing spacer.
///
/// Slots fill in asynchronously as layout geometry becomes known; scroll
/// requests that land before the prefix is fully measured return `None` and
/// are retried by the caller once measurement completes.
#[derive(Debug, Clone)]
pub struct SegmentHeights {
    slots: Vec<Option<f32>>,
}

impl SegmentHeights {
    pub fn new(segment_count: usize) -> Self {
        Self {
            slots: vec![None; segment_count + 1],
        }
    }

    /// Record a measured height. Out-of-range indices and non-finite values
    /// are ignored rather than panicking; layout events can arrive late.
    pub fn record(&mut self, idx: usize, height: f32) {
        if !height.is_finite() || height < 0.0 {
            return;
        }
        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = Some(height);
        }
    }

    pub fn reset(&mut self, segment_count: usize) {
        self.slots = vec![None; segment_count + 1];
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Pixel offset that puts segment `idx` just below the fixed header, or
    /// `None` while any earlier segment is still unmeasured.
    pub fn offset_for(&self, idx: usize) -> Option<f32> {
        if idx >= self.slots.len() {
            return None;
        }
        let mut sum = 0.0;
        for slot in self.slots.iter().take(idx) {
            sum += (*slot)?;
        }
        Some((sum - HEADER_CLEARANCE_PX).max(0.0))
    }
}

/// Convert an engine-reported offset (relative to the synthesized slice)
/// into an absolute offset into the full segment text. This is the only
/// place the two-offset arithmetic lives.
pub fn absolute_offset(utterance_start: usize, relative: usize, text_chars: usize) -> usize {
    utterance_start.saturating_add(relative).min(text_chars)
}

/// Slice `text` from an absolute character offset, clamping to the end and
/// respecting UTF-8 boundaries. Narration text is Korean, so byte indexing
/// would split codepoints.
pub fn slice_from(text: &str, char_offset: usize) -> &str {
    match text.char_indices().nth(char_offset) {
        Some((byte_idx, _)) => &text[byte_idx..],
        None => "",
    }
}
