use crate::artwork::{ArtworkData, Category};
use crate::segments::{self, Segment, SegmentHeights};
use crate::speech::{SpeechPlayback, DISPLAY_RATES, SYNTH_RATES};
use std::time::{Duration, Instant};

/// `Preparing` covers the window between requesting synthesis and the
/// prepared file coming back; the utterance id is the only live reference to
/// that request, so cancelling means bumping the id and dropping back to
/// `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Stopped,
    Preparing,
    Playing,
}

/// State of the narration player screen.
///
/// `char_offset` is the resume position inside the current segment, always
/// absolute from the segment start. Each utterance speaks the suffix from
/// `utterance_start`, and progress reported against that suffix is converted
/// back to an absolute offset before it is stored.
pub struct PlayerState {
    pub(in crate::app) artist_name: String,
    pub(in crate::app) artwork_title: String,
    pub(in crate::app) segments: Vec<Segment>,
    pub(in crate::app) current_idx: usize,
    pub(in crate::app) phase: PlaybackPhase,
    pub(in crate::app) rate_idx: usize,
    pub(in crate::app) char_offset: usize,
    pub(in crate::app) utterance_start: usize,
    pub(in crate::app) utterance_chars: usize,
    pub(in crate::app) utterance_duration: Duration,
    pub(in crate::app) playback: Option<SpeechPlayback>,
    pub(in crate::app) started_at: Option<Instant>,
    pub(in crate::app) heights: SegmentHeights,
    pub(in crate::app) highlight_only_active: bool,
    pub(in crate::app) overlay_visible: bool,
    pub(in crate::app) overlay_seen: bool,
    pub(in crate::app) pending_snap: Option<usize>,
    pub(in crate::app) scroll_y: f32,
    pub(in crate::app) viewport_height: f32,
    pub(in crate::app) content_height: f32,
}

impl PlayerState {
    pub(in crate::app) fn new(
        artwork: &ArtworkData,
        selected: &[Category],
        overlay_seen: bool,
    ) -> Self {
        let segments = segments::build_segments(artwork, selected);
        let heights = SegmentHeights::new(segments.len());
        PlayerState {
            artist_name: artwork.artist_name.clone(),
            artwork_title: artwork.artwork_title.clone(),
            segments,
            current_idx: 0,
            phase: PlaybackPhase::Stopped,
            rate_idx: 0,
            char_offset: 0,
            utterance_start: 0,
            utterance_chars: 0,
            utterance_duration: Duration::ZERO,
            playback: None,
            started_at: None,
            heights,
            highlight_only_active: true,
            overlay_visible: false,
            overlay_seen,
            pending_snap: None,
            scroll_y: 0.0,
            viewport_height: 0.0,
            content_height: 0.0,
        }
    }

    pub(in crate::app) fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub(in crate::app) fn current_segment(&self) -> Option<&Segment> {
        self.segments.get(self.current_idx)
    }

    fn current_text_chars(&self) -> usize {
        self.current_segment()
            .map(|segment| segment.text.chars().count())
            .unwrap_or(0)
    }

    pub(in crate::app) fn synth_rate(&self) -> f32 {
        SYNTH_RATES[self.rate_idx]
    }

    pub(in crate::app) fn display_rate(&self) -> f32 {
        DISPLAY_RATES[self.rate_idx]
    }

    pub(in crate::app) fn cycle_rate(&mut self) {
        self.rate_idx = (self.rate_idx + 1) % SYNTH_RATES.len();
    }

    /// Make `idx` the active segment. Returns false when the index is already
    /// active or out of range. Switching segments drops any running playback
    /// and rewinds the resume offset.
    pub(in crate::app) fn select_segment(&mut self, idx: usize) -> bool {
        if idx >= self.segments.len() || idx == self.current_idx {
            return false;
        }
        self.abort_playback();
        self.current_idx = idx;
        self.char_offset = 0;
        true
    }

    /// Text and rate for the next utterance: the current segment's suffix
    /// starting at the resume offset. A stale offset at or past the end of
    /// the segment rewinds to the beginning.
    pub(in crate::app) fn prepare_speak(&mut self) -> Option<(String, f32)> {
        let chars = self.current_text_chars();
        if chars == 0 {
            return None;
        }
        if self.char_offset >= chars {
            self.char_offset = 0;
        }
        let segment = self.current_segment()?;
        let slice = segments::slice_from(&segment.text, self.char_offset);
        let text = slice.to_string();
        self.utterance_start = self.char_offset;
        self.utterance_chars = text.chars().count();
        Some((text, self.synth_rate()))
    }

    /// Hand a synthesized utterance to the player and start the clock.
    pub(in crate::app) fn attach_playback(
        &mut self,
        playback: SpeechPlayback,
        duration: Duration,
        now: Instant,
    ) {
        self.playback = Some(playback);
        self.utterance_duration = duration;
        self.started_at = Some(now);
        self.phase = PlaybackPhase::Playing;
    }

    /// Characters of the current utterance spoken so far, judged from elapsed
    /// wall time against the utterance's total duration.
    pub(in crate::app) fn spoken_relative(&self, now: Instant) -> usize {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let total = self.utterance_duration.as_secs_f32();
        if total <= f32::EPSILON {
            return self.utterance_chars;
        }
        let elapsed = now.saturating_duration_since(started_at).as_secs_f32();
        let fraction = (elapsed / total).clamp(0.0, 1.0);
        (fraction * self.utterance_chars as f32) as usize
    }

    /// Store progress reported against the current utterance as an absolute
    /// offset into the segment.
    pub(in crate::app) fn record_progress(&mut self, relative: usize) {
        self.char_offset =
            segments::absolute_offset(self.utterance_start, relative, self.current_text_chars());
    }

    /// Pause: freeze the resume offset at the estimated position, then stop
    /// the audio.
    pub(in crate::app) fn pause(&mut self, now: Instant) {
        if self.started_at.is_some() {
            let relative = self.spoken_relative(now);
            self.record_progress(relative);
        }
        self.abort_playback();
    }

    /// The utterance played to its natural end; rewind so the next play
    /// starts the segment over.
    pub(in crate::app) fn finish_utterance(&mut self) {
        self.abort_playback();
        self.char_offset = 0;
    }

    /// Drop playback without touching the resume offset.
    pub(in crate::app) fn abort_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.stop();
        }
        self.started_at = None;
        self.phase = PlaybackPhase::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::Category;

    fn sample_artwork() -> ArtworkData {
        ArtworkData {
            artist_name: "김환기".to_string(),
            artwork_title: "우주".to_string(),
            artwork_description: "점화 연작의 정점에 있는 작품입니다.".to_string(),
            artist_description: "한국 추상미술의 선구자입니다.".to_string(),
            artwork_background: String::new(),
            appreciation_point: "푸른 점들의 리듬을 따라가 보세요.".to_string(),
            art_history: String::new(),
        }
    }

    fn sample_player() -> PlayerState {
        let artwork = sample_artwork();
        PlayerState::new(
            &artwork,
            &[
                Category::ArtworkIntro,
                Category::ArtistIntro,
                Category::AppreciationPoint,
            ],
            true,
        )
    }

    #[test]
    fn selecting_a_segment_rewinds_and_stops() {
        let mut player = sample_player();
        player.char_offset = 7;
        player.phase = PlaybackPhase::Playing;
        player.started_at = Some(Instant::now());
        assert!(player.select_segment(1));
        assert_eq!(player.current_idx, 1);
        assert_eq!(player.char_offset, 0);
        assert_eq!(player.phase, PlaybackPhase::Stopped);
        assert!(player.started_at.is_none());
    }

    #[test]
    fn reselecting_the_active_segment_is_a_no_op() {
        let mut player = sample_player();
        player.char_offset = 4;
        assert!(!player.select_segment(0));
        assert_eq!(player.char_offset, 4);
        assert!(!player.select_segment(99));
    }

    #[test]
    fn prepare_speak_resumes_from_the_stored_offset() {
        let mut player = sample_player();
        player.char_offset = 3;
        let (text, rate) = player.prepare_speak().unwrap();
        let full = player.current_segment().unwrap().text.clone();
        assert_eq!(text, segments::slice_from(&full, 3));
        assert!((rate - SYNTH_RATES[0]).abs() < f32::EPSILON);
        assert_eq!(player.utterance_start, 3);
        assert_eq!(text.chars().count(), player.utterance_chars);
    }

    #[test]
    fn prepare_speak_rewinds_an_exhausted_offset() {
        let mut player = sample_player();
        player.char_offset = 10_000;
        let (text, _) = player.prepare_speak().unwrap();
        assert_eq!(text, player.current_segment().unwrap().text);
        assert_eq!(player.utterance_start, 0);
    }

    #[test]
    fn spoken_relative_maps_elapsed_time_onto_characters() {
        let mut player = sample_player();
        let now = Instant::now();
        player.utterance_chars = 10;
        player.utterance_duration = Duration::from_secs(2);
        player.started_at = now.checked_sub(Duration::from_secs(1));
        assert_eq!(player.spoken_relative(now), 5);
        assert_eq!(player.spoken_relative(now + Duration::from_secs(10)), 10);
    }

    #[test]
    fn pause_freezes_an_absolute_offset() {
        let mut player = sample_player();
        let now = Instant::now();
        player.phase = PlaybackPhase::Playing;
        player.utterance_start = 4;
        player.utterance_chars = 10;
        player.utterance_duration = Duration::from_secs(2);
        player.started_at = now.checked_sub(Duration::from_secs(1));
        player.pause(now);
        assert_eq!(player.char_offset, 9);
        assert_eq!(player.phase, PlaybackPhase::Stopped);
    }

    #[test]
    fn natural_completion_rewinds_to_the_segment_start() {
        let mut player = sample_player();
        player.char_offset = 12;
        player.phase = PlaybackPhase::Playing;
        player.finish_utterance();
        assert_eq!(player.char_offset, 0);
        assert_eq!(player.phase, PlaybackPhase::Stopped);
    }

    #[test]
    fn rate_cycle_wraps_and_tracks_display_labels() {
        let mut player = sample_player();
        for expected in DISPLAY_RATES.iter().skip(1) {
            player.cycle_rate();
            assert!((player.display_rate() - expected).abs() < f32::EPSILON);
        }
        player.cycle_rate();
        assert!((player.display_rate() - DISPLAY_RATES[0]).abs() < f32::EPSILON);
        assert!((player.synth_rate() - SYNTH_RATES[0]).abs() < f32::EPSILON);
    }
}
