use super::Effect;
use crate::app::state::{App, PlaybackPhase, Screen};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

impl App {
    pub(super) fn handle_segment_clicked(&mut self, idx: usize, effects: &mut Vec<Effect>) {
        let Some(player) = &mut self.player else {
            return;
        };
        if player.overlay_visible {
            return;
        }
        if player.select_segment(idx) {
            debug!(segment = idx, "Segment selected");
            // Any utterance still in synthesis belongs to the previous
            // segment; bumping the id makes its result stale.
            self.utterance_id = self.utterance_id.wrapping_add(1);
            effects.push(Effect::ScrollToSegment(idx));
        }
    }

    /// Play/pause. The very first play on this machine shows the
    /// instructional overlay instead of speaking.
    pub(super) fn handle_toggle_play_pause(&mut self, effects: &mut Vec<Effect>) {
        let Some(player) = &mut self.player else {
            return;
        };
        if player.segments.is_empty() {
            debug!("Play pressed with no segments");
            return;
        }
        if !player.overlay_seen {
            player.overlay_visible = true;
            player.overlay_seen = true;
            effects.push(Effect::MarkOverlaySeen);
            return;
        }
        if player.overlay_visible {
            player.overlay_visible = false;
        }
        match player.phase {
            PlaybackPhase::Playing => {
                player.pause(Instant::now());
                info!(offset = player.char_offset, "Paused");
            }
            PlaybackPhase::Preparing => {
                player.phase = PlaybackPhase::Stopped;
                self.utterance_id = self.utterance_id.wrapping_add(1);
                info!("Cancelled utterance still in synthesis");
            }
            PlaybackPhase::Stopped => self.start_playback(effects),
        }
    }

    /// Request synthesis for the current segment's remainder. Playback starts
    /// when the prepared utterance comes back with a matching id.
    fn start_playback(&mut self, effects: &mut Vec<Effect>) {
        let Some(player) = &mut self.player else {
            return;
        };
        let Some((text, rate)) = player.prepare_speak() else {
            return;
        };
        player.phase = PlaybackPhase::Preparing;
        self.utterance_id = self.utterance_id.wrapping_add(1);
        info!(
            utterance_id = self.utterance_id,
            segment = player.current_idx,
            offset = player.utterance_start,
            rate,
            "Preparing utterance"
        );
        effects.push(Effect::Speak {
            utterance_id: self.utterance_id,
            text,
            rate,
        });
    }

    /// Changing the rate mid-playback restarts speech from the frozen offset,
    /// reusing the same stopped-to-playing transition as a manual pause/play.
    pub(super) fn handle_cycle_rate(&mut self, effects: &mut Vec<Effect>) {
        let Some(player) = &mut self.player else {
            return;
        };
        let was_active = player.phase != PlaybackPhase::Stopped;
        match player.phase {
            PlaybackPhase::Playing => player.pause(Instant::now()),
            PlaybackPhase::Preparing => {
                player.phase = PlaybackPhase::Stopped;
                self.utterance_id = self.utterance_id.wrapping_add(1);
            }
            PlaybackPhase::Stopped => {}
        }
        player.cycle_rate();
        info!(rate = player.display_rate(), "Playback rate changed");
        if was_active {
            self.start_playback(effects);
        }
    }

    pub(super) fn handle_toggle_highlight(&mut self) {
        if let Some(player) = &mut self.player {
            player.highlight_only_active = !player.highlight_only_active;
        }
    }

    pub(super) fn handle_dismiss_overlay(&mut self) {
        if let Some(player) = &mut self.player {
            player.overlay_visible = false;
        }
    }

    pub(super) fn handle_new_search(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.abort_playback();
        }
        self.utterance_id = self.utterance_id.wrapping_add(1);
        self.screen = Screen::Selection;
    }

    pub(super) fn handle_utterance_prepared(
        &mut self,
        utterance_id: u64,
        file: PathBuf,
        duration: Duration,
    ) {
        if utterance_id != self.utterance_id {
            debug!(utterance_id, current = self.utterance_id, "Dropping stale utterance");
            return;
        }
        let Some(player) = &mut self.player else {
            return;
        };
        let Some(engine) = &self.engine else {
            warn!("Utterance ready but no speech engine is available");
            return;
        };
        match engine.play_file(&file, self.config.tts_volume) {
            Ok(playback) => {
                player.attach_playback(playback, duration, Instant::now());
                debug!(?duration, "Utterance playing");
            }
            Err(err) => {
                warn!("Could not start utterance playback: {err:?}");
                player.abort_playback();
            }
        }
    }

    pub(super) fn handle_utterance_failed(&mut self, utterance_id: u64, error: String) {
        if utterance_id != self.utterance_id {
            debug!(utterance_id, "Dropping stale synthesis failure");
            return;
        }
        warn!("Utterance synthesis failed: {error}");
        if let Some(player) = &mut self.player {
            player.abort_playback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::messages::Message;
    use crate::app::update::tests::player_app;
    use crate::segments::slice_from;
    use crate::speech::SYNTH_RATES;

    #[test]
    fn first_play_shows_the_overlay_instead_of_speaking() {
        let mut app = player_app(false);
        let effects = app.reduce(Message::TogglePlayPause);
        assert!(matches!(effects.as_slice(), [Effect::MarkOverlaySeen]));
        let player = app.player.as_ref().unwrap();
        assert!(player.overlay_visible);
        assert!(player.overlay_seen);
        assert_eq!(player.phase, PlaybackPhase::Stopped);
    }

    #[test]
    fn second_play_requests_speech() {
        let mut app = player_app(false);
        app.reduce(Message::TogglePlayPause);
        app.reduce(Message::DismissOverlay);
        let effects = app.reduce(Message::TogglePlayPause);
        assert!(matches!(effects.as_slice(), [Effect::Speak { .. }]));
    }

    #[test]
    fn play_speaks_the_segment_suffix_at_the_current_rate() {
        let mut app = player_app(true);
        app.player.as_mut().unwrap().char_offset = 3;
        let effects = app.reduce(Message::TogglePlayPause);
        let full = app
            .player
            .as_ref()
            .unwrap()
            .current_segment()
            .unwrap()
            .text
            .clone();
        match &effects[0] {
            Effect::Speak {
                utterance_id,
                text,
                rate,
            } => {
                assert_eq!(*utterance_id, app.utterance_id);
                assert_eq!(text, slice_from(&full, 3));
                assert!((rate - SYNTH_RATES[0]).abs() < f32::EPSILON);
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn rate_change_while_stopped_does_not_speak() {
        let mut app = player_app(true);
        let effects = app.reduce(Message::CycleRate);
        assert!(effects.is_empty());
        assert!(
            (app.player.as_ref().unwrap().synth_rate() - SYNTH_RATES[1]).abs() < f32::EPSILON
        );
    }

    #[test]
    fn rate_change_while_playing_restarts_from_the_frozen_offset() {
        let mut app = player_app(true);
        {
            let player = app.player.as_mut().unwrap();
            player.phase = PlaybackPhase::Playing;
            player.utterance_start = 2;
            player.utterance_chars = 10;
            player.utterance_duration = Duration::from_secs(10);
            player.started_at = Some(Instant::now());
        }
        let effects = app.reduce(Message::CycleRate);
        let player = app.player.as_ref().unwrap();
        assert_eq!(player.phase, PlaybackPhase::Preparing);
        match &effects[0] {
            Effect::Speak { text, rate, .. } => {
                let full = player.current_segment().unwrap().text.clone();
                assert_eq!(text, slice_from(&full, player.utterance_start));
                assert!((rate - SYNTH_RATES[1]).abs() < f32::EPSILON);
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn clicking_another_segment_stops_and_scrolls() {
        let mut app = player_app(true);
        {
            let player = app.player.as_mut().unwrap();
            player.phase = PlaybackPhase::Playing;
            player.char_offset = 5;
            player.started_at = Some(Instant::now());
        }
        let effects = app.reduce(Message::SegmentClicked(1));
        assert!(matches!(effects.as_slice(), [Effect::ScrollToSegment(1)]));
        let player = app.player.as_ref().unwrap();
        assert_eq!(player.current_idx, 1);
        assert_eq!(player.char_offset, 0);
        assert_eq!(player.phase, PlaybackPhase::Stopped);
    }

    #[test]
    fn clicking_the_active_segment_emits_nothing() {
        let mut app = player_app(true);
        let effects = app.reduce(Message::SegmentClicked(0));
        assert!(effects.is_empty());
    }

    #[test]
    fn stale_synthesis_failure_does_not_stop_current_playback() {
        let mut app = player_app(true);
        app.utterance_id = 7;
        app.player.as_mut().unwrap().phase = PlaybackPhase::Playing;
        app.reduce(Message::UtteranceFailed {
            utterance_id: 6,
            error: "old".into(),
        });
        assert_eq!(app.player.as_ref().unwrap().phase, PlaybackPhase::Playing);
        app.reduce(Message::UtteranceFailed {
            utterance_id: 7,
            error: "current".into(),
        });
        assert_eq!(app.player.as_ref().unwrap().phase, PlaybackPhase::Stopped);
    }

    #[test]
    fn new_search_drops_the_player_and_returns_to_selection() {
        let mut app = player_app(true);
        let pending_id = app.utterance_id;
        app.reduce(Message::NewSearch);
        assert!(app.player.is_none());
        assert_eq!(app.screen, Screen::Selection);
        assert_ne!(app.utterance_id, pending_id);
    }

    fn speak_id(effects: &[Effect]) -> u64 {
        match effects {
            [Effect::Speak { utterance_id, .. }] => *utterance_id,
            other => panic!("expected a single Speak effect, got {other:?}"),
        }
    }

    #[test]
    fn segment_switch_invalidates_a_pending_utterance() {
        let mut app = player_app(true);
        let pending_id = speak_id(&app.reduce(Message::TogglePlayPause));
        app.reduce(Message::SegmentClicked(1));
        assert_ne!(app.utterance_id, pending_id);
        // The old segment's audio arrives late and must be ignored.
        app.reduce(Message::UtterancePrepared {
            utterance_id: pending_id,
            file: PathBuf::from("/tmp/late.wav"),
            duration: Duration::from_secs(3),
        });
        let player = app.player.as_ref().unwrap();
        assert_eq!(player.phase, PlaybackPhase::Stopped);
        assert_eq!(player.current_idx, 1);
        assert_eq!(player.char_offset, 0);
    }

    #[test]
    fn toggling_while_preparing_cancels_instead_of_duplicating() {
        let mut app = player_app(true);
        let pending_id = speak_id(&app.reduce(Message::TogglePlayPause));
        assert_eq!(app.player.as_ref().unwrap().phase, PlaybackPhase::Preparing);
        let effects = app.reduce(Message::TogglePlayPause);
        assert!(effects.is_empty());
        assert_eq!(app.player.as_ref().unwrap().phase, PlaybackPhase::Stopped);
        assert_ne!(app.utterance_id, pending_id);
        app.reduce(Message::UtterancePrepared {
            utterance_id: pending_id,
            file: PathBuf::from("/tmp/cancelled.wav"),
            duration: Duration::from_secs(3),
        });
        assert_eq!(app.player.as_ref().unwrap().phase, PlaybackPhase::Stopped);
    }

    #[test]
    fn rate_change_while_preparing_rerequests_at_the_new_rate() {
        let mut app = player_app(true);
        let pending_id = speak_id(&app.reduce(Message::TogglePlayPause));
        let effects = app.reduce(Message::CycleRate);
        match effects.as_slice() {
            [Effect::Speak {
                utterance_id,
                rate,
                ..
            }] => {
                assert_ne!(*utterance_id, pending_id);
                assert!((rate - SYNTH_RATES[1]).abs() < f32::EPSILON);
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        assert_eq!(app.player.as_ref().unwrap().phase, PlaybackPhase::Preparing);
    }

    #[test]
    fn space_key_toggles_playback_on_the_player_screen() {
        let mut app = player_app(true);
        let effects = app.reduce(Message::KeyPressed {
            key: iced::keyboard::Key::Named(iced::keyboard::key::Named::Space),
            modifiers: iced::keyboard::Modifiers::default(),
        });
        assert!(matches!(effects.as_slice(), [Effect::Speak { .. }]));
    }

    #[test]
    fn tick_advances_progress_from_elapsed_time() {
        let mut app = player_app(true);
        let now = Instant::now();
        {
            let player = app.player.as_mut().unwrap();
            player.phase = PlaybackPhase::Playing;
            player.utterance_start = 4;
            player.utterance_chars = 10;
            player.utterance_duration = Duration::from_secs(2);
            player.started_at = now.checked_sub(Duration::from_secs(1));
        }
        app.reduce(Message::Tick(now));
        assert_eq!(app.player.as_ref().unwrap().char_offset, 9);
    }
}
