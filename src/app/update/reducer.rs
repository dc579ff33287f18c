use super::Effect;
use crate::app::messages::Message;
use crate::app::state::{App, Screen};
use iced::keyboard::key::Named;
use iced::keyboard::Key;
use std::time::Instant;
use tracing::trace;

impl App {
    /// Apply one message to the state and collect the side effects to run.
    pub(in crate::app) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            // Selection screen
            Message::QuestionChanged(question) => self.handle_question_changed(question),
            Message::CategoryToggled(idx) => self.handle_category_toggled(idx),
            Message::SubmitQuestion => self.handle_submit_question(&mut effects),

            // Loading screen
            Message::ArtworkFetched { request_id, result } => {
                self.handle_artwork_fetched(request_id, result)
            }
            Message::RetryFetch => self.handle_retry_fetch(&mut effects),
            Message::CancelLoading => self.handle_cancel_loading(),

            // Player screen
            Message::SegmentClicked(idx) => self.handle_segment_clicked(idx, &mut effects),
            Message::TogglePlayPause => self.handle_toggle_play_pause(&mut effects),
            Message::CycleRate => self.handle_cycle_rate(&mut effects),
            Message::ToggleHighlight => self.handle_toggle_highlight(),
            Message::DismissOverlay => self.handle_dismiss_overlay(),
            Message::NewSearch => self.handle_new_search(),
            Message::UtterancePrepared {
                utterance_id,
                file,
                duration,
            } => self.handle_utterance_prepared(utterance_id, file, duration),
            Message::UtteranceFailed {
                utterance_id,
                error,
            } => self.handle_utterance_failed(utterance_id, error),
            Message::Scrolled {
                absolute_y,
                viewport_height,
                content_height,
            } => self.handle_scrolled(absolute_y, viewport_height, content_height, &mut effects),

            // Window / input
            Message::WindowResized { width, height } => {
                if width.is_finite() && height.is_finite() {
                    self.config.window_width = width;
                    self.config.window_height = height;
                    effects.push(Effect::SaveConfig);
                }
            }
            Message::WindowMoved { x, y } => {
                if x.is_finite() && y.is_finite() {
                    self.config.window_pos_x = Some(x);
                    self.config.window_pos_y = Some(y);
                    effects.push(Effect::SaveConfig);
                }
            }
            Message::KeyPressed { key, modifiers } => {
                if modifiers.is_empty()
                    && self.screen == Screen::Player
                    && key == Key::Named(Named::Space)
                {
                    self.handle_toggle_play_pause(&mut effects);
                }
            }
            Message::Tick(now) => self.handle_tick(now),
        }
        effects
    }

    fn handle_tick(&mut self, now: Instant) {
        self.selection.expire_warning(now);
        let Some(player) = &mut self.player else {
            return;
        };
        if !player.is_playing() {
            return;
        }
        let finished = player
            .playback
            .as_ref()
            .map(|playback| playback.is_finished())
            .unwrap_or(false);
        if finished {
            trace!("Utterance drained; rewinding segment");
            player.finish_utterance();
        } else {
            let relative = player.spoken_relative(now);
            player.record_progress(relative);
        }
    }
}
