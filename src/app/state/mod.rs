mod constants;
mod loading;
mod player;
mod selection;

pub(crate) use constants::*;
pub(in crate::app) use loading::{LoadingPhase, LoadingState};
pub(in crate::app) use player::{PlaybackPhase, PlayerState};
pub(in crate::app) use selection::SelectionState;

use super::messages::Message;
use crate::api::DocentClient;
use crate::cancellation::CancellationToken;
use crate::config::AppConfig;
use crate::speech::SpeechEngine;
use iced::Task;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Which of the three screens is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Selection,
    Loading,
    Player,
}

/// Top-level application state.
///
/// `request_id` and `utterance_id` are monotonically increasing tags;
/// results arriving with an old tag are dropped, which keeps late network
/// responses and stale synthesis output from clobbering the current screen.
pub struct App {
    pub(super) screen: Screen,
    pub(super) selection: SelectionState,
    pub(super) loading: Option<LoadingState>,
    pub(super) player: Option<PlayerState>,
    pub(super) config: AppConfig,
    pub(super) engine: Option<SpeechEngine>,
    pub(super) client: Option<DocentClient>,
    pub(super) request_id: u64,
    pub(super) utterance_id: u64,
    pub(super) fetch_cancel: CancellationToken,
}

impl App {
    pub fn bootstrap(mut config: AppConfig) -> (App, Task<Message>) {
        clamp_config(&mut config);

        let engine = match SpeechEngine::new(
            PathBuf::from(&config.tts_model_path),
            PathBuf::from(&config.tts_espeak_path),
        ) {
            Ok(engine) => Some(engine),
            Err(err) => {
                warn!("Speech engine unavailable: {err:?}");
                None
            }
        };
        let client = match DocentClient::new(
            &config.api_base_url,
            Duration::from_secs_f32(config.request_timeout_secs),
        ) {
            Ok(client) => Some(client),
            Err(err) => {
                warn!("API client unavailable: {err}");
                None
            }
        };

        let app = App {
            screen: Screen::Selection,
            selection: SelectionState::new(),
            loading: None,
            player: None,
            config,
            engine,
            client,
            request_id: 0,
            utterance_id: 0,
            fetch_cancel: CancellationToken::new(),
        };
        (app, Task::none())
    }
}

/// Keep configured values inside ranges the UI can actually render.
fn clamp_config(config: &mut AppConfig) {
    config.font_size = config.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    config.line_spacing = config.line_spacing.clamp(1.0, 2.5);
    config.window_width = config.window_width.clamp(320.0, 7680.0);
    config.window_height = config.window_height.clamp(240.0, 4320.0);
    config.request_timeout_secs = config.request_timeout_secs.clamp(1.0, 120.0);
    config.tts_volume = config.tts_volume.clamp(0.0, 2.0);
    if config.window_pos_x.map(|x| !x.is_finite()).unwrap_or(false) {
        config.window_pos_x = None;
    }
    if config.window_pos_y.map(|y| !y.is_finite()).unwrap_or(false) {
        config.window_pos_y = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping_pulls_values_into_range() {
        let mut config = AppConfig {
            font_size: 99,
            line_spacing: 0.1,
            window_width: 10.0,
            window_height: 99_999.0,
            request_timeout_secs: 0.0,
            tts_volume: 9.0,
            window_pos_x: Some(f32::NAN),
            ..AppConfig::default()
        };
        clamp_config(&mut config);
        assert_eq!(config.font_size, MAX_FONT_SIZE);
        assert!((config.line_spacing - 1.0).abs() < f32::EPSILON);
        assert!((config.window_width - 320.0).abs() < f32::EPSILON);
        assert!((config.window_height - 4320.0).abs() < f32::EPSILON);
        assert!((config.request_timeout_secs - 1.0).abs() < f32::EPSILON);
        assert!((config.tts_volume - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.window_pos_x, None);
    }

    #[test]
    fn defaults_survive_clamping_unchanged() {
        let mut config = AppConfig::default();
        let before = config.clone();
        clamp_config(&mut config);
        assert_eq!(config.font_size, before.font_size);
        assert!((config.window_width - before.window_width).abs() < f32::EPSILON);
    }
}
