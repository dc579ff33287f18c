use super::{scroll, Effect};
use crate::api::{ApiError, QuestionRequest};
use crate::app::messages::Message;
use crate::app::state::{App, SEGMENT_SCROLL_ID};
use crate::config::save_config;
use crate::store;
use iced::event::{self, Event};
use iced::widget::scrollable;
use iced::{keyboard, window, Task};
use std::path::Path;
use tracing::{debug, warn};

const CONFIG_PATH: &str = "conf/config.toml";

impl App {
    /// Turn one reducer effect into an iced task.
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::SaveConfig => {
                save_config(Path::new(CONFIG_PATH), &self.config);
                Task::none()
            }
            Effect::FetchArtwork {
                request_id,
                question,
                category,
            } => {
                let Some(client) = self.client.clone() else {
                    warn!("No API client; failing the narration request locally");
                    return Task::done(Message::ArtworkFetched {
                        request_id,
                        result: Err(ApiError::Network(
                            "API 서버 설정이 없습니다".to_string(),
                        )),
                    });
                };
                let cancel = self.fetch_cancel.clone();
                Task::perform(
                    async move {
                        let request = QuestionRequest { question, category };
                        let result = client.fetch_description(&request, &cancel);
                        Message::ArtworkFetched { request_id, result }
                    },
                    |message| message,
                )
            }
            Effect::Speak {
                utterance_id,
                text,
                rate,
            } => {
                let Some(engine) = self.engine.clone() else {
                    return Task::done(Message::UtteranceFailed {
                        utterance_id,
                        error: "음성 엔진이 준비되지 않았습니다".to_string(),
                    });
                };
                let cache_root = store::speech_cache_dir();
                Task::perform(
                    async move {
                        match engine.synthesize(cache_root, &text, rate) {
                            Ok((file, duration)) => Message::UtterancePrepared {
                                utterance_id,
                                file,
                                duration,
                            },
                            Err(err) => Message::UtteranceFailed {
                                utterance_id,
                                error: format!("{err:?}"),
                            },
                        }
                    },
                    |message| message,
                )
            }
            Effect::ScrollToSegment(idx) => {
                if let Some(player) = &mut self.player {
                    match scroll::segment_scroll_offset(player, idx) {
                        Some(offset) => {
                            player.pending_snap = None;
                            return scrollable::snap_to(SEGMENT_SCROLL_ID.clone(), offset);
                        }
                        None => {
                            // Heights not measured yet; retried on the next
                            // scroll geometry update.
                            debug!(segment = idx, "Deferring snap until heights are known");
                            player.pending_snap = Some(idx);
                        }
                    }
                }
                Task::none()
            }
            Effect::ScrollTo(offset) => scrollable::snap_to(SEGMENT_SCROLL_ID.clone(), offset),
            Effect::MarkOverlaySeen => {
                store::save_overlay_seen();
                Task::none()
            }
        }
    }
}

/// Map runtime events to app messages. Key presses already captured by a
/// widget (the question input, mainly) are left alone.
pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Window(window::Event::Moved(position)) => Some(Message::WindowMoved {
            x: position.x,
            y: position.y,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}
