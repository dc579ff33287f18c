//! Message handling, split into a pure reducer and an effect runner.
//!
//! `reduce` mutates state and returns the side effects to perform; `run_effect`
//! turns each effect into an iced task. Tests drive the reducer directly and
//! assert on the returned effects without touching audio or the network.

mod loading;
mod player;
mod reducer;
mod runtime;
mod scroll;
mod selection;

#[cfg(test)]
pub(in crate::app) mod tests;

use super::messages::Message;
use super::state::App;
use iced::widget::scrollable::RelativeOffset;
use iced::{event, time, Subscription, Task};
use std::time::Duration;

/// Side effects requested by the reducer.
#[derive(Debug, Clone)]
pub(super) enum Effect {
    SaveConfig,
    FetchArtwork {
        request_id: u64,
        question: String,
        category: String,
    },
    Speak {
        utterance_id: u64,
        text: String,
        rate: f32,
    },
    ScrollToSegment(usize),
    ScrollTo(RelativeOffset),
    MarkOverlaySeen,
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
    }

    /// Window/keyboard events always; a coarse tick only while something is
    /// actually advancing (speech progress or a warning waiting to expire).
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![event::listen_with(runtime::runtime_event_to_message)];
        let playing = self
            .player
            .as_ref()
            .map(|player| player.is_playing())
            .unwrap_or(false);
        let warning_pending = self.selection.warning.is_some();
        if playing || warning_pending {
            subscriptions.push(time::every(Duration::from_millis(100)).map(Message::Tick));
        }
        Subscription::batch(subscriptions)
    }
}
