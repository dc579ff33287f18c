use crate::api::ApiError;
use crate::artwork::ArtworkData;
use iced::keyboard::{Key, Modifiers};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Messages emitted by the UI and by background tasks.
#[derive(Debug, Clone)]
pub enum Message {
    // Selection screen
    QuestionChanged(String),
    CategoryToggled(usize),
    SubmitQuestion,

    // Loading screen
    ArtworkFetched {
        request_id: u64,
        result: Result<ArtworkData, ApiError>,
    },
    RetryFetch,
    CancelLoading,

    // Player screen
    SegmentClicked(usize),
    TogglePlayPause,
    CycleRate,
    ToggleHighlight,
    DismissOverlay,
    NewSearch,
    UtterancePrepared {
        utterance_id: u64,
        file: PathBuf,
        duration: Duration,
    },
    UtteranceFailed {
        utterance_id: u64,
        error: String,
    },
    Scrolled {
        absolute_y: f32,
        viewport_height: f32,
        content_height: f32,
    },

    // Window / input
    WindowResized {
        width: f32,
        height: f32,
    },
    WindowMoved {
        x: f32,
        y: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    Tick(Instant),
}
