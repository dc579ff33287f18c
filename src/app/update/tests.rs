//! Shared fixtures for reducer tests. No engine, no client: effects are
//! inspected, never executed.

use crate::app::state::{App, PlayerState, Screen, SelectionState};
use crate::artwork::{ArtworkData, Category};
use crate::cancellation::CancellationToken;
use crate::config::AppConfig;

pub(in crate::app) fn sample_artwork() -> ArtworkData {
    ArtworkData {
        artist_name: "빈센트 반 고흐".into(),
        artwork_title: "해바라기".into(),
        artwork_description: "노란 해바라기를 그린 정물화입니다.".into(),
        artist_description: "후기 인상주의를 대표하는 화가입니다.".into(),
        artwork_background: "아를 시기에 그려졌습니다.".into(),
        appreciation_point: "두터운 붓질을 눈여겨 보세요.".into(),
        art_history: "정물화 전통을 새로 썼습니다.".into(),
    }
}

pub(in crate::app) fn bare_app() -> App {
    App {
        screen: Screen::Selection,
        selection: SelectionState::new(),
        loading: None,
        player: None,
        config: AppConfig::default(),
        engine: None,
        client: None,
        request_id: 0,
        utterance_id: 0,
        fetch_cancel: CancellationToken::new(),
    }
}

pub(in crate::app) fn player_app(overlay_seen: bool) -> App {
    let artwork = sample_artwork();
    let player = PlayerState::new(
        &artwork,
        &[
            Category::ArtworkIntro,
            Category::ArtistIntro,
            Category::ArtHistory,
        ],
        overlay_seen,
    );
    let mut app = bare_app();
    app.screen = Screen::Player;
    app.player = Some(player);
    app
}
