use super::Effect;
use crate::api::ApiError;
use crate::app::state::{App, LoadingPhase, PlayerState, Screen};
use crate::artwork::{parse_category_list, ArtworkData};
use crate::cancellation::CancellationToken;
use crate::store;
use tracing::{debug, info, warn};

impl App {
    /// A narration response arrived. Stale and cancelled results are dropped;
    /// a live failure flips the loading screen into its failed state.
    pub(super) fn handle_artwork_fetched(
        &mut self,
        request_id: u64,
        result: Result<ArtworkData, ApiError>,
    ) {
        if request_id != self.request_id {
            debug!(request_id, current = self.request_id, "Dropping stale narration response");
            return;
        }
        match result {
            Ok(artwork) => {
                let Some(loading) = self.loading.take() else {
                    debug!("Narration arrived with no loading screen; ignoring");
                    return;
                };
                let selected = parse_category_list(&loading.category);
                let overlay_seen = store::load_overlay_seen();
                info!(
                    title = %artwork.artwork_title,
                    artist = %artwork.artist_name,
                    "Narration ready"
                );
                let mut player = PlayerState::new(&artwork, &selected, overlay_seen);
                super::scroll::seed_scroll_geometry(&mut player, &self.config);
                self.player = Some(player);
                self.screen = Screen::Player;
            }
            Err(ApiError::Cancelled) => {
                debug!("Narration request was cancelled");
            }
            Err(err) => {
                warn!("Narration request failed: {err}");
                if let Some(loading) = &mut self.loading {
                    loading.phase = LoadingPhase::Failed(err.to_string());
                }
            }
        }
    }

    pub(super) fn handle_retry_fetch(&mut self, effects: &mut Vec<Effect>) {
        let Some(loading) = &mut self.loading else {
            return;
        };
        loading.phase = LoadingPhase::InFlight;
        let question = loading.question.clone();
        let category = loading.category.clone();
        self.fetch_cancel = CancellationToken::new();
        self.request_id = self.request_id.wrapping_add(1);
        info!(request_id = self.request_id, "Retrying narration request");
        effects.push(Effect::FetchArtwork {
            request_id: self.request_id,
            question,
            category,
        });
    }

    /// Abandon the in-flight request and go back to the selection screen.
    pub(super) fn handle_cancel_loading(&mut self) {
        self.fetch_cancel.cancel();
        self.request_id = self.request_id.wrapping_add(1);
        self.loading = None;
        self.screen = Screen::Selection;
    }
}
