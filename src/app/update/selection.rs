use super::Effect;
use crate::app::state::{App, LoadingPhase, LoadingState, Screen};
use crate::artwork::join_category_list;
use crate::cancellation::CancellationToken;
use std::time::Instant;
use tracing::info;

impl App {
    pub(super) fn handle_question_changed(&mut self, question: String) {
        self.selection.question = question;
    }

    pub(super) fn handle_category_toggled(&mut self, idx: usize) {
        self.selection.toggle_chip(idx);
    }

    /// Validate the form and kick off the narration request. Each submission
    /// gets a fresh request id and cancellation token.
    pub(super) fn handle_submit_question(&mut self, effects: &mut Vec<Effect>) {
        let question = self.selection.question.trim().to_string();
        if question.is_empty() {
            self.selection
                .set_warning("작품과 작가 이름을 입력해주세요!", Instant::now());
            return;
        }
        let selected = self.selection.selected_categories();
        if selected.is_empty() {
            self.selection
                .set_warning("키워드를 한 개 이상 선택해주세요!", Instant::now());
            return;
        }

        let category = join_category_list(&selected);
        self.fetch_cancel = CancellationToken::new();
        self.request_id = self.request_id.wrapping_add(1);
        self.loading = Some(LoadingState {
            question: question.clone(),
            category: category.clone(),
            phase: LoadingPhase::InFlight,
        });
        self.screen = Screen::Loading;
        info!(request_id = self.request_id, %category, "Submitting narration request");
        effects.push(Effect::FetchArtwork {
            request_id: self.request_id,
            question,
            category,
        });
    }
}
