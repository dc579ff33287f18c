use crate::artwork::{Category, CANONICAL_CATEGORIES};
use std::time::{Duration, Instant};

use super::constants::WARNING_VISIBLE_SECS;

/// One toggleable topic chip on the selection screen.
#[derive(Debug, Clone)]
pub struct CategoryChip {
    pub category: Category,
    pub selected: bool,
}

/// State of the artwork/topic selection screen. Chips start all selected so a
/// visitor can just type a name and submit.
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub(in crate::app) question: String,
    pub(in crate::app) chips: Vec<CategoryChip>,
    pub(in crate::app) warning: Option<String>,
    pub(in crate::app) warning_until: Option<Instant>,
}

impl SelectionState {
    pub(in crate::app) fn new() -> Self {
        SelectionState {
            question: String::new(),
            chips: CANONICAL_CATEGORIES
                .iter()
                .map(|&category| CategoryChip {
                    category,
                    selected: true,
                })
                .collect(),
            warning: None,
            warning_until: None,
        }
    }

    pub(in crate::app) fn toggle_chip(&mut self, idx: usize) {
        if let Some(chip) = self.chips.get_mut(idx) {
            chip.selected = !chip.selected;
        }
    }

    /// Selected categories in canonical order.
    pub(in crate::app) fn selected_categories(&self) -> Vec<Category> {
        self.chips
            .iter()
            .filter(|chip| chip.selected)
            .map(|chip| chip.category)
            .collect()
    }

    pub(in crate::app) fn set_warning(&mut self, message: &str, now: Instant) {
        self.warning = Some(message.to_string());
        self.warning_until = Some(now + Duration::from_secs_f32(WARNING_VISIBLE_SECS));
    }

    pub(in crate::app) fn expire_warning(&mut self, now: Instant) {
        if let Some(until) = self.warning_until {
            if now >= until {
                self.warning = None;
                self.warning_until = None;
            }
        }
    }
}
