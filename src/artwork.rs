//! Wire types for the docent API and the canonical narration categories.

use serde::Deserialize;

/// Generated narration for one artwork, as returned by the question API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkData {
    pub artist_name: String,
    pub artwork_title: String,
    pub artwork_description: String,
    pub artist_description: String,
    pub artwork_background: String,
    pub appreciation_point: String,
    pub art_history: String,
}

/// Narration topics a visitor can ask for. The declaration order here is the
/// canonical playback order; selection order never reorders segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ArtworkIntro,
    ArtistIntro,
    Background,
    AppreciationPoint,
    ArtHistory,
}

pub const CANONICAL_CATEGORIES: [Category; 5] = [
    Category::ArtworkIntro,
    Category::ArtistIntro,
    Category::Background,
    Category::AppreciationPoint,
    Category::ArtHistory,
];

impl Category {
    /// Display label; also the value used on the wire.
    pub fn label(self) -> &'static str {
        match self {
            Category::ArtworkIntro => "작품 소개",
            Category::ArtistIntro => "작가 소개",
            Category::Background => "작품 배경",
            Category::AppreciationPoint => "관람 포인트",
            Category::ArtHistory => "미술사",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        CANONICAL_CATEGORIES
            .into_iter()
            .find(|category| category.label() == label)
    }

    /// The narrative field this category reads from.
    pub fn text(self, artwork: &ArtworkData) -> &str {
        match self {
            Category::ArtworkIntro => &artwork.artwork_description,
            Category::ArtistIntro => &artwork.artist_description,
            Category::Background => &artwork.artwork_background,
            Category::AppreciationPoint => &artwork.appreciation_point,
            Category::ArtHistory => &artwork.art_history,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a comma-joined label string back into categories, trimming
/// whitespace and dropping labels the app does not know.
pub fn parse_category_list(joined: &str) -> Vec<Category> {
    let mut seen = Vec::new();
    for part in joined.split(',') {
        if let Some(category) = Category::from_label(part.trim()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
    }
    seen
}

pub fn join_category_list(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(",")
}
