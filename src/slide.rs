use crate::constants::DEFAULT_SLIDE_DURATION_MS;
use crate::invitation::{AccountInfo, TransportationInfo};

// Opening page: who invites, when and where.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroPage {
    pub headline: String,
    pub groom_line: String,
    pub bride_line: String,
    pub date_line: String,
    pub time_line: String,
    pub venue_line: String,
    pub hall_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLink {
    pub label: String,
    pub url: String,
}

// Terminal "details" page: directions and gift accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsPage {
    pub venue: String,
    pub hall: String,
    pub address: String,
    pub map_links: Vec<MapLink>,
    pub transportation: Vec<TransportationInfo>,
    pub groom_accounts: Vec<AccountInfo>,
    pub bride_accounts: Vec<AccountInfo>,
}

// The playback engine never inspects this; only the viewer renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideContent {
    Intro(IntroPage),
    Caption(String),
    Details(DetailsPage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub id: usize,
    // Relative media path; None for the terminal page (and for photos that
    // failed to import, which still take part in timing).
    pub image_path: Option<String>,
    pub content: SlideContent,
    pub duration_ms: Option<i64>,
    pub is_terminal: bool,
}

impl Slide {
    // Absent, zero and negative durations all fall back to the default.
    pub fn effective_duration_ms(&self) -> f32 {
        match self.duration_ms {
            Some(d) if d > 0 => d as f32,
            _ => DEFAULT_SLIDE_DURATION_MS,
        }
    }
}
