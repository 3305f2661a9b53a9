use thiserror::Error;

use crate::constants::{MAX_PHOTOS, MIN_PHOTOS};
use crate::invitation::{AccountSide, Invitation};
use crate::messages;
use crate::slide::{DetailsPage, IntroPage, MapLink, Slide, SlideContent};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("expected 6 to 10 photos, got {0}")]
    PhotoCount(usize),
    #[error("unknown message set {0:?}")]
    UnknownMessageSet(String),
    #[error("wedding date {0:?} is not a valid YYYY-MM-DD date")]
    BadDate(String),
}

// Maps an invitation record to the ordered slide sequence the playback
// engine consumes: intro, one captioned photo per remaining image, then
// the terminal details page. Pure data transformation.
pub fn build_story(invitation: &Invitation) -> Result<Vec<Slide>, StoryError> {
    let photo_count = invitation.image_paths.len();
    if !(MIN_PHOTOS..=MAX_PHOTOS).contains(&photo_count) {
        return Err(StoryError::PhotoCount(photo_count));
    }
    let set = messages::find(&invitation.message_set_id)
        .ok_or_else(|| StoryError::UnknownMessageSet(invitation.message_set_id.clone()))?;
    let captions = set
        .captions_for(photo_count)
        .ok_or(StoryError::PhotoCount(photo_count))?;

    let mut slides = Vec::with_capacity(photo_count + 1);
    slides.push(Slide {
        id: 0,
        image_path: Some(invitation.image_paths[0].clone()),
        content: SlideContent::Intro(intro_page(invitation)?),
        duration_ms: None,
        is_terminal: false,
    });
    for (index, caption) in captions.iter().enumerate() {
        slides.push(Slide {
            id: index + 1,
            image_path: Some(invitation.image_paths[index + 1].clone()),
            content: SlideContent::Caption((*caption).to_string()),
            duration_ms: None,
            is_terminal: false,
        });
    }
    slides.push(Slide {
        id: slides.len(),
        image_path: None,
        content: SlideContent::Details(details_page(invitation)),
        duration_ms: None,
        is_terminal: true,
    });
    Ok(slides)
}

fn intro_page(invitation: &Invitation) -> Result<IntroPage, StoryError> {
    let groom_parents = parents_line(&invitation.groom_father_name, &invitation.groom_mother_name);
    let bride_parents = parents_line(&invitation.bride_father_name, &invitation.bride_mother_name);
    let groom_line = match groom_parents {
        Some(parents) => format!("{parents}의 아들 신랑 {}", invitation.groom_name),
        None => format!("신랑 {}", invitation.groom_name),
    };
    let bride_line = match bride_parents {
        Some(parents) => format!("{parents}의 딸 신부 {}", invitation.bride_name),
        None => format!("신부 {}", invitation.bride_name),
    };
    Ok(IntroPage {
        headline: "초대합니다".to_string(),
        groom_line,
        bride_line,
        date_line: format_wedding_date(invitation)?,
        time_line: invitation.wedding_time.clone(),
        venue_line: invitation.wedding_location.clone(),
        hall_line: non_empty(&invitation.wedding_hall),
    })
}

fn details_page(invitation: &Invitation) -> DetailsPage {
    DetailsPage {
        venue: invitation.wedding_location.clone(),
        hall: invitation.wedding_hall.clone(),
        address: invitation.wedding_address.clone(),
        map_links: map_links(invitation),
        transportation: invitation.transportation_infos.clone(),
        groom_accounts: invitation.accounts_for(AccountSide::Groom),
        bride_accounts: invitation.accounts_for(AccountSide::Bride),
    }
}

// Map deep links only exist when the venue has coordinates.
fn map_links(invitation: &Invitation) -> Vec<MapLink> {
    let (Some(lat), Some(lng)) = (invitation.wedding_lat, invitation.wedding_lng) else {
        return Vec::new();
    };
    let name = urlencoding::encode(&invitation.wedding_location).into_owned();
    vec![
        MapLink {
            label: "카카오맵".to_string(),
            url: format!("https://map.kakao.com/link/map/{name},{lat},{lng}"),
        },
        MapLink {
            label: "네이버지도".to_string(),
            url: format!("https://map.naver.com/v5/search/{name}?lat={lat}&lng={lng}"),
        },
    ]
}

// "아버지 · 어머니", either side optional; None when both are absent.
fn parents_line(father: &str, mother: &str) -> Option<String> {
    let line = [father, mother]
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    if line.is_empty() { None } else { Some(line) }
}

// "2026년 10월 24일 토요일"
fn format_wedding_date(invitation: &Invitation) -> Result<String, StoryError> {
    const WEEKDAYS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];
    let date = invitation
        .parsed_date()
        .map_err(|_| StoryError::BadDate(invitation.wedding_date.clone()))?;
    use chrono::Datelike;
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    Ok(format!(
        "{}년 {}월 {}일 {}요일",
        date.year(),
        date.month(),
        date.day(),
        weekday
    ))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
