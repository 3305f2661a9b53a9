use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_PHOTOS, MIN_PHOTOS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountSide {
    Groom,
    Bride,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub side: AccountSide,
    pub relationship: String,
    pub holder: String,
    pub bank: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationInfo {
    pub title: String,
    pub description: String,
}

// One stored invitation document. Empty strings mean "not provided" for the
// optional name fields, so form files can simply omit nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub groom_name: String,
    pub bride_name: String,
    #[serde(default)]
    pub groom_english_first_name: String,
    #[serde(default)]
    pub groom_english_last_name: String,
    #[serde(default)]
    pub bride_english_first_name: String,
    #[serde(default)]
    pub bride_english_last_name: String,
    #[serde(default)]
    pub groom_father_name: String,
    #[serde(default)]
    pub groom_mother_name: String,
    #[serde(default)]
    pub bride_father_name: String,
    #[serde(default)]
    pub bride_mother_name: String,
    pub wedding_date: String, // ISO YYYY-MM-DD
    #[serde(default)]
    pub wedding_time: String,
    pub wedding_location: String,
    #[serde(default)]
    pub wedding_hall: String,
    #[serde(default)]
    pub wedding_address: String,
    #[serde(default)]
    pub wedding_lat: Option<f64>,
    #[serde(default)]
    pub wedding_lng: Option<f64>,
    #[serde(default)]
    pub transportation_infos: Vec<TransportationInfo>,
    pub message_set_id: String,
    #[serde(default)]
    pub accounts: Vec<AccountInfo>,
    // Paths relative to the storage root, in display order.
    #[serde(default)]
    pub image_paths: Vec<String>,
    #[serde(default)]
    pub created_at: i64, // epoch millis
    #[serde(default)]
    pub expires_at: i64, // epoch millis, 0 = never
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvitationError {
    #[error("groom and bride names are both required")]
    MissingNames,
    #[error("wedding date {0:?} is not a valid YYYY-MM-DD date")]
    BadDate(String),
    #[error("expected 6 to 10 photos, got {0}")]
    PhotoCount(usize),
}

impl Invitation {
    pub fn validate(&self) -> Result<(), InvitationError> {
        if self.groom_name.trim().is_empty() || self.bride_name.trim().is_empty() {
            return Err(InvitationError::MissingNames);
        }
        self.parsed_date()?;
        if !(MIN_PHOTOS..=MAX_PHOTOS).contains(&self.image_paths.len()) {
            return Err(InvitationError::PhotoCount(self.image_paths.len()));
        }
        Ok(())
    }

    pub fn parsed_date(&self) -> Result<NaiveDate, InvitationError> {
        NaiveDate::parse_from_str(&self.wedding_date, "%Y-%m-%d")
            .map_err(|_| InvitationError::BadDate(self.wedding_date.clone()))
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at > 0 && self.expires_at <= now_ms
    }

    pub fn couple_headline(&self) -> String {
        format!("{} ❤️ {} 결혼합니다", self.groom_name, self.bride_name)
    }

    pub fn accounts_for(&self, side: AccountSide) -> Vec<AccountInfo> {
        self.accounts
            .iter()
            .filter(|a| a.side == side)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample(photos: usize) -> Invitation {
        Invitation {
            groom_name: "김민규".to_string(),
            bride_name: "이윤주".to_string(),
            groom_english_first_name: "Minkyu".to_string(),
            groom_english_last_name: "Kim".to_string(),
            bride_english_first_name: "Yoonjou".to_string(),
            bride_english_last_name: "Lee".to_string(),
            groom_father_name: "김철수".to_string(),
            groom_mother_name: "박영희".to_string(),
            bride_father_name: "이영호".to_string(),
            bride_mother_name: String::new(),
            wedding_date: "2026-10-24".to_string(),
            wedding_time: "오후 1시".to_string(),
            wedding_location: "그랜드홀 웨딩".to_string(),
            wedding_hall: "3층 아모르홀".to_string(),
            wedding_address: "서울시 강남구".to_string(),
            wedding_lat: Some(37.498),
            wedding_lng: Some(127.027),
            transportation_infos: vec![TransportationInfo {
                title: "지하철".to_string(),
                description: "2호선 강남역 3번 출구 도보 5분".to_string(),
            }],
            message_set_id: "serene".to_string(),
            accounts: vec![
                AccountInfo {
                    side: AccountSide::Groom,
                    relationship: "신랑".to_string(),
                    holder: "김민규".to_string(),
                    bank: "국민은행".to_string(),
                    number: "123-456-789".to_string(),
                },
                AccountInfo {
                    side: AccountSide::Bride,
                    relationship: "신부".to_string(),
                    holder: "이윤주".to_string(),
                    bank: "신한은행".to_string(),
                    number: "987-654-321".to_string(),
                },
            ],
            image_paths: (0..photos).map(|i| format!("media/test/{i:03}.jpg")).collect(),
            created_at: 1_700_000_000_000,
            expires_at: 0,
        }
    }

    #[test]
    fn valid_sample_passes() {
        assert_eq!(sample(6).validate(), Ok(()));
    }

    #[test]
    fn missing_names_rejected() {
        let mut inv = sample(6);
        inv.bride_name = "  ".to_string();
        assert_eq!(inv.validate(), Err(InvitationError::MissingNames));
    }

    #[test]
    fn bad_date_rejected() {
        let mut inv = sample(6);
        inv.wedding_date = "24/10/2026".to_string();
        assert!(matches!(inv.validate(), Err(InvitationError::BadDate(_))));
    }

    #[test]
    fn photo_count_bounds() {
        assert!(matches!(sample(5).validate(), Err(InvitationError::PhotoCount(5))));
        assert!(matches!(sample(11).validate(), Err(InvitationError::PhotoCount(11))));
        assert_eq!(sample(10).validate(), Ok(()));
    }

    #[test]
    fn expiry_uses_epoch_millis() {
        let mut inv = sample(6);
        assert!(!inv.is_expired(i64::MAX)); // 0 means never
        inv.expires_at = 1_000;
        assert!(inv.is_expired(1_000));
        assert!(!inv.is_expired(999));
    }

    #[test]
    fn accounts_split_by_side() {
        let inv = sample(6);
        assert_eq!(inv.accounts_for(AccountSide::Groom).len(), 1);
        assert_eq!(inv.accounts_for(AccountSide::Bride).len(), 1);
    }

    #[test]
    fn record_round_trips_as_json() {
        let inv = sample(7);
        let json = serde_json::to_string(&inv).unwrap();
        let back: Invitation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inv);
    }
}
