use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

// Venue lookup seam. The hosted product used a third-party place-search
// widget; behind this trait the provider stays swappable and mockable.
pub trait PlaceSearch {
    fn search(&self, query: &str) -> Vec<Place>;
}

// Table-driven provider: a bundled list of venues, optionally replaced by
// a user-supplied JSON file.
pub struct TablePlaces {
    places: Vec<Place>,
}

impl TablePlaces {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self {
            places: serde_json::from_str(json)?,
        })
    }

    pub fn builtin() -> Self {
        Self {
            places: vec![
                Place {
                    name: "그랜드홀 웨딩".to_string(),
                    address: "서울 강남구 테헤란로 123".to_string(),
                    lat: 37.498_095,
                    lng: 127.027_610,
                },
                Place {
                    name: "더채플 청담".to_string(),
                    address: "서울 강남구 선릉로 757".to_string(),
                    lat: 37.525_010,
                    lng: 127.047_540,
                },
                Place {
                    name: "아벤티움 웨딩홀".to_string(),
                    address: "서울 중구 청파로 464".to_string(),
                    lat: 37.559_800,
                    lng: 126.969_400,
                },
            ],
        }
    }
}

impl PlaceSearch for TablePlaces {
    fn search(&self, query: &str) -> Vec<Place> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.places
            .iter()
            .filter(|place| place.name.contains(query) || place.address.contains(query))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_name_or_address() {
        let provider = TablePlaces::builtin();
        assert_eq!(provider.search("그랜드홀").len(), 1);
        assert_eq!(provider.search("강남구").len(), 2);
        assert!(provider.search("부산").is_empty());
        assert!(provider.search("  ").is_empty());
    }

    #[test]
    fn provider_is_swappable_through_the_trait() {
        let provider = TablePlaces::from_json(
            r#"[{"name": "시청홀", "address": "서울 중구", "lat": 37.56, "lng": 126.97}]"#,
        )
        .unwrap();
        let provider: &dyn PlaceSearch = &provider;
        let hits = provider.search("시청홀");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].lat, 37.56);
    }
}
