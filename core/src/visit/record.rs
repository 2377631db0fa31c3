use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque visit identifier; the backend hands out either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VisitId {
    Number(i64),
    Text(String),
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitId::Number(value) => write!(f, "{value}"),
            VisitId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for VisitId {
    fn from(value: i64) -> Self {
        VisitId::Number(value)
    }
}

impl From<&str> for VisitId {
    fn from(value: &str) -> Self {
        VisitId::Text(value.to_string())
    }
}

impl From<String> for VisitId {
    fn from(value: String) -> Self {
        VisitId::Text(value)
    }
}

impl FromStr for VisitId {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(value
            .trim()
            .parse::<i64>()
            .map(VisitId::Number)
            .unwrap_or_else(|_| VisitId::Text(value.trim().to_string())))
    }
}

/// One logged visit to a place.
///
/// Only `id`, the coordinates and `accent_color` affect the map; the
/// remaining fields are display data carried through for the host screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: VisitId,
    #[serde(alias = "placeName", alias = "name")]
    pub place_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[serde(default, alias = "visitedAt", skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "accentColor",
        alias = "color",
        skip_serializing_if = "Option::is_none"
    )]
    pub accent_color: Option<String>,
    #[serde(default, alias = "xp", skip_serializing_if = "Option::is_none")]
    pub xp_earned: Option<u32>,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, alias = "cost", skip_serializing_if = "Option::is_none")]
    pub spent_amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Backend fields the map does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl VisitRecord {
    pub fn new(
        id: impl Into<VisitId>,
        place_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            place_name: place_name.into(),
            category: String::new(),
            latitude,
            longitude,
            visited_at: None,
            accent_color: None,
            xp_earned: None,
            duration_minutes: None,
            spent_amount: None,
            rating: None,
            mood: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_accent(mut self, accent_color: impl Into<String>) -> Self {
        self.accent_color = Some(accent_color.into());
        self
    }

    pub fn with_visited_at(mut self, visited_at: DateTime<Utc>) -> Self {
        self.visited_at = Some(visited_at);
        self
    }

    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_id_parses_numbers_and_text() {
        assert_eq!("42".parse::<VisitId>().unwrap(), VisitId::Number(42));
        assert_eq!(
            "visit-a1".parse::<VisitId>().unwrap(),
            VisitId::Text("visit-a1".into())
        );
    }

    #[test]
    fn record_accepts_frontend_field_names() {
        let record: VisitRecord = serde_json::from_str(
            r##"{"id": 1, "name": "Yeonnam Book Cafe", "category": "book cafe",
                "lat": 37.5656, "lon": 126.9254, "xp": 150, "color": "#E8740C",
                "vibe": ["cozy", "quiet"]}"##,
        )
        .unwrap();
        assert_eq!(record.id, VisitId::Number(1));
        assert_eq!(record.place_name, "Yeonnam Book Cafe");
        assert_eq!(record.accent_color.as_deref(), Some("#E8740C"));
        assert_eq!(record.xp_earned, Some(150));
        assert!(record.extra.contains_key("vibe"));
    }

    #[test]
    fn record_accepts_backend_field_names() {
        let record: VisitRecord = serde_json::from_str(
            r#"{"id": "v-9", "place_name": "Hidden Garden", "latitude": 37.5347,
                "longitude": 127.0023, "visited_at": "2025-02-12T11:00:00Z",
                "duration_minutes": 45, "xp_earned": 100, "spent_amount": 0}"#,
        )
        .unwrap();
        assert_eq!(record.id, VisitId::Text("v-9".into()));
        assert_eq!(record.duration_minutes, Some(45));
        assert!(record.visited_at.is_some());
        assert!(record.category.is_empty());
    }
}
