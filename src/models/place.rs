//! Lenient summary of a LocationIQ place, used for display.
//!
//! The client returns payloads untouched; this view only picks the fields the
//! CLI shows. LocationIQ sends ids and coordinates as strings, but numbers are
//! accepted too.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Place {
    #[serde(default, deserialize_with = "lenient_string")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub osm_id: Option<String>,
    #[serde(default)]
    pub osm_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lon: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Distance in meters from the queried point (nearby only).
    #[serde(default, deserialize_with = "lenient_string")]
    pub distance: Option<String>,
}

impl Place {
    /// Extracts every place from a payload: one for an object, one per
    /// element for an array. Elements that aren't objects are skipped.
    pub fn list_from(payload: &Value) -> Vec<Place> {
        match payload {
            Value::Array(items) => items.iter().filter_map(Self::from_value).collect(),
            Value::Object(_) => Self::from_value(payload).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn from_value(value: &Value) -> Option<Place> {
        match serde_json::from_value(value.clone()) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!("Skipping unrecognized place entry: {}", e);
                None
            },
        }
    }

    /// Best label for the place: its name, else its full display name.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.display_name.as_deref())
            .unwrap_or("-")
    }

    /// Identifier shown to users, preferring `place_id` over `osm_id`.
    pub fn id(&self) -> &str {
        self.place_id
            .as_deref()
            .or(self.osm_id.as_deref())
            .unwrap_or("-")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_from_search_array() {
        let payload = json!([
            {"place_id": "1", "lat": "51.5", "lon": "-0.12", "display_name": "London", "type": "city"},
            "garbage",
            {"place_id": 2, "lat": 52.1, "lon": 5.1, "display_name": "Utrecht"}
        ]);

        let places = Place::list_from(&payload);
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].kind.as_deref(), Some("city"));
        assert_eq!(places[1].id(), "2");
        assert_eq!(places[1].lat.as_deref(), Some("52.1"));
    }

    #[test]
    fn test_list_from_reverse_object() {
        let payload = json!({"place_id": "9", "display_name": "Tour Eiffel, Paris", "address": {}});
        let places = Place::list_from(&payload);

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].label(), "Tour Eiffel, Paris");
    }

    #[test]
    fn test_label_and_id_fallbacks() {
        let place = Place {
            osm_id: Some("77".to_string()),
            name: Some(String::new()),
            display_name: Some("Fallback".to_string()),
            distance: Some("12".to_string()),
            ..Place::default()
        };
        assert_eq!(place.id(), "77");
        assert_eq!(place.label(), "Fallback");
        assert_eq!(Place::default().label(), "-");
    }
}
