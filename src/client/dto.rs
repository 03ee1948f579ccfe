//! Wire types for the analytics backend

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::identity::AnonymousId;

// ============================================
// Outbound
// ============================================

/// Demographic profile sent to `POST /analytics/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: AnonymousId,
    pub gender: String,
    pub location: String,
    pub education: String,
    pub skills: Vec<String>,
    pub channel: String,
}

/// Event sent to `POST /analytics/track`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub user_id: AnonymousId,
    pub event_type: String,
    pub page: String,
    pub properties: EventProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProperties {
    pub channel: String,
}

impl TrackEvent {
    /// A `page_view` event for one page
    pub fn page_view(user_id: AnonymousId, page: &str, channel: &str) -> Self {
        Self {
            user_id,
            event_type: "page_view".to_string(),
            page: page.to_string(),
            properties: EventProperties {
                channel: channel.to_string(),
            },
        }
    }
}

// ============================================
// Inbound
// ============================================

/// Aggregated analytics snapshot from `GET /analytics/overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub samples: Samples,
    #[serde(default)]
    pub channels: CountMap,
    #[serde(default)]
    pub pages: CountMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demographics: Demographics,
}

/// A `null` section reads the same as a missing one
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    #[serde(default)]
    pub events: Option<u64>,
    #[serde(default)]
    pub users: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default)]
    pub gender: CountMap,
    #[serde(default)]
    pub education: CountMap,
    #[serde(default)]
    pub location: CountMap,
    #[serde(default)]
    pub age_buckets: CountMap,
}

/// Label to count mapping that keeps the order of the JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap {
    entries: Vec<(String, u64)>,
}

impl CountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; a new label goes to the end
    pub fn insert(&mut self, label: impl Into<String>, count: u64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((label, count)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Sum of all counts, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, c)| *c)
            .fold(0u64, u64::saturating_add)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, u64)> for CountMap {
    fn from_iter<I: IntoIterator<Item = (L, u64)>>(iter: I) -> Self {
        let mut map = CountMap::new();
        for (label, count) in iter {
            map.insert(label, count);
        }
        map
    }
}

impl Serialize for CountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CountMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountMapVisitor;

        impl<'de> Visitor<'de> for CountMapVisitor {
            type Value = CountMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of label to count")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<CountMap, E> {
                Ok(CountMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CountMap, A::Error> {
                let mut map = CountMap::new();
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    map.insert(label, count);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_any(CountMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AnonymousId {
        serde_json::from_str("\"anon_abc12345\"").unwrap()
    }

    #[test]
    fn test_user_profile_body() {
        let profile = UserProfile {
            user_id: user(),
            gender: "prefer_not_to_say".to_string(),
            location: "Demo City".to_string(),
            education: "Graduate".to_string(),
            skills: vec!["javascript".to_string(), "react".to_string()],
            channel: "Website".to_string(),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "anon_abc12345",
                "gender": "prefer_not_to_say",
                "location": "Demo City",
                "education": "Graduate",
                "skills": ["javascript", "react"],
                "channel": "Website",
            })
        );
    }

    #[test]
    fn test_page_view_body() {
        let event = TrackEvent::page_view(user(), "dashboard", "Website");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "anon_abc12345",
                "event_type": "page_view",
                "page": "dashboard",
                "properties": {"channel": "Website"},
            })
        );
    }

    #[test]
    fn test_overview_keeps_document_order() {
        let overview: Overview = serde_json::from_str(
            r#"{
                "samples": {"events": 12, "users": 4},
                "channels": {"Website": 5, "Email": 2, "Referral": 1},
                "pages": {"dashboard": 9},
                "demographics": {
                    "gender": {"female": 2, "male": 2},
                    "education": {},
                    "location": {"Demo City": 4},
                    "age_buckets": {"25-34": 3, "18-24": 1}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(overview.samples.events, Some(12));
        assert_eq!(overview.samples.users, Some(4));
        let labels: Vec<&str> = overview.channels.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Website", "Email", "Referral"]);
        let ages: Vec<&str> = overview.demographics.age_buckets.iter().map(|(l, _)| l).collect();
        assert_eq!(ages, vec!["25-34", "18-24"]);
        assert!(overview.demographics.education.is_empty());
    }

    #[test]
    fn test_overview_missing_sections() {
        let overview: Overview = serde_json::from_str(r#"{"channels": {"Website": 5}}"#).unwrap();
        assert_eq!(overview.samples, Samples::default());
        assert!(overview.pages.is_empty());
        assert!(overview.demographics.gender.is_empty());
        assert_eq!(overview.channels.get("Website"), Some(5));
    }

    #[test]
    fn test_null_sections_read_as_missing() {
        let overview: Overview =
            serde_json::from_str(r#"{"samples": null, "channels": {"Website": 5}}"#).unwrap();
        assert_eq!(overview.samples, Samples::default());
        assert_eq!(overview.channels.get("Website"), Some(5));

        let overview: Overview = serde_json::from_str(r#"{"demographics": null}"#).unwrap();
        assert_eq!(overview.demographics, Demographics::default());

        let overview: Overview =
            serde_json::from_str(r#"{"samples": {"events": null, "users": 3}}"#).unwrap();
        assert_eq!(overview.samples.events, None);
        assert_eq!(overview.samples.users, Some(3));
    }

    #[test]
    fn test_total_saturates() {
        let map: CountMap =
            serde_json::from_str(r#"{"a": 18446744073709551615, "b": 1}"#).unwrap();
        assert_eq!(map.total(), u64::MAX);
    }

    #[test]
    fn test_null_count_map() {
        let overview: Overview = serde_json::from_str(r#"{"pages": null}"#).unwrap();
        assert!(overview.pages.is_empty());
    }

    #[test]
    fn test_count_map_rejects_non_numbers() {
        let result: Result<CountMap, _> = serde_json::from_str(r#"{"Website": "five"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_count_map_insert_overwrites_in_place() {
        let mut map: CountMap = [("a", 1), ("b", 2)].into_iter().collect();
        map.insert("a", 7);
        map.insert("c", 1);
        let entries: Vec<(&str, u64)> = map.iter().collect();
        assert_eq!(entries, vec![("a", 7), ("b", 2), ("c", 1)]);
        assert_eq!(map.total(), 10);
    }
}
