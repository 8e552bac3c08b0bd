pub mod board;
pub mod bucket;
pub mod focus;
pub mod heuristic;
pub mod markdown;
pub mod policy;
pub mod quota;
pub mod session;
pub mod settings;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Types ---

/// One of the three fixed priority categories.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Core,
    Growth,
    Optional,
}

impl Bucket {
    /// Display and export order.
    pub const ALL: [Bucket; 3] = [Bucket::Core, Bucket::Growth, Bucket::Optional];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Core => "core",
            Bucket::Growth => "growth",
            Bucket::Optional => "optional",
        }
    }

    /// Parse a wire name. Only the exact lowercase names are accepted.
    pub fn parse(name: &str) -> Option<Bucket> {
        match name {
            "core" => Some(Bucket::Core),
            "growth" => Some(Bucket::Growth),
            "optional" => Some(Bucket::Optional),
            _ => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI language. Also selects the prompt variant sent to the remote classifier.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }

    pub fn parse(code: &str) -> Option<Locale> {
        match code {
            "ko" => Some(Locale::Ko),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Localized bucket heading. Both languages keep the English names.
    pub fn bucket_title(self, bucket: Bucket) -> &'static str {
        match (self, bucket) {
            (_, Bucket::Core) => "Core",
            (_, Bucket::Growth) => "Growth",
            (_, Bucket::Optional) => "Optional",
        }
    }
}

/// Three ordered task lists. `T` is `String` on the wire and
/// [`board::Task`] inside a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets<T = String> {
    pub core: Vec<T>,
    pub growth: Vec<T>,
    pub optional: Vec<T>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            core: Vec::new(),
            growth: Vec::new(),
            optional: Vec::new(),
        }
    }
}

impl<T> Buckets<T> {
    pub fn get(&self, bucket: Bucket) -> &Vec<T> {
        match bucket {
            Bucket::Core => &self.core,
            Bucket::Growth => &self.growth,
            Bucket::Optional => &self.optional,
        }
    }

    pub fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<T> {
        match bucket {
            Bucket::Core => &mut self.core,
            Bucket::Growth => &mut self.growth,
            Bucket::Optional => &mut self.optional,
        }
    }

    pub fn len(&self) -> usize {
        self.core.len() + self.growth.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry with its bucket, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &T)> {
        Bucket::ALL
            .into_iter()
            .flat_map(move |b| self.get(b).iter().map(move |item| (b, item)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Buckets<U> {
        Buckets {
            core: self.core.iter().map(&mut f).collect(),
            growth: self.growth.iter().map(&mut f).collect(),
            optional: self.optional.iter().map(&mut f).collect(),
        }
    }
}

impl Buckets<String> {
    /// Bucket currently holding `task`, if any.
    pub fn bucket_of(&self, task: &str) -> Option<Bucket> {
        self.iter().find(|(_, t)| t.as_str() == task).map(|(b, _)| b)
    }
}

/// One entry of the Daily Focus shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DailyFocusItem {
    pub priority: u32,
    pub task: String,
}

/// Payload returned by a classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(flatten)]
    pub buckets: Buckets,
    #[serde(default)]
    pub daily_focus: Vec<DailyFocusItem>,
}

impl ClassificationResult {
    /// Wrap buckets and derive the Daily Focus from them.
    pub fn derived(buckets: Buckets) -> Self {
        let daily_focus = focus::derive(&buckets);
        Self {
            buckets,
            daily_focus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_round_trip_only_in_lowercase() {
        for b in Bucket::ALL {
            assert_eq!(Bucket::parse(b.as_str()), Some(b));
        }
        assert_eq!(Bucket::parse("Core"), None);
        assert_eq!(Bucket::parse(""), None);
    }

    #[test]
    fn classification_result_uses_flat_wire_shape() {
        let raw = r#"{"core":["a"],"growth":[],"optional":["b"],"dailyFocus":[{"priority":1,"task":"a"}]}"#;
        let parsed: ClassificationResult = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.buckets.core, vec!["a"]);
        assert_eq!(parsed.daily_focus.len(), 1);

        let back = serde_json::to_value(&parsed).unwrap();
        assert!(back.get("dailyFocus").is_some());
        assert!(back.get("buckets").is_none());
    }

    #[test]
    fn iter_walks_buckets_in_display_order() {
        let b = Buckets {
            core: vec!["c".to_string()],
            growth: vec!["g".to_string()],
            optional: vec!["o".to_string()],
        };
        let order: Vec<_> = b.iter().map(|(bucket, t)| (bucket, t.as_str())).collect();
        assert_eq!(
            order,
            vec![
                (Bucket::Core, "c"),
                (Bucket::Growth, "g"),
                (Bucket::Optional, "o")
            ]
        );
        assert_eq!(b.bucket_of("g"), Some(Bucket::Growth));
    }
}
