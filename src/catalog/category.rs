//! Resource categories and keys

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TunerError;

/// Kind of live audio resource. Each category owns its own id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Ambient,
    AmbientNight,
    Animal,
    Building,
    Vehicle,
    Misc,
    Effect,
}

/// Where the host keeps resources of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Per-id ambient tables, each slot owns its own volume and clip
    Ambient,
    /// Identities bound to effect slots; several identities may share a slot
    Effect,
    /// Volume-only controls without sample data
    Control,
}

impl Category {
    /// All categories, in enumeration order
    pub const ALL: [Category; 7] = [
        Category::Ambient,
        Category::AmbientNight,
        Category::Animal,
        Category::Building,
        Category::Vehicle,
        Category::Misc,
        Category::Effect,
    ];

    pub fn storage(self) -> Storage {
        match self {
            Category::Ambient | Category::AmbientNight => Storage::Ambient,
            Category::Animal | Category::Building | Category::Vehicle | Category::Effect => {
                Storage::Effect
            }
            Category::Misc => Storage::Control,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Ambient => "Ambient",
            Category::AmbientNight => "AmbientNight",
            Category::Animal => "Animal",
            Category::Building => "Building",
            Category::Vehicle => "Vehicle",
            Category::Misc => "Misc",
            Category::Effect => "Effect",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TunerError;

    /// Accepts `AmbientNight`, `ambient-night` and `ambient_night`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Category::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == normalized)
            .ok_or_else(|| TunerError::InvalidConfig {
                reason: format!("unknown sound category '{}'", s),
            })
    }
}

/// Identity of a live resource: `(Category, ResourceId)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub category: Category,
    pub id: String,
}

impl ResourceKey {
    pub fn new(category: Category, id: impl Into<String>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("AmbientNight", Category::AmbientNight ; "pascal case")]
    #[test_case("ambient-night", Category::AmbientNight ; "kebab case")]
    #[test_case("ambient_night", Category::AmbientNight ; "snake case")]
    #[test_case("vehicle", Category::Vehicle ; "lower case")]
    #[test_case("EFFECT", Category::Effect ; "upper case")]
    fn test_parse_category(input: &str, expected: Category) {
        assert_eq!(input.parse::<Category>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "Weather".parse::<Category>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test_case(Category::Ambient, Storage::Ambient)]
    #[test_case(Category::AmbientNight, Storage::Ambient)]
    #[test_case(Category::Vehicle, Storage::Effect)]
    #[test_case(Category::Effect, Storage::Effect)]
    #[test_case(Category::Misc, Storage::Control)]
    fn test_storage(category: Category, storage: Storage) {
        assert_eq!(category.storage(), storage);
    }

    #[test]
    fn test_key_display() {
        let key = ResourceKey::new(Category::Vehicle, "Small Car Movement");
        assert_eq!(key.to_string(), "Vehicle.Small Car Movement");
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }
}
