//! Style preference used to tailor outfit suggestions.

use serde::{Deserialize, Serialize};

/// Which wardrobe the suggestions should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StylePreference {
    /// Men's clothing.
    Men,
    /// Women's clothing.
    Women,
    /// Items anyone can wear.
    Unisex,
}

impl StylePreference {
    /// Convert preference to the wire string sent as `gender`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Unisex => "unisex",
        }
    }

    /// Parse an exact wire value, as sent in the `gender` field.
    pub fn from_wire(s: &str) -> Option<Self> {
        [Self::Men, Self::Women, Self::Unisex]
            .into_iter()
            .find(|p| p.as_str() == s)
    }

    /// Parse a preference from user input, accepting short aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "men" | "male" | "m" => Some(Self::Men),
            "women" | "female" | "w" | "f" => Some(Self::Women),
            "unisex" | "u" | "any" => Some(Self::Unisex),
            _ => None,
        }
    }

    /// The `gender` value sent for an optional preference.
    pub fn wire_value(preference: Option<Self>) -> &'static str {
        preference.unwrap_or(Self::Unisex).as_str()
    }
}

impl std::fmt::Display for StylePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
