use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNTITLED: &str = "Untitled";

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn untitled() -> String {
    UNTITLED.to_string()
}

/// A book as shown in search results. Has no identity until it is added to
/// the favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        BookRecord {
            title: title.into(),
            author: author.into(),
            preview_link: None,
            image_url: None,
        }
    }

    pub fn label(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }
}

/// Identity of a persisted favorite. Server-assigned ids are integers and
/// are carried as their decimal text; locally stored entries use UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FavoriteId(String);

impl FavoriteId {
    pub fn generate() -> Self {
        FavoriteId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FavoriteId {
    fn from(value: String) -> Self {
        FavoriteId(value)
    }
}

impl From<&str> for FavoriteId {
    fn from(value: &str) -> Self {
        FavoriteId(value.to_string())
    }
}

impl From<i64> for FavoriteId {
    fn from(value: i64) -> Self {
        FavoriteId(value.to_string())
    }
}

// Accepts both `"id": 3` and `"id": "3"` so REST stores that hand out
// numeric ids work without a wrapper type.
impl<'de> Deserialize<'de> for FavoriteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => FavoriteId::from(n),
            Raw::Text(s) => FavoriteId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: FavoriteId,
    #[serde(flatten)]
    pub record: BookRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads as light.
    pub fn parse(s: &str) -> Self {
        match s {
            "dark" => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == ThemePreference::Dark
    }
}
