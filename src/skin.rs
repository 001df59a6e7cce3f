use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SkinError;

pub const DEFAULT_SKIN_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colour theme for every drawn element. Field names on disk follow the skin file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skin {
    pub label: String,
    #[serde(rename = "bg")]
    pub background: Rgb,
    #[serde(rename = "fg")]
    pub foreground: Rgb,
    #[serde(rename = "fg_active")]
    pub active_foreground: Rgb,
    pub apple: Rgb,
    pub snake: Rgb,
    #[serde(rename = "snake_edges")]
    pub snake_edge: Rgb,
    #[serde(rename = "grid")]
    pub grid_line: Rgb,
}

impl Skin {
    pub fn builtin() -> Self {
        Self {
            label: "Default (Missing skins file)".to_string(),
            background: Rgb(40, 44, 52),
            foreground: Rgb(225, 228, 234),
            active_foreground: Rgb(198, 120, 214),
            apple: Rgb(224, 106, 92),
            snake: Rgb(198, 120, 214),
            snake_edge: Rgb(168, 0, 205),
            grid_line: Rgb(59, 64, 72),
        }
    }
}

/// All configured skins, iterated in identifier order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinSet {
    skins: BTreeMap<String, Skin>,
}

impl SkinSet {
    /// Only the built-in skin; toggling is then a no-op.
    pub fn builtin() -> Self {
        let mut skins = BTreeMap::new();
        skins.insert(DEFAULT_SKIN_ID.to_string(), Skin::builtin());
        Self { skins }
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self, SkinError> {
        let skins: BTreeMap<String, Skin> =
            serde_json::from_str(json).map_err(|source| SkinError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if skins.is_empty() {
            return Err(SkinError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { skins })
    }

    pub fn load(path: &Path) -> Result<Self, SkinError> {
        let json = fs::read_to_string(path).map_err(|source| SkinError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    /// Loads `path`, falling back to the built-in skin on any failure.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(skins) => skins,
            Err(err) => {
                warn!("{}; using the default skin", err);
                Self::builtin()
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.skins.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&Skin> {
        self.skins.get(id)
    }

    /// `id` if it is configured, otherwise the first identifier.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        if self.skins.contains_key(id) {
            id
        } else {
            self.first_id()
        }
    }

    /// The identifier after `id` in sorted order, wrapping to the first.
    pub fn next_after(&self, id: &str) -> &str {
        self.skins
            .keys()
            .skip_while(|key| key.as_str() != id)
            .nth(1)
            .map(String::as_str)
            .unwrap_or_else(|| self.first_id())
    }

    /// The skin for `id`, or the first configured skin.
    pub fn skin(&self, id: &str) -> &Skin {
        &self.skins[self.resolve(id)]
    }

    fn first_id(&self) -> &str {
        self.skins
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or(DEFAULT_SKIN_ID)
    }
}
