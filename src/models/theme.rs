use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;

/// Application theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThemeType {
    /// Follow the operating system
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeType {
    pub const ALL: [ThemeType; 3] = [ThemeType::System, ThemeType::Light, ThemeType::Dark];

    /// Stored name of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeType::System => "SYSTEM",
            ThemeType::Light => "LIGHT",
            ThemeType::Dark => "DARK",
        }
    }

    /// Resolve a stored theme name, falling back to `System` when the name is
    /// missing or unknown.
    pub fn from_stored(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for ThemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SYSTEM" => Ok(ThemeType::System),
            "LIGHT" => Ok(ThemeType::Light),
            "DARK" => Ok(ThemeType::Dark),
            _ => Err(StorageError::InvalidValue {
                key: "theme".to_string(),
                value: s.to_string(),
            }),
        }
    }
}
