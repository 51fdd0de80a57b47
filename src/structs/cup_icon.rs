use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Icon shown next to a cup size. Serialized as the icon-font glyph name and
/// read back with the same case-insensitive rules as [`FromStr`].
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CupIcon {
    #[serde(rename = "glass-whiskey")]
    Glass,
    Coffee,
    WineGlass,
    WineGlassAlt,
    Flask,
    Water,
}

impl CupIcon {
    pub const ALL: [CupIcon; 6] = [
        CupIcon::Glass,
        CupIcon::Coffee,
        CupIcon::WineGlass,
        CupIcon::WineGlassAlt,
        CupIcon::Flask,
        CupIcon::Water,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CupIcon::Glass => "glass-whiskey",
            CupIcon::Coffee => "coffee",
            CupIcon::WineGlass => "wine-glass",
            CupIcon::WineGlassAlt => "wine-glass-alt",
            CupIcon::Flask => "flask",
            CupIcon::Water => "water",
        }
    }
}

impl fmt::Display for CupIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CupIcon {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CupIcon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownIcon(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for CupIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_glyph_name() {
        for icon in CupIcon::ALL {
            let json = serde_json::to_string(&icon).unwrap();
            assert_eq!(json, format!("\"{}\"", icon.as_str()));
        }
    }

    #[test]
    fn stored_names_read_like_typed_ones() {
        for raw in ["\"Flask\"", "\"flask\"", "\" FLASK \""] {
            let icon: CupIcon = serde_json::from_str(raw).unwrap();
            assert_eq!(icon, CupIcon::Flask);
        }
        assert!(serde_json::from_str::<CupIcon>("\"teapot\"").is_err());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Wine-Glass".parse::<CupIcon>().unwrap(), CupIcon::WineGlass);
        assert!(matches!(
            "teapot".parse::<CupIcon>(),
            Err(ValidationError::UnknownIcon(_))
        ));
    }
}
