use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

use super::cup_icon::CupIcon;

/// Smallest custom cup size accepted, in milliliters
pub const MIN_CUP_SIZE: u32 = 1;
/// Largest custom cup size accepted, in milliliters
pub const MAX_CUP_SIZE: u32 = 2000;

/// A cup of water: either a configured cup size in the catalog, or a logged
/// drink when `timestamp` is set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Cup {
    /// Amount of water in milliliters
    pub size: u32,

    pub icon: CupIcon,

    /// When the drink was recorded. Absent for catalog entries.
    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Cup {
    /// A cup configuration without a timestamp.
    pub const fn new(size: u32, icon: CupIcon) -> Self {
        Self {
            size,
            icon,
            timestamp: None,
        }
    }

    /// Stamps this configuration as a drink taken at `timestamp`.
    pub fn logged_at(&self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..*self
        }
    }

    /// The same cup with its timestamp dropped.
    pub fn configuration(&self) -> Self {
        Self::new(self.size, self.icon)
    }

    /// Size and icon match; timestamps are ignored.
    pub fn same_configuration(&self, other: &Cup) -> bool {
        self.size == other.size && self.icon == other.icon
    }

    /// Size, icon and timestamp all match exactly.
    pub fn same_instance(&self, other: &Cup) -> bool {
        self.same_configuration(other) && self.timestamp == other.timestamp
    }
}

pub const DEFAULT_CUP: Cup = Cup::new(200, CupIcon::WineGlass);

pub const DEFAULT_CUP_SIZES: [Cup; 5] = [
    Cup::new(100, CupIcon::Coffee),
    DEFAULT_CUP,
    Cup::new(300, CupIcon::WineGlassAlt),
    Cup::new(400, CupIcon::Flask),
    Cup::new(650, CupIcon::Water),
];

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn configuration_equality_ignores_timestamp() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();

        let a = DEFAULT_CUP.logged_at(morning);
        let b = DEFAULT_CUP.logged_at(evening);

        assert!(a.same_configuration(&b));
        assert!(!a.same_instance(&b));
        assert!(a.same_instance(&DEFAULT_CUP.logged_at(morning)));
    }

    #[test]
    fn different_icon_is_a_different_configuration() {
        let flask = Cup::new(200, CupIcon::Flask);
        assert!(!flask.same_configuration(&DEFAULT_CUP));
    }

    #[test]
    fn catalog_entry_serializes_without_date() {
        let json = serde_json::to_string(&DEFAULT_CUP).unwrap();
        assert_eq!(json, r#"{"size":200,"icon":"wine-glass"}"#);
    }

    #[test]
    fn logged_drink_keeps_its_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let json = serde_json::to_string(&DEFAULT_CUP.logged_at(at)).unwrap();
        let back: Cup = serde_json::from_str(&json).unwrap();

        assert!(json.contains(r#""date":"2024-03-01T08:30:00Z""#));
        assert!(back.same_instance(&DEFAULT_CUP.logged_at(at)));
    }

    #[test]
    fn reads_entries_written_with_millisecond_dates() {
        let back: Cup =
            serde_json::from_str(r#"{"size":300,"icon":"flask","date":"2024-03-01T08:30:00.123Z"}"#)
                .unwrap();
        assert_eq!(back.size, 300);
        assert!(back.timestamp.is_some());
    }
}
