//! Weather condition classification
//!
//! MeteoSwiss pictograms are identified by integer icon codes (1-35 for day,
//! 101-135 for night). Many icons collapse onto one of fifteen condition
//! tags, which are the labels home-automation frontends understand.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Condition tag derived from a MeteoSwiss icon code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    /// Clear sky at night
    #[serde(rename = "clear-night")]
    ClearNight,
    /// Overcast
    #[serde(rename = "cloudy")]
    Cloudy,
    /// Fog or low stratus
    #[serde(rename = "fog")]
    Fog,
    /// Hail (never produced by classification)
    #[serde(rename = "hail")]
    Hail,
    /// Thunderstorm without precipitation
    #[serde(rename = "lightning")]
    Lightning,
    /// Thunderstorm with rain
    #[serde(rename = "lightning-rainy")]
    LightningRainy,
    /// Partly cloudy
    #[serde(rename = "partlycloudy")]
    PartlyCloudy,
    /// Heavy rain
    #[serde(rename = "pouring")]
    Pouring,
    /// Rain or showers
    #[serde(rename = "rainy")]
    Rainy,
    /// Snow
    #[serde(rename = "snowy")]
    Snowy,
    /// Sleet
    #[serde(rename = "snowy-rainy")]
    SnowyRainy,
    /// Sunny
    #[serde(rename = "sunny")]
    Sunny,
    /// Windy (never produced by classification)
    #[serde(rename = "windy")]
    Windy,
    /// Windy and cloudy (never produced by classification)
    #[serde(rename = "windy-variant")]
    WindyVariant,
    /// Exceptional conditions (never produced by classification)
    #[serde(rename = "exceptional")]
    Exceptional,
}

/// Condition tag to icon code table as published by MeteoSwiss
const CONDITION_CLASSES: [(WeatherCondition, &[i32]); 15] = [
    (WeatherCondition::ClearNight, &[101]),
    (WeatherCondition::Cloudy, &[5, 35, 105, 135]),
    (WeatherCondition::Fog, &[27, 28, 127, 128]),
    (WeatherCondition::Hail, &[]),
    (WeatherCondition::Lightning, &[12, 112]),
    (
        WeatherCondition::LightningRainy,
        &[13, 23, 24, 25, 32, 113, 123, 124, 125, 132],
    ),
    (WeatherCondition::PartlyCloudy, &[2, 3, 4, 102, 103, 104]),
    (WeatherCondition::Pouring, &[20, 120]),
    (
        WeatherCondition::Rainy,
        &[6, 9, 14, 17, 29, 33, 106, 109, 114, 117, 129, 133],
    ),
    (
        WeatherCondition::Snowy,
        &[8, 11, 16, 19, 22, 30, 34, 108, 111, 116, 119, 122, 130, 134],
    ),
    (
        WeatherCondition::SnowyRainy,
        &[7, 10, 15, 18, 21, 31, 107, 110, 115, 118, 121, 131],
    ),
    (WeatherCondition::Sunny, &[1, 26, 126]),
    (WeatherCondition::Windy, &[]),
    (WeatherCondition::WindyVariant, &[]),
    (WeatherCondition::Exceptional, &[]),
];

static ICON_TO_CONDITION: LazyLock<HashMap<i32, WeatherCondition>> = LazyLock::new(|| {
    CONDITION_CLASSES
        .iter()
        .flat_map(|(condition, icons)| icons.iter().map(move |icon| (*icon, *condition)))
        .collect()
});

impl WeatherCondition {
    /// Every condition tag, in table order
    pub const ALL: [Self; 15] = [
        Self::ClearNight,
        Self::Cloudy,
        Self::Fog,
        Self::Hail,
        Self::Lightning,
        Self::LightningRainy,
        Self::PartlyCloudy,
        Self::Pouring,
        Self::Rainy,
        Self::Snowy,
        Self::SnowyRainy,
        Self::Sunny,
        Self::Windy,
        Self::WindyVariant,
        Self::Exceptional,
    ];

    /// Classify an icon code
    ///
    /// Returns `None` when the code is absent or not listed in the table.
    #[must_use]
    pub fn from_icon(icon: Option<i32>) -> Option<Self> {
        icon.and_then(|code| ICON_TO_CONDITION.get(&code).copied())
    }

    /// Icon codes that classify to this condition
    #[must_use]
    pub fn icons(self) -> &'static [i32] {
        CONDITION_CLASSES
            .iter()
            .find(|(condition, _)| *condition == self)
            .map(|(_, icons)| *icons)
            .unwrap_or_default()
    }

    /// Tag string as used by the upstream pictogram table
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClearNight => "clear-night",
            Self::Cloudy => "cloudy",
            Self::Fog => "fog",
            Self::Hail => "hail",
            Self::Lightning => "lightning",
            Self::LightningRainy => "lightning-rainy",
            Self::PartlyCloudy => "partlycloudy",
            Self::Pouring => "pouring",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::SnowyRainy => "snowy-rainy",
            Self::Sunny => "sunny",
            Self::Windy => "windy",
            Self::WindyVariant => "windy-variant",
            Self::Exceptional => "exceptional",
        }
    }

    /// Get a human-readable description of the condition
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ClearNight => "Clear night",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Hail => "Hail",
            Self::Lightning => "Lightning",
            Self::LightningRainy => "Thunderstorm with rain",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Pouring => "Pouring rain",
            Self::Rainy => "Rain",
            Self::Snowy => "Snow",
            Self::SnowyRainy => "Sleet",
            Self::Sunny => "Sunny",
            Self::Windy => "Windy",
            Self::WindyVariant => "Windy and cloudy",
            Self::Exceptional => "Exceptional",
        }
    }

    /// Get an emoji representation of the condition
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::ClearNight => "🌙",
            Self::Cloudy => "☁️",
            Self::Fog => "🌫️",
            Self::Hail | Self::SnowyRainy => "🌨️",
            Self::Lightning | Self::LightningRainy => "⛈️",
            Self::PartlyCloudy => "⛅",
            Self::Pouring | Self::Rainy => "🌧️",
            Self::Snowy => "❄️",
            Self::Sunny => "☀️",
            Self::Windy | Self::WindyVariant => "💨",
            Self::Exceptional => "⚠️",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_icons() {
        assert_eq!(
            WeatherCondition::from_icon(Some(1)),
            Some(WeatherCondition::Sunny)
        );
        assert_eq!(
            WeatherCondition::from_icon(Some(2)),
            Some(WeatherCondition::PartlyCloudy)
        );
        assert_eq!(
            WeatherCondition::from_icon(Some(5)),
            Some(WeatherCondition::Cloudy)
        );
        assert_eq!(
            WeatherCondition::from_icon(Some(20)),
            Some(WeatherCondition::Pouring)
        );
    }

    #[test]
    fn test_night_icons() {
        assert_eq!(
            WeatherCondition::from_icon(Some(101)),
            Some(WeatherCondition::ClearNight)
        );
        assert_eq!(
            WeatherCondition::from_icon(Some(135)),
            Some(WeatherCondition::Cloudy)
        );
        assert_eq!(
            WeatherCondition::from_icon(Some(132)),
            Some(WeatherCondition::LightningRainy)
        );
    }

    #[test]
    fn test_unknown_icons() {
        assert_eq!(WeatherCondition::from_icon(None), None);
        assert_eq!(WeatherCondition::from_icon(Some(0)), None);
        assert_eq!(WeatherCondition::from_icon(Some(36)), None);
        assert_eq!(WeatherCondition::from_icon(Some(100)), None);
        assert_eq!(WeatherCondition::from_icon(Some(-1)), None);
    }

    #[test]
    fn test_every_listed_icon_maps_back() {
        for condition in WeatherCondition::ALL {
            for icon in condition.icons() {
                assert_eq!(WeatherCondition::from_icon(Some(*icon)), Some(condition));
            }
        }
    }

    #[test]
    fn test_empty_classes() {
        assert!(WeatherCondition::Hail.icons().is_empty());
        assert!(WeatherCondition::Windy.icons().is_empty());
        assert!(WeatherCondition::WindyVariant.icons().is_empty());
        assert!(WeatherCondition::Exceptional.icons().is_empty());
    }

    #[test]
    fn test_icon_table_has_no_duplicates() {
        let total: usize = WeatherCondition::ALL
            .iter()
            .map(|condition| condition.icons().len())
            .sum();
        assert_eq!(total, ICON_TO_CONDITION.len());
    }

    #[test]
    fn test_serialization_uses_tag() {
        let json = serde_json::to_string(&WeatherCondition::LightningRainy).unwrap();
        assert_eq!(json, "\"lightning-rainy\"");

        let parsed: WeatherCondition = serde_json::from_str("\"partlycloudy\"").unwrap();
        assert_eq!(parsed, WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_display_matches_serde_tag() {
        for condition in WeatherCondition::ALL {
            let json = serde_json::to_string(&condition).unwrap();
            assert_eq!(json, format!("\"{condition}\""));
        }
    }

    #[test]
    fn test_description_and_emoji() {
        assert_eq!(WeatherCondition::SnowyRainy.description(), "Sleet");
        assert_eq!(WeatherCondition::Sunny.emoji(), "☀️");
        assert_eq!(WeatherCondition::Rainy.emoji(), "🌧️");
    }
}
