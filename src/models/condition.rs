//! Weather condition derived from OpenWeatherMap icon codes

use serde::{Deserialize, Serialize};

/// Coarse weather condition, one per icon family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

impl WeatherCondition {
    /// Map an icon code such as `10d` or `04n` to its condition.
    ///
    /// Only the two-digit prefix matters; the day/night suffix is ignored.
    /// Unknown codes read as clear sky.
    #[must_use]
    pub fn from_icon_code(code: &str) -> Self {
        match code.get(..2) {
            Some("01") => WeatherCondition::Clear,
            Some("02" | "03") => WeatherCondition::PartlyCloudy,
            Some("04") => WeatherCondition::Cloudy,
            Some("09") => WeatherCondition::Drizzle,
            Some("10") => WeatherCondition::Rain,
            Some("11") => WeatherCondition::Thunderstorm,
            Some("13") => WeatherCondition::Snow,
            Some("50") => WeatherCondition::Mist,
            _ => WeatherCondition::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_icon_code() {
        assert_eq!(WeatherCondition::from_icon_code("01d"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_icon_code("02n"), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_icon_code("03d"), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_icon_code("04d"), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_icon_code("09d"), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_icon_code("10n"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_icon_code("11d"), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_icon_code("13d"), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_icon_code("50d"), WeatherCondition::Mist);
    }

    #[test]
    fn test_unknown_icon_code_is_clear() {
        assert_eq!(WeatherCondition::from_icon_code("99x"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_icon_code(""), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_icon_code("1"), WeatherCondition::Clear);
    }
}
