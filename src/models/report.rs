//! Combined weather report handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::{CurrentConditions, Location, NormalizedForecast};
use crate::units::{TemperatureUnit, convert_temperature};

/// Everything the frontend renders for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: Option<String>,
    /// State or region, when the geocoder knows one
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Observation time formatted for display
    pub date: String,
    pub current: CurrentConditions,
    pub forecast: NormalizedForecast,
    /// Unit of every temperature in this report
    pub unit: TemperatureUnit,
}

impl WeatherReport {
    /// Build a Celsius report for a geocoded location
    #[must_use]
    pub fn new(
        location: &Location,
        date: String,
        current: CurrentConditions,
        forecast: NormalizedForecast,
    ) -> Self {
        Self {
            city: location.name.clone(),
            country: location.country.clone(),
            state: location.state.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            date,
            current,
            forecast,
            unit: TemperatureUnit::Celsius,
        }
    }

    /// Express all temperatures in `unit`, rounded to whole degrees.
    ///
    /// Values are converted from Celsius, so a report that is already in
    /// Fahrenheit is returned unchanged.
    #[must_use]
    pub fn in_unit(mut self, unit: TemperatureUnit) -> Self {
        if self.unit == TemperatureUnit::Fahrenheit {
            return self;
        }

        let convert = |celsius: f64| f64::from(convert_temperature(celsius, unit));
        self.current.temperature = convert(self.current.temperature);
        self.current.feels_like = convert(self.current.feels_like);
        for day in self.forecast.days_mut() {
            day.min_temp = convert(day.min_temp);
            day.max_temp = convert(day.max_temp);
        }
        self.unit = unit;
        self
    }
}
