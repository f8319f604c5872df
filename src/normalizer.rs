//! Forecast normalization
//!
//! Turns the provider's three-hourly samples into exactly three daily
//! summaries. Days are bucketed on UTC calendar boundaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate};
use tracing::debug;

use crate::models::{ForecastDay, NormalizedForecast, RawForecastSample, WeatherCondition};
use crate::units::format_day_name;
use crate::{Result, WeatherlyError};

/// Group samples into calendar days and pad or truncate to three days.
///
/// The first sample of a day fixes its icon and description; later samples
/// of the same day only widen the min/max range. Once three days exist no
/// new day is started, but samples of those three days are still merged.
/// Fewer than three days are padded with copies of the last day on the
/// following dates. No samples yields an empty forecast.
pub fn normalize_forecast(samples: &[RawForecastSample]) -> Result<NormalizedForecast> {
    let mut days: BTreeMap<NaiveDate, ForecastDay> = BTreeMap::new();

    for sample in samples {
        let date = sample_date(sample)?;

        if let Some(day) = days.get_mut(&date) {
            day.min_temp = day.min_temp.min(sample.temp_min);
            day.max_temp = day.max_temp.max(sample.temp_max);
            continue;
        }

        if days.len() >= NormalizedForecast::DAYS {
            continue;
        }

        days.insert(date, day_from_sample(date, sample));
    }

    let mut days: Vec<ForecastDay> = days.into_values().collect();
    debug!(
        samples = samples.len(),
        days = days.len(),
        "Grouped forecast samples by day"
    );

    if let Some(last) = days.last().cloned() {
        let mut offset = 1;
        while days.len() < NormalizedForecast::DAYS {
            days.push(pad_day(&last, offset)?);
            offset += 1;
        }
    }
    days.truncate(NormalizedForecast::DAYS);

    Ok(NormalizedForecast::from_days(days))
}

fn sample_date(sample: &RawForecastSample) -> Result<NaiveDate> {
    DateTime::from_timestamp(sample.timestamp, 0)
        .map(|time| time.date_naive())
        .ok_or(WeatherlyError::InvalidTimestamp {
            timestamp: sample.timestamp,
        })
}

fn day_from_sample(date: NaiveDate, sample: &RawForecastSample) -> ForecastDay {
    ForecastDay {
        date,
        day: format_day_name(date),
        min_temp: sample.temp_min,
        max_temp: sample.temp_max,
        icon: sample.icon.clone(),
        description: sample.description.clone(),
        condition: WeatherCondition::from_icon_code(&sample.icon),
        synthetic: false,
    }
}

fn pad_day(last: &ForecastDay, offset: u64) -> Result<ForecastDay> {
    let date = last
        .date
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| WeatherlyError::general(format!("Cannot pad forecast past {}", last.date)))?;

    Ok(ForecastDay {
        date,
        day: format_day_name(date),
        synthetic: true,
        ..last.clone()
    })
}
