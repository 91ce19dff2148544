//! Pure calculations over a [`Dataset`].
//!
//! Every function here is deterministic and leaves its inputs untouched.
//! Classification chains are expressed as ordered rule tables; the first
//! matching rule wins, so table order is part of the observable behaviour.

use serde::Serialize;
use tracing::debug;

use crate::{
    error::{AnalyticsError, Result},
    model::Dataset,
};

/// Validated temperature window, in °C.
pub const MIN_VALID_TEMP: f64 = -50.0;
pub const MAX_VALID_TEMP: f64 = 60.0;

const MAX_WEIGHT: f64 = 0.7;
const MIN_WEIGHT: f64 = 0.3;

/// 70% max / 30% min blend of a city's daily temperatures.
pub fn weighted_average(max: f64, min: f64) -> Result<f64> {
    for value in [max, min] {
        if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&value) {
            return Err(AnalyticsError::OutOfRange { value });
        }
    }

    Ok(max * MAX_WEIGHT + min * MIN_WEIGHT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    #[serde(rename = "VERY HOT")]
    VeryHot,
    #[serde(rename = "COMFORTABLE")]
    Comfortable,
    #[serde(rename = "COLD AND DRY")]
    ColdAndDry,
    #[serde(rename = "MODERATELY HOT")]
    ModeratelyHot,
    #[serde(rename = "MILDLY HOT")]
    MildlyHot,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::VeryHot => "VERY HOT",
            Classification::Comfortable => "COMFORTABLE",
            Classification::ColdAndDry => "COLD AND DRY",
            Classification::ModeratelyHot => "MODERATELY HOT",
            Classification::MildlyHot => "MILDLY HOT",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

type ClimateRule = (fn(f64, i32) -> bool, Classification);

const CLIMATE_RULES: &[ClimateRule] = &[
    (|t: f64, h: i32| t > 30.0 && h > 75, Classification::VeryHot),
    (
        |t: f64, h: i32| (20.0..=25.0).contains(&t) && (50..=70).contains(&h),
        Classification::Comfortable,
    ),
    (|t: f64, h: i32| t < 15.0 && h < 50, Classification::ColdAndDry),
    (|t: f64, _: i32| t > 25.0, Classification::ModeratelyHot),
];

/// Classify a weighted temperature average and a truncated humidity average.
pub fn classify(temp_avg: f64, humidity_avg: i32) -> Classification {
    CLIMATE_RULES
        .iter()
        .find(|(matches, _)| matches(temp_avg, humidity_avg))
        .map(|&(_, class)| class)
        .unwrap_or(Classification::MildlyHot)
}

/// Index of the city with the strictly largest `max - min`.
///
/// The running best starts at zero at index 0, so ties keep the earlier city
/// and a dataset with no positive amplitude yields 0.
pub fn largest_amplitude_city(dataset: &Dataset) -> usize {
    let mut best = 0.0;
    let mut index = 0;

    for (i, record) in dataset.temperatures().iter().enumerate() {
        let amplitude = record.amplitude();
        if amplitude > best {
            best = amplitude;
            index = i;
        }
    }

    index
}

/// Simplified heat index, rounded half-up to one decimal.
pub fn heat_index(temp: f64, humidity: i32) -> f64 {
    let index = temp + 0.5 * (f64::from(humidity) / 100.0) * (temp - 20.0);
    round_half_up(index, 1)
}

fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale + 0.5).floor() / scale
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Green = 0,
    Yellow = 1,
    Red = 2,
}

impl AlertLevel {
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Green => "GREEN",
            AlertLevel::Yellow => "YELLOW",
            AlertLevel::Red => "RED",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

struct AlertInputs {
    max: f64,
    variation: f64,
    humidity_avg: i32,
}

type AlertRule = (fn(&AlertInputs) -> bool, AlertLevel);

const ALERT_RULES: &[AlertRule] = &[
    (|c: &AlertInputs| c.max > 35.0 || c.humidity_avg > 90, AlertLevel::Red),
    (
        |c: &AlertInputs| {
            ((30.0..=35.0).contains(&c.max) && c.humidity_avg > 80) || c.variation > 15.0
        },
        AlertLevel::Yellow,
    ),
];

/// Risk tier for one city, from its temperature extremes and humidity.
pub fn alert_level(dataset: &Dataset, index: usize) -> Result<AlertLevel> {
    let city = dataset.city(index)?;
    let inputs = AlertInputs {
        max: city.temperature.max,
        variation: city.temperature.amplitude(),
        humidity_avg: city.humidity.average(),
    };

    let level = ALERT_RULES
        .iter()
        .find(|(matches, _)| matches(&inputs))
        .map(|&(_, level)| level)
        .unwrap_or(AlertLevel::Green);

    debug!(
        city = index + 1,
        max = inputs.max,
        variation = inputs.variation,
        humidity_avg = inputs.humidity_avg,
        %level,
        "alert level computed"
    );

    Ok(level)
}

/// Aggregate figures over every temperature reading of every city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Population standard deviation (divides by N).
    pub std_dev: f64,
}

pub fn aggregate_statistics(dataset: &Dataset) -> Statistics {
    let readings: Vec<f64> = dataset
        .temperatures()
        .iter()
        .flat_map(|r| [r.max, r.min])
        .collect();

    // Seeds come from the first city's (max, min) pair; every reading,
    // seeds included, is still scanned.
    let first = dataset.temperatures()[0];
    let (mut max, mut min) = (first.max, first.min);
    for &t in &readings {
        if t > max {
            max = t;
        }
        if t < min {
            min = t;
        }
    }

    let count = readings.len() as f64;
    let mean = readings.iter().sum::<f64>() / count;
    let variance = readings.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / count;

    Statistics {
        mean,
        max,
        min,
        std_dev: variance.sqrt(),
    }
}

/// Outcome of comparing four cities by weighted average temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Comparison {
    /// 1-based number of the city that beats all three others.
    Warmest { city: usize },
    Equivalent,
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::Warmest { city } => write!(f, "City #{city} is the warmest."),
            Comparison::Equivalent => f.write_str("Temperatures are equivalent."),
        }
    }
}

/// Find the city whose weighted average strictly exceeds the other three.
///
/// Only pairwise dominance among the four given cities counts. Any tie at the
/// top, including a repeated index, yields [`Comparison::Equivalent`].
pub fn compare_cities(dataset: &Dataset, cities: [usize; 4]) -> Result<Comparison> {
    let mut averages = [0.0; 4];
    for (slot, &index) in averages.iter_mut().zip(cities.iter()) {
        let record = dataset.city(index)?.temperature;
        *slot = weighted_average(record.max, record.min)?;
    }

    let winner = (0..cities.len()).find(|&i| {
        (0..cities.len())
            .filter(|&j| j != i)
            .all(|j| averages[i] > averages[j])
    });

    Ok(match winner {
        Some(i) => Comparison::Warmest { city: cities[i] + 1 },
        None => Comparison::Equivalent,
    })
}
