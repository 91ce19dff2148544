use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalyticsError, Result};

/// Daily high and low for one city, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub max: f64,
    pub min: f64,
}

impl TemperatureRecord {
    pub const fn new(max: f64, min: f64) -> Self {
        Self { max, min }
    }

    /// Thermal amplitude. Negative when the recorded "min" exceeds the "max".
    pub fn amplitude(&self) -> f64 {
        self.max - self.min
    }
}

/// Three same-day humidity samples for one city, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumidityRecord {
    pub readings: [i32; 3],
}

impl HumidityRecord {
    pub const fn new(readings: [i32; 3]) -> Self {
        Self { readings }
    }

    /// Integer mean of the three readings. Truncates, never rounds.
    pub fn average(&self) -> i32 {
        let sum: i64 = self.readings.iter().map(|&r| i64::from(r)).sum();
        // The mean of three i32 values always fits in an i32.
        (sum / 3) as i32
    }
}

/// Both records of a single city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityObservation {
    pub temperature: TemperatureRecord,
    pub humidity: HumidityRecord,
}

/// Co-indexed temperature and humidity observations.
///
/// Index `i` refers to the same city in both lists. The invariant is checked
/// once in [`Dataset::new`] and the dataset is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset", into = "RawDataset")]
pub struct Dataset {
    observed_on: Option<NaiveDate>,
    temperatures: Vec<TemperatureRecord>,
    humidity: Vec<HumidityRecord>,
}

/// On-disk shape of a dataset, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observed_on: Option<NaiveDate>,
    temperatures: Vec<TemperatureRecord>,
    humidity: Vec<HumidityRecord>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = AnalyticsError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Ok(Dataset::new(raw.temperatures, raw.humidity)?.with_observed_on(raw.observed_on))
    }
}

impl From<Dataset> for RawDataset {
    fn from(ds: Dataset) -> Self {
        RawDataset {
            observed_on: ds.observed_on,
            temperatures: ds.temperatures,
            humidity: ds.humidity,
        }
    }
}

impl Dataset {
    pub fn new(temperatures: Vec<TemperatureRecord>, humidity: Vec<HumidityRecord>) -> Result<Self> {
        if temperatures.len() != humidity.len() {
            return Err(AnalyticsError::DatasetMismatch {
                temperatures: temperatures.len(),
                humidity: humidity.len(),
            });
        }
        if temperatures.is_empty() {
            return Err(AnalyticsError::EmptyDataset);
        }

        for (index, record) in humidity.iter().enumerate() {
            if record.readings.iter().any(|r| !(0..=100).contains(r)) {
                warn!(city = index + 1, readings = ?record.readings, "humidity reading outside 0..=100");
            }
        }

        Ok(Self {
            observed_on: None,
            temperatures,
            humidity,
        })
    }

    /// The five-city dataset the report was originally built around.
    pub fn reference() -> Self {
        Self {
            observed_on: None,
            temperatures: vec![
                TemperatureRecord::new(20.5, 25.1),
                TemperatureRecord::new(29.3, 25.7),
                TemperatureRecord::new(28.8, 19.9),
                TemperatureRecord::new(30.2, 20.5),
                TemperatureRecord::new(20.7, 11.3),
            ],
            humidity: vec![
                HumidityRecord::new([85, 60, 75]),
                HumidityRecord::new([71, 50, 65]),
                HumidityRecord::new([90, 65, 80]),
                HumidityRecord::new([72, 58, 70]),
                HumidityRecord::new([80, 50, 68]),
            ],
        }
    }

    pub fn with_observed_on(mut self, date: Option<NaiveDate>) -> Self {
        self.observed_on = date;
        self
    }

    pub fn observed_on(&self) -> Option<NaiveDate> {
        self.observed_on
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    /// Always false for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    pub fn temperatures(&self) -> &[TemperatureRecord] {
        &self.temperatures
    }

    pub fn humidity(&self) -> &[HumidityRecord] {
        &self.humidity
    }

    pub fn city(&self, index: usize) -> Result<CityObservation> {
        match (self.temperatures.get(index), self.humidity.get(index)) {
            (Some(&temperature), Some(&humidity)) => Ok(CityObservation { temperature, humidity }),
            _ => Err(AnalyticsError::IndexOutOfRange { index, len: self.len() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humidity_average_truncates() {
        assert_eq!(HumidityRecord::new([85, 60, 75]).average(), 73);
        assert_eq!(HumidityRecord::new([71, 50, 65]).average(), 62);
        assert_eq!(HumidityRecord::new([1, 1, 0]).average(), 0);
        assert_eq!(HumidityRecord::new([-1, -1, 0]).average(), 0);
    }

    #[test]
    fn humidity_average_does_not_overflow() {
        assert_eq!(HumidityRecord::new([i32::MAX, 1, 0]).average(), 715_827_882);
        assert_eq!(HumidityRecord::new([i32::MAX; 3]).average(), i32::MAX);
        assert_eq!(HumidityRecord::new([i32::MIN; 3]).average(), i32::MIN);
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        let err = Dataset::new(
            vec![TemperatureRecord::new(20.0, 10.0)],
            vec![HumidityRecord::new([50, 50, 50]), HumidityRecord::new([60, 60, 60])],
        )
        .unwrap_err();

        assert_eq!(err, AnalyticsError::DatasetMismatch { temperatures: 1, humidity: 2 });
    }

    #[test]
    fn new_rejects_empty() {
        let err = Dataset::new(vec![], vec![]).unwrap_err();
        assert_eq!(err, AnalyticsError::EmptyDataset);
    }

    #[test]
    fn city_lookup_is_checked() {
        let ds = Dataset::reference();

        let city = ds.city(3).expect("index 3 exists");
        assert_eq!(city.temperature, TemperatureRecord::new(30.2, 20.5));
        assert_eq!(city.humidity.readings, [72, 58, 70]);

        let err = ds.city(5).unwrap_err();
        assert_eq!(err, AnalyticsError::IndexOutOfRange { index: 5, len: 5 });
    }

    #[test]
    fn deserialize_validates_counts() {
        let json = r#"{
            "temperatures": [{ "max": 20.0, "min": 10.0 }],
            "humidity": []
        }"#;

        let err = serde_json::from_str::<Dataset>(json).unwrap_err();
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn deserialize_keeps_observation_date() {
        let json = r#"{
            "observed_on": "2024-03-01",
            "temperatures": [{ "max": 20.0, "min": 10.0 }],
            "humidity": [{ "readings": [40, 50, 60] }]
        }"#;

        let ds: Dataset = serde_json::from_str(json).expect("valid dataset");
        assert_eq!(ds.observed_on(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(ds.len(), 1);
    }
}
