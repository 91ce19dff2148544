use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::{
    analytics::{
        AlertLevel, Classification, Comparison, Statistics, aggregate_statistics, alert_level,
        classify, compare_cities, largest_amplitude_city, weighted_average,
    },
    error::Result,
    model::Dataset,
};

const RULE: &str = "======================================================";

/// One table row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    /// 1-based city number.
    pub city: usize,
    pub max: f64,
    pub min: f64,
    pub weighted_avg: f64,
    pub humidity_avg: i32,
    pub classification: Classification,
    pub alert: AlertLevel,
}

/// Everything the report shows, computed up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_on: Option<NaiveDate>,
    pub rows: Vec<CityRow>,
    pub statistics: Statistics,
    /// 1-based number of the city with the largest thermal amplitude.
    pub largest_amplitude_city: usize,
    pub comparison: Comparison,
}

impl Report {
    /// Run every analytic over `dataset`. `compare` holds zero-based indices.
    pub fn generate(dataset: &Dataset, compare: [usize; 4]) -> Result<Self> {
        let mut rows = Vec::with_capacity(dataset.len());

        for index in 0..dataset.len() {
            let city = dataset.city(index)?;
            let weighted_avg = weighted_average(city.temperature.max, city.temperature.min)?;
            let humidity_avg = city.humidity.average();
            let classification = classify(weighted_avg, humidity_avg);
            let alert = alert_level(dataset, index)?;

            debug!(city = index + 1, weighted_avg, humidity_avg, %classification, "city analysed");

            rows.push(CityRow {
                city: index + 1,
                max: city.temperature.max,
                min: city.temperature.min,
                weighted_avg,
                humidity_avg,
                classification,
                alert,
            });
        }

        Ok(Self {
            observed_on: dataset.observed_on(),
            rows,
            statistics: aggregate_statistics(dataset),
            largest_amplitude_city: largest_amplitude_city(dataset) + 1,
            comparison: compare_cities(dataset, compare)?,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "   INTELLIGENT WEATHER ANALYSIS SYSTEM")?;
        if let Some(date) = self.observed_on {
            writeln!(f, "   Observations of {date}")?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f)?;

        writeln!(
            f,
            "CITY | T.MAX  | T.MIN  | T.AVG  | HUM% | CLASSIFICATION     | ALERT"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "  {:<2} | {:.1}°C | {:.1}°C | {:.1}°C |  {:<3} | {:<18} | {}",
                row.city,
                row.max,
                row.min,
                row.weighted_avg,
                row.humidity_avg,
                row.classification.label(),
                row.alert.label(),
            )?;
        }

        let stats = &self.statistics;
        writeln!(f)?;
        writeln!(f, "OVERALL STATISTICS:")?;
        writeln!(f, "• Overall mean temperature: {:.1}°C", stats.mean)?;
        writeln!(f, "• Highest temperature: {:.1}°C", stats.max)?;
        writeln!(f, "• Lowest temperature: {:.1}°C", stats.min)?;
        writeln!(f, "• Standard deviation: {:.2}", stats.std_dev)?;
        writeln!(f, "• Largest thermal amplitude: City #{}", self.largest_amplitude_city)?;

        writeln!(f)?;
        writeln!(f, "COMPARATIVE ANALYSIS:")?;
        writeln!(f, "{}", self.comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AnalyticsError, SourceFormat,
        model::{HumidityRecord, TemperatureRecord},
    };

    #[test]
    fn reference_report_contents() {
        let report = Report::generate(&Dataset::reference(), [1, 2, 3, 4]).unwrap();

        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.largest_amplitude_city, 4);
        assert_eq!(report.comparison, Comparison::Warmest { city: 2 });

        let classes: Vec<_> = report.rows.iter().map(|r| r.classification).collect();
        assert_eq!(
            classes,
            [
                Classification::MildlyHot,
                Classification::ModeratelyHot,
                Classification::ModeratelyHot,
                Classification::ModeratelyHot,
                Classification::MildlyHot,
            ]
        );
        assert!(report.rows.iter().all(|r| r.alert == AlertLevel::Green));

        let humidity: Vec<_> = report.rows.iter().map(|r| r.humidity_avg).collect();
        assert_eq!(humidity, [73, 62, 78, 66, 66]);
    }

    #[test]
    fn text_rendering_has_every_section() {
        let report = Report::generate(&Dataset::reference(), [1, 2, 3, 4]).unwrap();
        let text = report.to_string();

        assert!(text.contains("INTELLIGENT WEATHER ANALYSIS SYSTEM"));
        assert!(text.contains("CITY | T.MAX"));
        assert!(text.contains("  4  | 30.2°C | 20.5°C | 27.3°C |  66  | MODERATELY HOT     | GREEN"));
        assert!(text.contains("• Overall mean temperature: 23.2°C"));
        assert!(text.contains("• Highest temperature: 30.2°C"));
        assert!(text.contains("• Lowest temperature: 11.3°C"));
        assert!(text.contains("• Largest thermal amplitude: City #4"));
        assert!(text.ends_with("COMPARATIVE ANALYSIS:\nCity #2 is the warmest.\n"));
        assert!(!text.contains("Observations of"));
    }

    #[test]
    fn observation_date_is_shown() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31);
        let ds = Dataset::reference().with_observed_on(date);
        let text = Report::generate(&ds, [1, 2, 3, 4]).unwrap().to_string();

        assert!(text.contains("Observations of 2024-01-31"));
    }

    #[test]
    fn out_of_range_temperature_aborts_report() {
        let ds = Dataset::new(
            vec![TemperatureRecord::new(65.0, 20.0); 4],
            vec![HumidityRecord::new([50, 50, 50]); 4],
        )
        .unwrap();

        let err = Report::generate(&ds, [0, 1, 2, 3]).unwrap_err();
        assert_eq!(err, AnalyticsError::OutOfRange { value: 65.0 });
    }

    #[test]
    fn small_dataset_fails_on_default_comparison() {
        let ds = Dataset::new(
            vec![TemperatureRecord::new(20.0, 10.0); 3],
            vec![HumidityRecord::new([50, 50, 50]); 3],
        )
        .unwrap();

        let err = Report::generate(&ds, [1, 2, 3, 4]).unwrap_err();
        assert_eq!(err, AnalyticsError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn huge_humidity_readings_from_file_do_not_panic() {
        let ds = SourceFormat::Json
            .parse(
                r#"{"temperatures":[{"max":20.0,"min":10.0}],"humidity":[{"readings":[2147483647,1,0]}]}"#,
            )
            .expect("humidity is not range-checked");

        let report = Report::generate(&ds, [0, 0, 0, 0]).unwrap();
        assert_eq!(report.rows[0].humidity_avg, 715_827_882);
        assert_eq!(report.rows[0].alert, AlertLevel::Red);
        assert_eq!(report.comparison, Comparison::Equivalent);
    }

    #[test]
    fn json_shape() {
        let report = Report::generate(&Dataset::reference(), [1, 2, 3, 4]).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["rows"][0]["classification"], "MILDLY HOT");
        assert_eq!(value["rows"][3]["classification"], "MODERATELY HOT");
        assert_eq!(value["rows"][0]["alert"], "GREEN");
        assert_eq!(value["comparison"]["outcome"], "warmest");
        assert_eq!(value["comparison"]["city"], 2);
        assert_eq!(value["rows"][1]["city"], 2);
        assert_eq!(value["largest_amplitude_city"], 4);
        assert!(value.get("observed_on").is_none());
    }
}
