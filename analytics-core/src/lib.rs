//! Core library for the `weather-analytics` CLI.
//!
//! This crate defines:
//! - The co-indexed temperature/humidity dataset and its validation
//! - Pure analytic functions (weighted averages, classification, alerts, statistics)
//! - Dataset sources (built-in reference data, TOML/JSON files) and configuration
//! - Report assembly and text rendering
//!
//! It is used by `weather-analytics-cli`, but can also be reused by other binaries or services.

pub mod analytics;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod source;

pub use analytics::{AlertLevel, Classification, Comparison, Statistics};
pub use config::Config;
pub use error::AnalyticsError;
pub use model::{CityObservation, Dataset, HumidityRecord, TemperatureRecord};
pub use report::{CityRow, Report};
pub use source::{BuiltinSource, DatasetSource, FileSource, SourceFormat};
