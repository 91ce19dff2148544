use thiserror::Error;

/// Failures raised by the analytic functions and dataset construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A temperature fell outside the validated [-50, 60] °C window.
    #[error("temperature {value}°C is outside the allowed range [-50, 60]")]
    OutOfRange { value: f64 },

    #[error("city index {index} is out of range (dataset has {len} cities)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(
        "dataset is inconsistent: {temperatures} temperature records but {humidity} humidity records"
    )]
    DatasetMismatch { temperatures: usize, humidity: usize },

    #[error("dataset contains no cities")]
    EmptyDataset,

    /// City numbers shown to users start at 1.
    #[error("invalid city number {number}; city numbers start at 1")]
    InvalidCityNumber { number: usize },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
