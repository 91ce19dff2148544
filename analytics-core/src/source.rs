use anyhow::{Context, Result, anyhow};
use std::{
    convert::TryFrom,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{Config, Dataset};

/// Serialization formats a dataset file may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Toml,
    Json,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Toml => "toml",
            SourceFormat::Json => "json",
        }
    }

    pub const fn all() -> &'static [SourceFormat] {
        &[SourceFormat::Toml, SourceFormat::Json]
    }

    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow!("Dataset file '{}' has no extension.", path.display()))?;

        SourceFormat::try_from(ext)
    }

    pub fn parse(&self, contents: &str) -> Result<Dataset> {
        let dataset = match self {
            SourceFormat::Toml => toml::from_str(contents)?,
            SourceFormat::Json => serde_json::from_str(contents)?,
        };
        Ok(dataset)
    }

    pub fn render(&self, dataset: &Dataset) -> Result<String> {
        let out = match self {
            SourceFormat::Toml => toml::to_string_pretty(dataset)?,
            SourceFormat::Json => serde_json::to_string_pretty(dataset)?,
        };
        Ok(out)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "toml" => Ok(SourceFormat::Toml),
            "json" => Ok(SourceFormat::Json),
            _ => Err(anyhow!(
                "Unknown dataset format '{value}'. Supported formats: toml, json."
            )),
        }
    }
}

/// Something that can hand out a validated [`Dataset`].
pub trait DatasetSource: Debug {
    fn load(&self) -> Result<Dataset>;

    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// The five-city reference observations compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl DatasetSource for BuiltinSource {
    fn load(&self) -> Result<Dataset> {
        Ok(Dataset::reference())
    }

    fn describe(&self) -> String {
        "built-in reference dataset".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn load(&self) -> Result<Dataset> {
        let format = SourceFormat::from_path(&self.path)?;

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read dataset file: {}", self.path.display()))?;

        format
            .parse(&contents)
            .with_context(|| format!("Failed to parse {format} dataset: {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Write a dataset to `path` in the format implied by its extension.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let format = SourceFormat::from_path(path)?;
    let rendered = format
        .render(dataset)
        .with_context(|| format!("Failed to serialize dataset as {format}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, rendered)
        .with_context(|| format!("Failed to write dataset file: {}", path.display()))
}

/// Resolve where observations come from: an explicit path first, then the
/// configured dataset, then the built-in reference.
pub fn source_from_config(explicit: Option<&Path>, config: &Config) -> Box<dyn DatasetSource> {
    let source: Box<dyn DatasetSource> = match explicit.or(config.dataset.as_deref()) {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(BuiltinSource),
    };

    debug!(source = %source.describe(), "dataset source selected");
    source
}
