use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::Confirm;
use std::path::PathBuf;
use tracing::info;
use weather_analytics_core::{
    Config, Dataset, Report,
    analytics::heat_index,
    config::city_numbers_to_indices,
    source::{source_from_config, write_dataset},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-analytics",
    version,
    about = "Descriptive statistics and alerts for city weather observations"
)]
pub struct Cli {
    /// Dataset file (.toml or .json); overrides the configured dataset.
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Log computation details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `report` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full analysis report.
    Report {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Four 1-based city numbers to compare, e.g. "2,3,4,5".
        #[arg(long, value_delimiter = ',')]
        compare: Option<Vec<usize>>,
    },

    /// Compute the heat index for a temperature and humidity.
    HeatIndex {
        /// Temperature in °C.
        #[arg(long, allow_hyphen_values = true)]
        temp: f64,

        /// Relative humidity in percent.
        #[arg(long)]
        humidity: i32,
    },

    /// Write the reference dataset to the data directory and make it the default.
    Init {
        /// Overwrite an existing dataset without asking.
        #[arg(long)]
        force: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Report {
            format: OutputFormat::default(),
            compare: None,
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or_default() {
            Command::Report { format, compare } => {
                let config = Config::load()?;
                let source = source_from_config(self.dataset.as_deref(), &config);
                let dataset = source.load()?;

                let indices = match compare {
                    Some(numbers) => city_numbers_to_indices(parse_compare(&numbers)?)?,
                    None => config.compare_indices()?,
                };

                let report = Report::generate(&dataset, indices)
                    .with_context(|| format!("Failed to analyse {}", source.describe()))?;

                match format {
                    OutputFormat::Text => print!("{report}"),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                }
            }
            Command::HeatIndex { temp, humidity } => {
                println!("Heat index: {:.1}°C", heat_index(temp, humidity));
            }
            Command::Init { force } => {
                let path = match self.dataset {
                    Some(path) => path,
                    None => Config::default_dataset_path()?,
                };

                if path.exists() && !force {
                    let overwrite = Confirm::new(&format!(
                        "{} already exists. Overwrite it?",
                        path.display()
                    ))
                    .with_default(false)
                    .prompt()?;

                    if !overwrite {
                        println!("Keeping existing dataset at {}", path.display());
                        return Ok(());
                    }
                }

                write_dataset(&path, &Dataset::reference())?;

                let mut config = Config::load()?;
                config.set_dataset(path.clone());
                config.save()?;

                info!(path = %path.display(), "reference dataset written");
                println!("Reference dataset written to {}", path.display());
            }
        }

        Ok(())
    }
}

fn parse_compare(numbers: &[usize]) -> anyhow::Result<[usize; 4]> {
    numbers.try_into().map_err(|_| {
        anyhow!(
            "--compare expects exactly four city numbers, got {}",
            numbers.len()
        )
    })
}
