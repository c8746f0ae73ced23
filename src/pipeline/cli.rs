//! Command-line interface.

use super::config::Config;
use super::train::{run_average, run_stats, run_training};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "persuasion")]
#[command(about = "Predict and analyse mind changes in debate votes", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Only use debates of this category
    #[arg(long, global = true)]
    pub category: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble the dataset and cross-validate the classifier
    Train {
        /// Append the result to this CSV
        #[arg(long)]
        results: Option<PathBuf>,
    },
    /// Vote-outcome statistics and demographic tables
    Stats {
        /// Directory for the CSV tables
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Average accuracy per model across result CSVs
    Average {
        /// Directory holding result CSVs
        dir: PathBuf,
    },
}

impl Cli {
    /// Configuration with command-line overrides applied.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(category) = &self.category {
            config.data.category = Some(category.clone());
        }
        match &self.command {
            Command::Train { results: Some(path) } => config.output.results_csv = Some(path.clone()),
            Command::Stats { out: Some(dir) } => config.output.report_dir = dir.clone(),
            _ => {}
        }
        Ok(config)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Train { .. } => {
            run_training(&cli.load_config()?)?;
        }
        Command::Stats { .. } => {
            run_stats(&cli.load_config()?)?;
        }
        Command::Average { dir } => {
            run_average(dir)?;
        }
    }
    Ok(())
}
