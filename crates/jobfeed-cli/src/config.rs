use clap::{Args, Parser, Subcommand};
use jobfeed_core::error::AppError;
use jobfeed_core::record::Criteria;
use jobfeed_core::vacancy::{FIELD_TITLE, FIELD_URL};
use jobfeed_core::{load_config, AppConfig};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "jobfeed")]
#[command(author, version, about = "Search, rank and save HeadHunter vacancies")]
#[command(after_help = "Examples:
  jobfeed search Rust --pages 2 --top 10
  jobfeed search Python --filter django fastapi --save
  jobfeed saved
  jobfeed delete --title \"Python Developer\"")]
pub struct Config {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "JOBFEED_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the vacancies API endpoint
    #[arg(long, global = true, env = "JOBFEED_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory holding saved vacancy files
    #[arg(long, global = true, env = "JOBFEED_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Loads file configuration and applies command-line overrides.
    pub fn app_config(&self) -> Result<AppConfig, AppError> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(url) = &self.api_url {
            config.http.base_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search vacancies and print the best-paid matches
    #[command(after_help = "Examples:
  jobfeed search Rust                         # First page, all results
  jobfeed search Rust --pages 3 --top 5       # Five best-paid of three pages
  jobfeed search Go --min-salary 200000       # Average salary of at least 200k
  jobfeed search Java --save --file java.json # Save results to data/java.json")]
    Search(SearchArgs),
    /// List saved vacancies
    Saved {
        /// Store file name inside the data directory
        #[arg(short, long, value_name = "FILE")]
        file: Option<String>,
    },
    /// Delete saved vacancies matching all given fields
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword
    pub keyword: String,

    /// Number of result pages to fetch
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub pages: u32,

    /// Show only the N best-paid vacancies
    #[arg(short, long, value_name = "N")]
    pub top: Option<NonZeroUsize>,

    /// Keep vacancies whose description mentions any of these words
    #[arg(long, num_args = 1.., value_name = "WORD")]
    pub filter: Vec<String>,

    /// Minimum average salary
    #[arg(long)]
    pub min_salary: Option<u64>,

    /// Maximum average salary
    #[arg(long)]
    pub max_salary: Option<u64>,

    /// Save the shown vacancies to the store
    #[arg(short, long)]
    pub save: bool,

    /// Store file name inside the data directory
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Store file name inside the data directory
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<String>,

    /// Match vacancies with this exact title
    #[arg(long)]
    pub title: Option<String>,

    /// Match vacancies with this exact URL
    #[arg(long)]
    pub url: Option<String>,

    /// Delete every saved vacancy
    #[arg(long, conflicts_with_all = ["title", "url"])]
    pub all: bool,
}

impl DeleteArgs {
    /// Builds deletion criteria; `None` when no field was given and `--all`
    /// was not set.
    pub fn criteria(&self) -> Option<Criteria> {
        let mut criteria = Criteria::new();
        if let Some(title) = &self.title {
            criteria.insert(FIELD_TITLE.to_string(), Value::from(title.as_str()));
        }
        if let Some(url) = &self.url {
            criteria.insert(FIELD_URL.to_string(), Value::from(url.as_str()));
        }

        if criteria.is_empty() && !self.all {
            None
        } else {
            Some(criteria)
        }
    }
}
