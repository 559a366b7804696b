//! MediScope CLI
//!
//! Command-line interface for MediScope operations:
//! - Inspect a surveillance CSV
//! - Hot issues, forecasts, triage and risk scores from the local file
//! - Check status of, or reload, a running server

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mediscope::config::Config;
use mediscope::dashboard::{self, format_count};
use mediscope::forecast::Forecaster;
use mediscope::risk::{self, AgeGroup, Condition, Occupation, RiskProfile, Vaccine};
use mediscope::surveillance::{load_or_fallback, DataSource, Dataset, Normalizer};
use mediscope::triage;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mediscope-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Statutory infectious-disease surveillance toolkit")]
#[command(long_about = "MediScope turns the monthly infectious-disease report into hot issues,\nforecasts and triage hints.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8501", global = true)]
    pub api_url: String,

    /// Surveillance CSV (default: from config)
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// Config file (default: standard locations)
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Reporting year of the monthly columns (default: from config)
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a CSV and report what was found
    Inspect {
        /// Path to CSV file
        path: PathBuf,
        /// Fail on parse errors instead of falling back to placeholder data
        #[arg(long)]
        strict: bool,
    },

    /// Show the latest month's hot issues
    Hot {
        /// Number of diseases to show (default: from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Forecast a disease's monthly counts
    Forecast {
        /// Disease name, e.g. 수두
        disease: String,
        /// Months to project (default: from config)
        #[arg(short, long)]
        periods: Option<u32>,
    },

    /// Triage a symptom description
    Triage {
        /// Free-text symptoms
        text: Vec<String>,
    },

    /// Score personal infection risk
    Risk {
        /// Age group: under_ten, teens, twenties_thirties, forties_fifties, sixty_plus
        #[arg(long)]
        age: AgeGroup,
        /// Occupation: student, unemployed_retired, office, healthcare, education_childcare, food_service
        #[arg(long)]
        job: Occupation,
        /// Underlying condition (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<Condition>,
        /// Vaccination received in the last year (repeatable)
        #[arg(long = "vaccine")]
        vaccinations: Vec<Vaccine>,
    },

    /// Show status of a running server
    Status,

    /// Ask a running server to reload its CSV
    Reload,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let config = match &cli.config_file {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    let csv_path = cli.csv.clone().unwrap_or_else(|| config.data.csv_path.clone());
    let year = cli.year.unwrap_or(config.data.reporting_year);
    let json = cli.format == "json";

    match cli.command {
        Commands::Inspect { path, strict } => {
            if strict {
                let normalized = Normalizer::new(year)
                    .normalize_file(&path)
                    .with_context(|| format!("Failed to normalize {:?}", path))?;

                println!("File: {:?}", path);
                println!("Encoding: {}", normalized.encoding);
                println!("Header row: {}", normalized.header_row);
                println!("Rows skipped: {}", normalized.rows_skipped);
                println!("Records: {}", normalized.records.len());
            } else {
                let dataset = load_or_fallback(&path, year);
                print_source(&dataset);
                println!("Records: {}", dataset.len());
                println!(
                    "Classes: {}",
                    dataset
                        .classes()
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("Diseases: {}", dataset.diseases(None).len());
                if let Some(month) = dataset.latest_month() {
                    println!("Latest month: {}", month.format("%Y-%m"));
                }
            }
        }

        Commands::Hot { limit } => {
            let dataset = local_dataset(&csv_path, year);
            let issues =
                dashboard::hot_issues(&dataset, limit.unwrap_or(config.data.hot_issue_count));

            if json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else if issues.is_empty() {
                println!("No cases reported in the latest month.");
            } else {
                println!("{:<20} {:<8} {:>10}  {}", "Disease", "Class", "Count", "Trend");
                println!("{}", "-".repeat(56));

                for issue in issues {
                    println!(
                        "{:<20} {:<8} {:>10}  {}",
                        issue.disease,
                        issue.class.as_str(),
                        format_count(issue.count),
                        issue.trend.label(issue.change)
                    );
                }
            }
        }

        Commands::Forecast { disease, periods } => {
            let dataset = local_dataset(&csv_path, year);
            if !dataset.contains_disease(&disease) {
                bail!("Disease '{}' not found in the data", disease);
            }

            let forecaster = Forecaster::new(config.forecast.clone())?;
            let periods = periods.unwrap_or(config.forecast.periods);
            let forecast =
                forecaster.forecast_periods(&disease, &dataset.series(&disease), periods)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                println!("{:<10} {:>10} {:>10} {:>10}", "Month", "Expected", "Lower", "Upper");
                println!("{}", "-".repeat(43));

                for point in &forecast.future {
                    println!(
                        "{:<10} {:>10.0} {:>10.0} {:>10.0}",
                        point.date.format("%Y-%m"),
                        point.yhat,
                        point.yhat_lower,
                        point.yhat_upper
                    );
                }

                if let Some(comment) = forecast.peak_comment() {
                    println!();
                    println!("{}", comment);
                }
            }
        }

        Commands::Triage { text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                bail!("Describe your symptoms, e.g. mediscope-cli triage 열이 나요");
            }

            let dataset = local_dataset(&csv_path, year);
            let reply = triage::respond(&text, &dataset);

            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.message.replace("**", ""));
            }
        }

        Commands::Risk {
            age,
            job,
            conditions,
            vaccinations,
        } => {
            let report = risk::assess(&RiskProfile {
                age_group: age,
                occupation: job,
                conditions,
                vaccinations,
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Risk score: {}/100 ({:?})", report.score, report.band);
                if report.warnings.is_empty() {
                    println!("No specific warnings.");
                }
                for warning in &report.warnings {
                    let marker = if warning.high_risk { "!" } else { "-" };
                    println!("  {} {}: {}", marker, warning.title, warning.message);
                }
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("MediScope v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("Data: {}", health["data"].as_str().unwrap_or("unknown"));
                    if let Some(records) = health["records"].as_u64() {
                        println!("Records: {}", records);
                    }
                    if let Some(sessions) = health["chat_sessions"].as_u64() {
                        println!("Chat sessions: {}", sessions);
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Cannot connect to MediScope API at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the MediScope API server is running:");
                    eprintln!("  cargo run --bin mediscope");
                    return Err(e.into());
                }
            }
        }

        Commands::Reload => {
            let response = client
                .post(format!("{}/api/v1/data/reload", cli.api_url))
                .send()
                .await
                .with_context(|| format!("Cannot connect to MediScope API at {}", cli.api_url))?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                bail!("Reload failed ({}): {}", status, text);
            }

            let result: serde_json::Value = response.json().await?;
            println!(
                "Reloaded {} records ({})",
                result["records"].as_u64().unwrap_or(0),
                result["data_source"]["kind"].as_str().unwrap_or("unknown")
            );
            if let Some(notice) = result["notice"].as_str() {
                println!("{}", notice);
            }
        }

        Commands::Config { output } => {
            let config = mediscope::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Load the CSV, announcing when placeholder data stands in for it
fn local_dataset(path: &Path, year: i32) -> Dataset {
    let dataset = load_or_fallback(path, year);
    if let Some(notice) = dataset.notice() {
        eprintln!("{}", notice);
    }
    dataset
}

fn print_source(dataset: &Dataset) {
    match &dataset.source {
        DataSource::File {
            path,
            encoding,
            header_row,
            rows_skipped,
        } => {
            println!("File: {:?}", path);
            println!("Encoding: {}", encoding);
            println!("Header row: {}", header_row);
            println!("Rows skipped: {}", rows_skipped);
        }
        DataSource::Fallback { reason } => {
            println!("Placeholder data ({})", reason);
        }
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
