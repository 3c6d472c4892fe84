//! IPO Dash CLI
//!
//! Terminal rendering of the IPO risk & sector dashboards:
//! - Regulator dashboard (risk mix, volatility, priority vs return, rankings)
//! - IPO rankings by sector
//! - Sector summaries
//! - Report downloads
//! - Questions to the API's Q&A assistant

use anyhow::Context;
use clap::{Parser, Subcommand};
use ipo_dash::analytics::{RankedIssuer, RegulatorView, SectorFilter, SectorSummary};
use ipo_dash::client::{
    load_dashboard, ApiClient, ApiHealth, Dataset, DatasetStatus, LoadResult, ReportKind,
};
use ipo_dash::config::{generate_default_config, Config, LoggingConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ipo-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "IPO risk & sector analysis dashboards")]
#[command(long_about = "IPO Dash renders the regulator dashboard and IPO rankings from the IPO analytics API.\nData is loaded from /context, falling back to /sector-summary and /scores.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config file and IPO_DASH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the regulator dashboard
    Regulators {
        /// Restrict the IPO ranking to one sector (default: All)
        #[arg(short, long)]
        sector: Option<String>,
    },

    /// Show the top 10 IPOs by priority score
    Rankings {
        /// Restrict the ranking to one sector (default: All)
        #[arg(short, long)]
        sector: Option<String>,
    },

    /// List normalized sector summaries
    Sectors,

    /// Download a PDF report (investor, regulator, test)
    Report {
        kind: ReportKind,
        /// Directory to write the report into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Ask a question about the IPO data
    Ask {
        /// The question (remaining words are joined)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Show API health, which endpoints served the data and whether any failed
    Status,

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

    // Tracing is configured from this config, so failures are printed directly
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => match Config::load_first(&Config::default_paths()) {
            Ok(Some(config)) => config,
            Ok(None) => Config::from_env(),
            Err(e) => {
                eprintln!("warning: {}; using defaults", e);
                Config::from_env()
            }
        },
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging);

    let client = ApiClient::new(&config.api).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Regulators { sector } => {
            let data = load_dashboard(&client).await;
            warn_failures(&data);

            let filter = SectorFilter::from(sector.as_deref());
            let view = data.regulator_view(&filter);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&view)?),
                "csv" => write_csv(&view.rankings)?,
                _ => print_regulator_view(&view),
            }
        }

        Commands::Rankings { sector } => {
            let data = load_dashboard(&client).await;
            warn_failures(&data);

            let filter = SectorFilter::from(sector.as_deref());
            let view = data.regulator_view(&filter);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&view.rankings)?),
                "csv" => write_csv(&view.rankings)?,
                _ => print_rankings(&view.rankings, &view.selected_sector),
            }
        }

        Commands::Sectors => {
            let data = load_dashboard(&client).await;
            warn_failures(&data);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(data.sectors())?),
                "csv" => write_csv(data.sectors())?,
                _ => print_sectors(data.sectors()),
            }
        }

        Commands::Report { kind, output } => match client.download_report(kind).await {
            Ok(report) => {
                let path = report.save_to(&output)?;
                println!("Saved {} report to {:?}", kind, path);
            }
            Err(e) => {
                eprintln!("Failed to download {} report: {}", kind, e);
                std::process::exit(1);
            }
        },

        Commands::Ask { question } => {
            let question = question.join(" ");
            match client.ask(&question).await {
                Ok(answer) => match cli.format.as_str() {
                    "json" => println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "question": question,
                            "answer": answer,
                        }))?
                    ),
                    _ => println!("{}", answer),
                },
                Err(e) => {
                    eprintln!("Failed to get an answer: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Status => {
            let (health, data) = tokio::join!(client.health(), load_dashboard(&client));
            let status = LoadStatus::new(&health, &data);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&status)?),
                _ => {
                    println!("IPO Dash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API:     {}", client.base_url());
                    match &health {
                        Ok(h) => {
                            println!("Health:  {}", h.status);
                            println!("  Data:      {}", yes_no(h.has_data));
                            println!("  Priority:  {}", yes_no(h.has_priority));
                            println!("  Context:   {}", yes_no(h.has_context));
                            println!("  Model key: {}", yes_no(h.key_present));
                            if let Some(model) = &h.model {
                                println!("  Model:     {}", model);
                            }
                        }
                        Err(e) => println!("Health:  unreachable ({})", e),
                    }
                    println!("Source:  {:?}", data.source);
                    println!("Sectors: {}", describe(&data.sectors));
                    println!("Issuers: {}", describe(&data.issuers));
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", config),
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("ipo_dash={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Health plus per-dataset summary for `status --format json`
#[derive(Serialize)]
struct LoadStatus<'a> {
    health: Option<&'a ApiHealth>,
    source: ipo_dash::LoadSource,
    sectors: &'a DatasetStatus,
    sector_rows: usize,
    issuers: &'a DatasetStatus,
    issuer_rows: usize,
}

impl<'a> LoadStatus<'a> {
    fn new(health: &'a Result<ApiHealth, ipo_dash::FetchError>, data: &'a LoadResult) -> Self {
        Self {
            health: health.as_ref().ok(),
            source: data.source,
            sectors: &data.sectors.status,
            sector_rows: data.sectors.rows.len(),
            issuers: &data.issuers.status,
            issuer_rows: data.issuers.rows.len(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn describe<T>(dataset: &Dataset<T>) -> String {
    match &dataset.status {
        DatasetStatus::Loaded => format!("{} rows", dataset.rows.len()),
        DatasetStatus::Empty => "no data".to_string(),
        DatasetStatus::Failed { reason } => format!("failed ({})", reason),
    }
}

fn warn_failures(data: &LoadResult) {
    if let DatasetStatus::Failed { reason } = &data.sectors.status {
        eprintln!("warning: sector summaries unavailable: {}", reason);
    }
    if let DatasetStatus::Failed { reason } = &data.issuers.status {
        eprintln!("warning: issuer scores unavailable: {}", reason);
    }
}

fn write_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_regulator_view(view: &RegulatorView) {
    println!("Regulatory Dashboard");
    println!("Sector stability - Risk signals - Oversight metrics");
    println!();

    println!("Risk Composition");
    println!("{}", "-".repeat(30));
    for point in &view.risk_mix {
        println!("{:<12} {:>8.2}%", point.risk, point.value);
    }
    println!();

    println!("Sector Volatility");
    println!("{}", "-".repeat(30));
    if view.volatility.is_empty() {
        println!("No sector data");
    }
    for point in &view.volatility {
        println!("{:<20} {:>8.2}", point.name, point.volatility);
    }
    println!();

    println!("Priority vs Return");
    println!("{:<20} {:>10} {:>10}", "Sector", "Priority", "Return %");
    println!("{}", "-".repeat(42));
    for point in &view.priority_vs_return {
        println!(
            "{:<20} {:>10.1} {:>10.1}",
            point.name, point.priority, point.return_pct
        );
    }
    println!();

    print_rankings(&view.rankings, &view.selected_sector);

    if !view.sector_options.is_empty() {
        println!();
        println!("Sectors: All, {}", view.sector_options.join(", "));
    }
}

fn print_rankings(rankings: &[RankedIssuer], sector: &str) {
    println!("IPO Rankings ({})", sector);

    if rankings.is_empty() {
        println!("No issuers for the selected sector");
        return;
    }

    println!(
        "{:<4} {:<30} {:<20} {:<6} {:>6}",
        "#", "Issuer", "Sector", "Year", "Score"
    );
    println!("{}", "-".repeat(70));

    for row in rankings {
        println!(
            "{:<4} {:<30} {:<20} {:<6} {:>6}",
            row.rank,
            row.issuer_name,
            row.sector,
            row.year_label(),
            row.score_label()
        );
    }
}

fn print_sectors(sectors: &[SectorSummary]) {
    if sectors.is_empty() {
        println!("No sector data.");
        return;
    }

    println!(
        "{:<20} {:>9} {:>9} {:>7} {:>9} {:>7}",
        "Sector", "Priority", "Return %", "Low %", "Mod %", "High %"
    );
    println!("{}", "-".repeat(66));

    for s in sectors {
        println!(
            "{:<20} {:>9.1} {:>9.1} {:>7.1} {:>9.1} {:>7.1}",
            s.sector, s.sector_priority, s.mean_return, s.low_pct, s.moderate_pct, s.high_pct
        );
    }
}
