//! # IPO Dash
//!
//! IPO Risk & Sector Analysis - the data layer behind the investor and
//! regulator dashboards.
//!
//! ## Features
//!
//! - **Resilient loading**: one combined request, with a concurrent
//!   per-endpoint fallback that tolerates partial failure
//! - **Defensive normalization**: malformed numeric fields degrade to `0`,
//!   missing labels to `-`
//! - **Dashboard aggregates**: risk mix, priority-vs-return, sector volatility
//!   and the top-10 IPO ranking
//! - **Reports**: download investor and regulator PDF briefs
//! - **Q&A**: ask the API questions about the loaded IPO data
//!
//! ## Modules
//!
//! - [`analytics`]: Normalization and aggregation
//! - [`client`]: API client and loader
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ipo_dash::{load_dashboard, ApiClient, ApiConfig, SectorFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&ApiConfig::new("http://localhost:8000"))?;
//!
//!     // Never fails; check the dataset statuses for fetch errors
//!     let data = load_dashboard(&client).await;
//!     let view = data.regulator_view(&SectorFilter::All);
//!
//!     for row in &view.rankings {
//!         println!("{} {} {}", row.rank, row.issuer_name, row.score_label());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod client;
pub mod config;

pub use analytics::{
    coerce_number, normalize_issuers, normalize_sectors, present, risk_mix, top_issuers,
    IssuerScore, RankedIssuer, RegulatorView, RiskLevel, RiskMixPoint, SectorFilter,
    SectorSummary,
};

pub use client::{
    load_dashboard, ApiClient, ApiHealth, DataSource, Dataset, DatasetStatus, FetchError,
    LoadResult, LoadSource, Report, ReportError, ReportKind,
};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};
