//! Dashboard API Client
//!
//! Fetches dashboard data and reports from the IPO analytics API.
//!
//! ## Architecture
//!
//! - **DataSource**: the seam the loader reads JSON through
//! - **ApiClient**: reqwest implementation of `DataSource`, plus report
//!   downloads, Q&A and health checks
//! - **load_dashboard**: the two-tier loader producing a [`LoadResult`]

mod error;
mod loader;
mod report;
mod service;
mod source;

pub use error::{FetchError, ReportError};
pub use loader::{
    load_dashboard, Dataset, DatasetStatus, LoadResult, LoadSource, CONTEXT_PATH, SCORES_PATH,
    SECTOR_SUMMARY_PATH,
};
pub use report::{Report, ReportKind};
pub use service::{ApiHealth, ASK_PATH, HEALTH_PATH};
pub use source::{ApiClient, DataSource};
