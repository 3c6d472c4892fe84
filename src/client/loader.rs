//! Dashboard Loader
//!
//! Loads sector summaries and issuer scores in two tiers:
//!
//! 1. `GET /context` returns both datasets in one document
//! 2. If that fails, `GET /sector-summary` and `GET /scores` are issued
//!    concurrently and each settles on its own
//!
//! Loading never fails. Each dataset carries a [`DatasetStatus`] so callers
//! can tell an empty dataset from a failed one.

use serde::Serialize;
use serde_json::Value;

use super::error::FetchError;
use super::source::DataSource;
use crate::analytics::{
    normalize_issuers, normalize_sectors, IssuerScore, RawContext, RegulatorView, SectorFilter,
    SectorSummary,
};

pub const CONTEXT_PATH: &str = "/context";
pub const SECTOR_SUMMARY_PATH: &str = "/sector-summary";
pub const SCORES_PATH: &str = "/scores";

/// Which tier served a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// The combined `/context` document
    Context,
    /// The per-endpoint fallback requests
    Fallback,
}

/// Outcome of fetching one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetStatus {
    Loaded,
    Empty,
    Failed {
        #[serde(serialize_with = "serialize_display")]
        reason: FetchError,
    },
}

fn serialize_display<S: serde::Serializer>(err: &FetchError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Normalized rows plus how they were obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset<T> {
    pub rows: Vec<T>,
    pub status: DatasetStatus,
}

impl<T> Dataset<T> {
    fn from_rows(rows: Vec<T>) -> Self {
        let status = if rows.is_empty() {
            DatasetStatus::Empty
        } else {
            DatasetStatus::Loaded
        };
        Self { rows, status }
    }

    fn failed(reason: FetchError) -> Self {
        Self {
            rows: Vec::new(),
            status: DatasetStatus::Failed { reason },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, DatasetStatus::Failed { .. })
    }
}

/// Result of one dashboard load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResult {
    pub source: LoadSource,
    pub sectors: Dataset<SectorSummary>,
    pub issuers: Dataset<IssuerScore>,
}

impl LoadResult {
    pub fn sectors(&self) -> &[SectorSummary] {
        &self.sectors.rows
    }

    pub fn issuers(&self) -> &[IssuerScore] {
        &self.issuers.rows
    }

    /// Derive the regulator dashboard for the selected sector
    pub fn regulator_view(&self, filter: &SectorFilter) -> RegulatorView {
        RegulatorView::build(self.sectors(), self.issuers(), filter)
    }
}

/// Load both datasets, falling back to per-endpoint requests when the
/// combined context is unavailable.
pub async fn load_dashboard<S: DataSource + ?Sized>(source: &S) -> LoadResult {
    match load_context(source).await {
        Ok(result) => {
            tracing::info!(
                sectors = result.sectors.rows.len(),
                issuers = result.issuers.rows.len(),
                "Loaded dashboard from combined context"
            );
            return result;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Combined context unavailable, falling back to per-endpoint requests");
        }
    }

    let (sectors, issuers) = tokio::join!(
        fetch_rows(source, SECTOR_SUMMARY_PATH),
        fetch_rows(source, SCORES_PATH),
    );

    let sectors = settle(SECTOR_SUMMARY_PATH, sectors, normalize_sectors);
    let issuers = settle(SCORES_PATH, issuers, normalize_issuers);

    tracing::info!(
        sectors = sectors.rows.len(),
        issuers = issuers.rows.len(),
        "Loaded dashboard from fallback endpoints"
    );

    LoadResult {
        source: LoadSource::Fallback,
        sectors,
        issuers,
    }
}

async fn load_context<S: DataSource + ?Sized>(source: &S) -> Result<LoadResult, FetchError> {
    let body = source.get_json(CONTEXT_PATH).await?;
    // serde would otherwise read an array body positionally
    if !body.is_object() {
        return Err(FetchError::Decode(format!(
            "expected a context object, got {}",
            json_kind(&body)
        )));
    }
    let context: RawContext = serde_json::from_value(body)?;

    Ok(LoadResult {
        source: LoadSource::Context,
        sectors: Dataset::from_rows(normalize_sectors(context.sectors.as_deref())),
        issuers: Dataset::from_rows(normalize_issuers(context.issuers.as_deref())),
    })
}

async fn fetch_rows<S: DataSource + ?Sized>(
    source: &S,
    path: &str,
) -> Result<Vec<Value>, FetchError> {
    match source.get_json(path).await? {
        Value::Array(rows) => Ok(rows),
        other => Err(FetchError::Decode(format!(
            "expected an array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

fn settle<T>(
    path: &str,
    fetched: Result<Vec<Value>, FetchError>,
    normalize: fn(Option<&[Value]>) -> Vec<T>,
) -> Dataset<T> {
    match fetched {
        Ok(rows) => Dataset::from_rows(normalize(Some(rows.as_slice()))),
        Err(e) => {
            tracing::warn!(path, error = %e, "Endpoint failed, using empty dataset");
            Dataset::failed(e)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
