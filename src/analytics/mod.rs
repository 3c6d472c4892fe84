//! Dashboard Analytics
//!
//! Normalization and aggregation behind the regulator dashboard.
//!
//! ## Pipeline
//!
//! 1. Raw JSON rows arrive from the API ([`RawSectorRow`], [`RawIssuerRow`])
//! 2. Normalizers coerce every field into fixed-shape records
//! 3. Aggregations derive the chart series and the issuer ranking
//!
//! Every function here is total: malformed fields become `0` or `-`.

mod aggregate;
mod coerce;
mod records;
mod view;

pub use aggregate::{
    priority_vs_return, risk_mix, sector_options, sector_volatility, top_issuers, top_issuers_n,
    PriorityVsReturnPoint, RiskLevel, RiskMixPoint, SectorFilter, VolatilityPoint, ALL_SECTORS,
    TOP_ISSUERS,
};
pub use coerce::{coerce_f64, coerce_number, present, present_or, DEFAULT_DECIMALS, MISSING};
pub use records::{
    normalize_issuers, normalize_sectors, IssuerScore, RawContext, RawIssuerRow, RawSectorRow,
    SectorSummary,
};
pub use view::{RankedIssuer, RegulatorView};
