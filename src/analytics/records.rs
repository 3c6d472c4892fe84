//! Dashboard records
//!
//! Raw rows as they arrive from the API, the fixed-shape records the
//! dashboard works with, and the normalizers converting one into the other.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{coerce_number, present};

/// Precision for sector priority, mean return and risk percentages
const SECTOR_DECIMALS: u32 = 1;
/// Issue years are whole numbers
const YEAR_DECIMALS: u32 = 0;
/// Precision for issuer priority scores
const SCORE_DECIMALS: u32 = 1;

// ============================================
// Raw ingestion rows
// ============================================

/// A sector row exactly as received. Any field may be missing or malformed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSectorRow {
    pub sector: Option<Value>,
    pub sector_priority: Option<Value>,
    pub mean_return: Option<Value>,
    #[serde(rename = "Low_pct")]
    pub low_pct: Option<Value>,
    #[serde(rename = "Moderate_pct")]
    pub moderate_pct: Option<Value>,
    #[serde(rename = "High_pct")]
    pub high_pct: Option<Value>,
}

/// An issuer row exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIssuerRow {
    pub issuer_name: Option<Value>,
    pub sector: Option<Value>,
    pub issue_year: Option<Value>,
    pub priority_score_0_100: Option<Value>,
}

/// Combined `/context` payload. Missing arrays count as empty; arrays of
/// the wrong type fail deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawContext {
    pub sectors: Option<Vec<Value>>,
    pub issuers: Option<Vec<Value>>,
}

impl RawSectorRow {
    /// Read a row from an arbitrary JSON value. Non-objects have no fields.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

impl RawIssuerRow {
    /// Read a row from an arbitrary JSON value. Non-objects have no fields.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

// ============================================
// Normalized records
// ============================================

/// Aggregated risk/return statistics for one industry sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub sector: String,
    pub sector_priority: f64,
    pub mean_return: f64,
    #[serde(rename = "Low_pct")]
    pub low_pct: f64,
    #[serde(rename = "Moderate_pct")]
    pub moderate_pct: f64,
    #[serde(rename = "High_pct")]
    pub high_pct: f64,
}

/// Per-company priority ranking derived from model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerScore {
    pub issuer_name: String,
    pub sector: String,
    /// Whole-number year, `0` when unknown
    pub issue_year: f64,
    /// Expected in `[0, 100]`, not clamped
    pub priority_score_0_100: f64,
}

impl From<RawSectorRow> for SectorSummary {
    fn from(raw: RawSectorRow) -> Self {
        Self {
            sector: present(raw.sector.as_ref()),
            sector_priority: coerce_number(raw.sector_priority.as_ref(), SECTOR_DECIMALS),
            mean_return: coerce_number(raw.mean_return.as_ref(), SECTOR_DECIMALS),
            low_pct: coerce_number(raw.low_pct.as_ref(), SECTOR_DECIMALS),
            moderate_pct: coerce_number(raw.moderate_pct.as_ref(), SECTOR_DECIMALS),
            high_pct: coerce_number(raw.high_pct.as_ref(), SECTOR_DECIMALS),
        }
    }
}

impl From<RawIssuerRow> for IssuerScore {
    fn from(raw: RawIssuerRow) -> Self {
        Self {
            issuer_name: present(raw.issuer_name.as_ref()),
            sector: present(raw.sector.as_ref()),
            issue_year: coerce_number(raw.issue_year.as_ref(), YEAR_DECIMALS),
            priority_score_0_100: coerce_number(raw.priority_score_0_100.as_ref(), SCORE_DECIMALS),
        }
    }
}

/// Normalize raw sector rows. `None` is treated as an empty list; output
/// length always equals input length.
pub fn normalize_sectors(rows: Option<&[Value]>) -> Vec<SectorSummary> {
    rows.unwrap_or_default()
        .iter()
        .map(|row| RawSectorRow::from_value(row).into())
        .collect()
}

/// Normalize raw issuer rows. `None` is treated as an empty list; output
/// length always equals input length.
pub fn normalize_issuers(rows: Option<&[Value]>) -> Vec<IssuerScore> {
    rows.unwrap_or_default()
        .iter()
        .map(|row| RawIssuerRow::from_value(row).into())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_sectors_field_precision() {
        let rows = vec![json!({
            "sector": "Technology",
            "sector_priority": 71.26,
            "mean_return": "18.44",
            "Low_pct": 55.55,
            "Moderate_pct": 30,
            "High_pct": "14.45",
            "ipo_count": 42
        })];

        let sectors = normalize_sectors(Some(rows.as_slice()));
        assert_eq!(
            sectors,
            vec![SectorSummary {
                sector: "Technology".to_string(),
                sector_priority: 71.3,
                mean_return: 18.4,
                low_pct: 55.5,
                moderate_pct: 30.0,
                high_pct: 14.4,
            }]
        );
    }

    #[test]
    fn test_normalize_sectors_missing_input() {
        assert!(normalize_sectors(None).is_empty());
        assert!(normalize_sectors(Some(&[][..])).is_empty());
    }

    #[test]
    fn test_normalize_sectors_preserves_length() {
        let rows = vec![
            json!({"sector": "Energy"}),
            json!(null),
            json!(17),
            json!("Banking"),
            json!([1, 2]),
            json!({}),
        ];

        let sectors = normalize_sectors(Some(rows.as_slice()));
        assert_eq!(sectors.len(), rows.len());
        assert_eq!(sectors[0].sector, "Energy");
        for summary in &sectors[1..] {
            assert_eq!(summary.sector, "-");
            assert_eq!(summary.sector_priority, 0.0);
            assert_eq!(summary.low_pct + summary.moderate_pct + summary.high_pct, 0.0);
        }
    }

    #[test]
    fn test_normalize_issuers() {
        let rows = vec![
            json!({
                "issuer_name": "IRCTC",
                "sector": "Travel",
                "issue_year": 2019.0,
                "priority_score_0_100": 88.88,
                "sector_rank": 1
            }),
            json!({"issuer_name": null, "issue_year": "n/a", "priority_score_0_100": "61.04"}),
        ];

        let issuers = normalize_issuers(Some(rows.as_slice()));
        assert_eq!(issuers.len(), 2);
        assert_eq!(issuers[0].issuer_name, "IRCTC");
        assert_eq!(issuers[0].issue_year, 2019.0);
        assert_eq!(issuers[0].priority_score_0_100, 88.9);

        assert_eq!(issuers[1].issuer_name, "-");
        assert_eq!(issuers[1].sector, "-");
        assert_eq!(issuers[1].issue_year, 0.0);
        assert_eq!(issuers[1].priority_score_0_100, 61.0);
    }

    #[test]
    fn test_issue_year_is_whole() {
        let rows = vec![json!({"issue_year": 2020.6}), json!({"issue_year": "2018.4"})];
        let issuers = normalize_issuers(Some(rows.as_slice()));
        assert_eq!(issuers[0].issue_year, 2021.0);
        assert_eq!(issuers[1].issue_year, 2018.0);
    }

    #[test]
    fn test_wire_names_preserved() {
        let summary: SectorSummary = RawSectorRow::from_value(&json!({
            "sector": "Pharma",
            "Low_pct": 10
        }))
        .into();

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["Low_pct"], json!(10.0));
        assert_eq!(value["Moderate_pct"], json!(0.0));
        assert!(value.get("low_pct").is_none());
    }

    #[test]
    fn test_raw_context_shapes() {
        let ctx: RawContext = serde_json::from_value(json!({"sectors": []})).unwrap();
        assert!(ctx.issuers.is_none());

        let bad = serde_json::from_value::<RawContext>(json!({"sectors": {"a": 1}}));
        assert!(bad.is_err());
    }
}
