//! Dashboard aggregations
//!
//! Pure transformations over normalized records: risk mix, chart series,
//! sector options and the issuer ranking.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::coerce::{coerce_f64, DEFAULT_DECIMALS};
use super::records::{IssuerScore, SectorSummary};

/// Number of issuers shown in the ranking
pub const TOP_ISSUERS: usize = 10;

/// Risk classification tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }

    /// This tier's percentage within a sector
    fn share_of(&self, sector: &SectorSummary) -> f64 {
        match self {
            RiskLevel::Low => sector.low_pct,
            RiskLevel::Moderate => sector.moderate_pct,
            RiskLevel::High => sector.high_pct,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Average share of one risk tier across sectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMixPoint {
    pub risk: RiskLevel,
    pub value: f64,
}

/// Paired per-sector priority and return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityVsReturnPoint {
    pub name: String,
    pub priority: f64,
    #[serde(rename = "returnPct")]
    pub return_pct: f64,
}

/// Per-sector bar for the volatility chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    pub name: String,
    pub volatility: f64,
}

/// Mean Low/Moderate/High percentage across all sectors, in that order.
///
/// The divisor is `max(sectors.len(), 1)`, so no sectors yields zeros.
pub fn risk_mix(sectors: &[SectorSummary]) -> Vec<RiskMixPoint> {
    let count = sectors.len().max(1) as f64;

    RiskLevel::ALL
        .iter()
        .map(|&risk| {
            let total: f64 = sectors.iter().map(|s| risk.share_of(s)).sum();
            RiskMixPoint {
                risk,
                value: coerce_f64(total / count, DEFAULT_DECIMALS),
            }
        })
        .collect()
}

/// Priority against mean return, in sector order
pub fn priority_vs_return(sectors: &[SectorSummary]) -> Vec<PriorityVsReturnPoint> {
    sectors
        .iter()
        .map(|s| PriorityVsReturnPoint {
            name: s.sector.clone(),
            priority: s.sector_priority,
            return_pct: s.mean_return,
        })
        .collect()
}

/// Mean return per sector, in sector order
pub fn sector_volatility(sectors: &[SectorSummary]) -> Vec<VolatilityPoint> {
    sectors
        .iter()
        .map(|s| VolatilityPoint {
            name: s.sector.clone(),
            volatility: coerce_f64(s.mean_return, DEFAULT_DECIMALS),
        })
        .collect()
}

/// Distinct sector names in first-seen order
pub fn sector_options(sectors: &[SectorSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    sectors
        .iter()
        .filter(|s| seen.insert(s.sector.as_str()))
        .map(|s| s.sector.clone())
        .collect()
}

/// Option label that selects every sector
pub const ALL_SECTORS: &str = "All";

/// Sector selection for the issuer ranking.
///
/// Parsing is exact: only `"All"` (or an empty string) selects every
/// sector, so a sector literally named `"all"` stays selectable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SectorFilter {
    #[default]
    All,
    Sector(String),
}

impl SectorFilter {
    pub fn matches(&self, issuer: &IssuerScore) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::Sector(name) => issuer.sector == *name,
        }
    }
}

impl FromStr for SectorFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ALL_SECTORS {
            Ok(SectorFilter::All)
        } else {
            Ok(SectorFilter::Sector(s.to_string()))
        }
    }
}

impl From<Option<&str>> for SectorFilter {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => s.parse().unwrap_or_default(),
            None => SectorFilter::All,
        }
    }
}

impl fmt::Display for SectorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorFilter::All => f.pad(ALL_SECTORS),
            SectorFilter::Sector(name) => f.pad(name),
        }
    }
}

/// Highest-scoring [`TOP_ISSUERS`] issuers passing `filter`
pub fn top_issuers(issuers: &[IssuerScore], filter: &SectorFilter) -> Vec<IssuerScore> {
    top_issuers_n(issuers, filter, TOP_ISSUERS)
}

/// Highest-scoring `limit` issuers passing `filter`, descending by score
pub fn top_issuers_n(
    issuers: &[IssuerScore],
    filter: &SectorFilter,
    limit: usize,
) -> Vec<IssuerScore> {
    let mut list: Vec<IssuerScore> = issuers
        .iter()
        .filter(|issuer| filter.matches(issuer))
        .cloned()
        .collect();

    list.sort_by(|a, b| b.priority_score_0_100.total_cmp(&a.priority_score_0_100));
    list.truncate(limit);
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(name: &str, low: f64, moderate: f64, high: f64) -> SectorSummary {
        SectorSummary {
            sector: name.to_string(),
            sector_priority: 50.0,
            mean_return: 12.0,
            low_pct: low,
            moderate_pct: moderate,
            high_pct: high,
        }
    }

    fn issuer(name: &str, sector: &str, score: f64) -> IssuerScore {
        IssuerScore {
            issuer_name: name.to_string(),
            sector: sector.to_string(),
            issue_year: 2021.0,
            priority_score_0_100: score,
        }
    }

    fn values(mix: &[RiskMixPoint]) -> Vec<(RiskLevel, f64)> {
        mix.iter().map(|p| (p.risk, p.value)).collect()
    }

    #[test]
    fn test_risk_mix_no_sectors() {
        assert_eq!(
            values(&risk_mix(&[])),
            vec![
                (RiskLevel::Low, 0.0),
                (RiskLevel::Moderate, 0.0),
                (RiskLevel::High, 0.0)
            ]
        );
    }

    #[test]
    fn test_risk_mix_average() {
        let sectors = vec![
            sector("Tech", 60.0, 30.0, 10.0),
            sector("Health", 40.0, 40.0, 20.0),
        ];
        assert_eq!(
            values(&risk_mix(&sectors)),
            vec![
                (RiskLevel::Low, 50.0),
                (RiskLevel::Moderate, 35.0),
                (RiskLevel::High, 15.0)
            ]
        );
    }

    #[test]
    fn test_risk_mix_rounds_to_two_places() {
        let sectors = vec![
            sector("A", 10.0, 0.0, 0.0),
            sector("B", 20.0, 0.0, 0.0),
            sector("C", 20.0, 0.0, 0.0),
        ];
        assert_eq!(risk_mix(&sectors)[0].value, 16.67);
    }

    #[test]
    fn test_priority_vs_return_keeps_order() {
        let mut a = sector("Zeta", 0.0, 0.0, 0.0);
        a.sector_priority = 80.5;
        a.mean_return = -4.2;
        let b = sector("Alpha", 0.0, 0.0, 0.0);

        let series = priority_vs_return(&[a, b]);
        assert_eq!(series[0].name, "Zeta");
        assert_eq!(series[0].priority, 80.5);
        assert_eq!(series[0].return_pct, -4.2);
        assert_eq!(series[1].name, "Alpha");

        let value = serde_json::to_value(&series[0]).unwrap();
        assert!(value.get("returnPct").is_some());
    }

    #[test]
    fn test_sector_volatility() {
        let mut a = sector("Energy", 0.0, 0.0, 0.0);
        a.mean_return = 7.3;
        let series = sector_volatility(&[a]);
        assert_eq!(
            series,
            vec![VolatilityPoint {
                name: "Energy".to_string(),
                volatility: 7.3
            }]
        );
    }

    #[test]
    fn test_sector_options_dedup() {
        let sectors = vec![
            sector("Tech", 0.0, 0.0, 0.0),
            sector("Banking", 0.0, 0.0, 0.0),
            sector("Tech", 0.0, 0.0, 0.0),
        ];
        assert_eq!(sector_options(&sectors), vec!["Tech", "Banking"]);
    }

    #[test]
    fn test_top_issuers_by_sector() {
        let issuers = vec![
            issuer("A", "Tech", 90.0),
            issuer("B", "Tech", 95.0),
            issuer("C", "Health", 80.0),
        ];

        let ranked = top_issuers(&issuers, &SectorFilter::Sector("Tech".to_string()));
        let names: Vec<_> = ranked.iter().map(|i| i.issuer_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let all = top_issuers(&issuers, &SectorFilter::All);
        let names: Vec<_> = all.iter().map(|i| i.issuer_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_top_issuers_capped() {
        let issuers: Vec<_> = (0..37)
            .map(|i| issuer(&format!("I{i}"), "Tech", i as f64))
            .collect();

        let ranked = top_issuers(&issuers, &SectorFilter::All);
        assert_eq!(ranked.len(), TOP_ISSUERS);
        assert_eq!(ranked[0].priority_score_0_100, 36.0);
        assert_eq!(ranked[9].priority_score_0_100, 27.0);
    }

    #[test]
    fn test_top_issuers_unknown_sector() {
        let issuers = vec![issuer("A", "Tech", 90.0)];
        assert!(top_issuers(&issuers, &SectorFilter::Sector("Mining".into())).is_empty());
    }

    #[test]
    fn test_sector_filter_parse() {
        assert_eq!("All".parse::<SectorFilter>().unwrap(), SectorFilter::All);
        assert_eq!("".parse::<SectorFilter>().unwrap(), SectorFilter::All);
        assert_eq!(
            "all".parse::<SectorFilter>().unwrap(),
            SectorFilter::Sector("all".to_string())
        );
        assert_eq!(
            " Banking ".parse::<SectorFilter>().unwrap(),
            SectorFilter::Sector(" Banking ".to_string())
        );

        let issuers = vec![issuer("A", "all", 70.0), issuer("B", "Tech", 90.0)];
        let ranked = top_issuers(&issuers, &"all".parse().unwrap());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].issuer_name, "A");
        assert_eq!(SectorFilter::from(None), SectorFilter::All);
        assert_eq!(SectorFilter::from(Some("Tech")).to_string(), "Tech");
    }
}
