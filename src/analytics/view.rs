//! Regulator dashboard view model

use serde::Serialize;

use super::aggregate::{
    priority_vs_return, risk_mix, sector_options, sector_volatility, top_issuers,
    PriorityVsReturnPoint, RiskMixPoint, SectorFilter, VolatilityPoint,
};
use super::coerce::{coerce_f64, MISSING};
use super::records::{IssuerScore, SectorSummary};

/// One row of the IPO ranking table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedIssuer {
    /// 1-based position in the ranking
    pub rank: usize,
    pub issuer_name: String,
    pub sector: String,
    pub issue_year: f64,
    pub priority_score_0_100: f64,
}

impl RankedIssuer {
    fn new(rank: usize, issuer: IssuerScore) -> Self {
        Self {
            rank,
            issuer_name: issuer.issuer_name,
            sector: issuer.sector,
            issue_year: issuer.issue_year,
            priority_score_0_100: issuer.priority_score_0_100,
        }
    }

    /// Issue year for display; an unknown (zero) year shows as `-`
    pub fn year_label(&self) -> String {
        if self.issue_year == 0.0 {
            MISSING.to_string()
        } else {
            format!("{:.0}", self.issue_year)
        }
    }

    pub fn score_label(&self) -> String {
        format!("{:.1}", coerce_f64(self.priority_score_0_100, 1))
    }
}

/// Everything the regulator dashboard renders, derived from one load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulatorView {
    pub selected_sector: String,
    pub risk_mix: Vec<RiskMixPoint>,
    pub volatility: Vec<VolatilityPoint>,
    pub priority_vs_return: Vec<PriorityVsReturnPoint>,
    pub sector_options: Vec<String>,
    pub rankings: Vec<RankedIssuer>,
}

impl RegulatorView {
    pub fn build(
        sectors: &[SectorSummary],
        issuers: &[IssuerScore],
        filter: &SectorFilter,
    ) -> Self {
        let rankings = top_issuers(issuers, filter)
            .into_iter()
            .enumerate()
            .map(|(i, issuer)| RankedIssuer::new(i + 1, issuer))
            .collect();

        Self {
            selected_sector: filter.to_string(),
            risk_mix: risk_mix(sectors),
            volatility: sector_volatility(sectors),
            priority_vs_return: priority_vs_return(sectors),
            sector_options: sector_options(sectors),
            rankings,
        }
    }
}
