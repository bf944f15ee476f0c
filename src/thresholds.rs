//! Interpretation bands for every ratio.
//!
//! These are the only place thresholds live: the ratio engine attaches the
//! label when it computes a value, and callers read the label back rather
//! than comparing raw numbers themselves.

use crate::error::{AnalysisError, Result};
use crate::ratios::RatioKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Interpretation {
    Excellent,
    Bon,
    Moyen,
    Faible,
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Bon => "Bon",
            Self::Moyen => "Moyen",
            Self::Faible => "Faible",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Tier applies when `value >= bound`.
    HigherIsBetter,
    /// Tier applies when `value <= bound`.
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tier {
    pub bound: f64,
    pub interpretation: Interpretation,
}

/// Ordered tiers, best first, with a label for values that meet none of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BandScale {
    pub direction: Direction,
    pub tiers: Vec<Tier>,
    pub fallback: Interpretation,
}

impl BandScale {
    pub fn higher_is_better(tiers: &[(f64, Interpretation)], fallback: Interpretation) -> Self {
        Self::new(Direction::HigherIsBetter, tiers, fallback)
    }

    pub fn lower_is_better(tiers: &[(f64, Interpretation)], fallback: Interpretation) -> Self {
        Self::new(Direction::LowerIsBetter, tiers, fallback)
    }

    fn new(direction: Direction, tiers: &[(f64, Interpretation)], fallback: Interpretation) -> Self {
        Self {
            direction,
            tiers: tiers
                .iter()
                .map(|&(bound, interpretation)| Tier {
                    bound,
                    interpretation,
                })
                .collect(),
            fallback,
        }
    }

    pub fn interpret(&self, value: f64) -> Interpretation {
        self.tiers
            .iter()
            .find(|tier| match self.direction {
                Direction::HigherIsBetter => value >= tier.bound,
                Direction::LowerIsBetter => value <= tier.bound,
            })
            .map(|tier| tier.interpretation)
            .unwrap_or(self.fallback)
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if let Some(tier) = self.tiers.iter().find(|t| !t.bound.is_finite()) {
            return Err(AnalysisError::InvalidThresholds(format!(
                "{}: bound {} is not finite",
                name, tier.bound
            )));
        }

        for pair in self.tiers.windows(2) {
            let ordered = match self.direction {
                Direction::HigherIsBetter => pair[0].bound > pair[1].bound,
                Direction::LowerIsBetter => pair[0].bound < pair[1].bound,
            };
            if !ordered {
                return Err(AnalysisError::InvalidThresholds(format!(
                    "{}: bounds {} and {} are out of order for {:?}",
                    name, pair[0].bound, pair[1].bound, self.direction
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RatioThresholds {
    pub current_ratio: BandScale,
    pub quick_ratio: BandScale,
    pub debt_ratio: BandScale,
    pub net_margin: BandScale,
    pub return_on_assets: BandScale,
    pub return_on_equity: BandScale,
    pub interest_coverage: BandScale,
    pub financial_leverage: BandScale,
    pub financial_autonomy: BandScale,
    pub solvency: BandScale,
}

impl Default for RatioThresholds {
    fn default() -> Self {
        use Interpretation::*;

        Self {
            current_ratio: BandScale::higher_is_better(&[(2.0, Bon), (1.0, Moyen)], Faible),
            quick_ratio: BandScale::higher_is_better(&[(1.0, Bon), (0.7, Moyen)], Faible),
            debt_ratio: BandScale::lower_is_better(&[(0.5, Bon)], Faible),
            net_margin: BandScale::higher_is_better(&[(10.0, Bon)], Faible),
            return_on_assets: BandScale::higher_is_better(
                &[(10.0, Excellent), (5.0, Bon), (2.0, Moyen)],
                Faible,
            ),
            return_on_equity: BandScale::higher_is_better(
                &[(20.0, Excellent), (15.0, Bon), (8.0, Moyen)],
                Faible,
            ),
            interest_coverage: BandScale::higher_is_better(
                &[(5.0, Excellent), (3.0, Bon), (1.5, Moyen)],
                Faible,
            ),
            financial_leverage: BandScale::lower_is_better(&[(1.0, Bon), (2.0, Moyen)], Faible),
            financial_autonomy: BandScale::higher_is_better(
                &[(0.5, Excellent), (0.3, Bon), (0.2, Moyen)],
                Faible,
            ),
            solvency: BandScale::higher_is_better(
                &[(2.0, Excellent), (1.5, Bon), (1.0, Moyen)],
                Faible,
            ),
        }
    }
}

impl RatioThresholds {
    pub fn scale(&self, kind: RatioKind) -> &BandScale {
        match kind {
            RatioKind::CurrentRatio => &self.current_ratio,
            RatioKind::QuickRatio => &self.quick_ratio,
            RatioKind::DebtRatio => &self.debt_ratio,
            RatioKind::NetMargin => &self.net_margin,
            RatioKind::ReturnOnAssets => &self.return_on_assets,
            RatioKind::ReturnOnEquity => &self.return_on_equity,
            RatioKind::InterestCoverage => &self.interest_coverage,
            RatioKind::FinancialLeverage => &self.financial_leverage,
            RatioKind::FinancialAutonomy => &self.financial_autonomy,
            RatioKind::Solvency => &self.solvency,
        }
    }

    pub fn interpret(&self, kind: RatioKind, value: f64) -> Interpretation {
        self.scale(kind).interpret(value)
    }

    pub fn validate(&self) -> Result<()> {
        for kind in RatioKind::ALL {
            self.scale(kind).validate(kind.label())?;
        }
        Ok(())
    }
}
