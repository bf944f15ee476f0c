use crate::figures::{BalanceFigures, IncomeFigures};
use crate::thresholds::{Interpretation, RatioThresholds};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    CurrentRatio,
    QuickRatio,
    DebtRatio,
    NetMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    InterestCoverage,
    FinancialLeverage,
    FinancialAutonomy,
    Solvency,
}

impl RatioKind {
    pub const ALL: [RatioKind; 10] = [
        RatioKind::CurrentRatio,
        RatioKind::QuickRatio,
        RatioKind::DebtRatio,
        RatioKind::NetMargin,
        RatioKind::ReturnOnAssets,
        RatioKind::ReturnOnEquity,
        RatioKind::InterestCoverage,
        RatioKind::FinancialLeverage,
        RatioKind::FinancialAutonomy,
        RatioKind::Solvency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "Liquidité générale",
            Self::QuickRatio => "Liquidité réduite",
            Self::DebtRatio => "Ratio d'endettement",
            Self::NetMargin => "Marge nette",
            Self::ReturnOnAssets => "ROA",
            Self::ReturnOnEquity => "ROE",
            Self::InterestCoverage => "Couverture des intérêts",
            Self::FinancialLeverage => "Levier financier",
            Self::FinancialAutonomy => "Autonomie financière",
            Self::Solvency => "Solvabilité",
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Self::NetMargin | Self::ReturnOnAssets | Self::ReturnOnEquity
        )
    }

    /// (numerator, denominator) before any percentage scaling.
    fn operands(&self, balance: &BalanceFigures, income: &IncomeFigures) -> (f64, f64) {
        match self {
            Self::CurrentRatio => (balance.current_assets(), balance.current_liabilities()),
            Self::QuickRatio => (balance.quick_assets(), balance.current_liabilities()),
            Self::DebtRatio => (balance.total_debt(), balance.total_assets()),
            Self::NetMargin => (income.net_result(), income.revenue),
            Self::ReturnOnAssets => (income.net_result(), balance.total_assets()),
            Self::ReturnOnEquity => (income.net_result(), balance.equity),
            Self::InterestCoverage => (income.operating_result(), income.interest_expense),
            Self::FinancialLeverage => (balance.total_debt(), balance.equity),
            Self::FinancialAutonomy => (balance.equity, balance.total_liabilities_and_equity()),
            Self::Solvency => (balance.total_assets(), balance.total_debt()),
        }
    }
}

/// One computed ratio. `value` is `None` when the denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatioResult {
    pub kind: RatioKind,
    pub name: String,
    pub value: Option<f64>,
    pub is_percentage: bool,
    pub interpretation: Option<Interpretation>,
}

impl RatioResult {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// Two decimals, `" %"` for percentages, `"N/A"` when undefined.
    pub fn display_value(&self) -> String {
        match self.value {
            Some(value) if self.is_percentage => format!("{:.2} %", value),
            Some(value) => format!("{:.2}", value),
            None => "N/A".to_string(),
        }
    }

    pub fn display_interpretation(&self) -> String {
        self.interpretation
            .map(|i| i.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatioReport {
    pub results: Vec<RatioResult>,
}

impl RatioReport {
    pub fn get(&self, kind: RatioKind) -> Option<&RatioResult> {
        self.results.iter().find(|r| r.kind == kind)
    }

    pub fn by_name(&self, name: &str) -> Option<&RatioResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RatioResult> {
        self.results.iter()
    }

    pub fn defined_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_defined()).count()
    }
}

/// Computes every ratio in [`RatioKind::ALL`] order.
pub fn compute_ratios(
    balance: &BalanceFigures,
    income: &IncomeFigures,
    thresholds: &RatioThresholds,
) -> RatioReport {
    let results = RatioKind::ALL
        .iter()
        .map(|&kind| compute_ratio(kind, balance, income, thresholds))
        .collect::<Vec<_>>();

    let report = RatioReport { results };
    debug!(
        "Computed {} ratios ({} defined)",
        report.results.len(),
        report.defined_count()
    );
    report
}

pub fn compute_ratios_default(balance: &BalanceFigures, income: &IncomeFigures) -> RatioReport {
    compute_ratios(balance, income, &RatioThresholds::default())
}

pub fn compute_ratio(
    kind: RatioKind,
    balance: &BalanceFigures,
    income: &IncomeFigures,
    thresholds: &RatioThresholds,
) -> RatioResult {
    let (numerator, denominator) = kind.operands(balance, income);
    let scale = if kind.is_percentage() { 100.0 } else { 1.0 };

    let value = safe_divide(numerator, denominator).map(|ratio| ratio * scale);
    if value.is_none() {
        warn!(
            "{} is undefined ({} / {})",
            kind.label(),
            numerator,
            denominator
        );
    }

    RatioResult {
        kind,
        name: kind.label().to_string(),
        value,
        is_percentage: kind.is_percentage(),
        interpretation: value.map(|v| thresholds.interpret(kind, v)),
    }
}

fn safe_divide(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_balance() -> BalanceFigures {
        BalanceFigures {
            cash: 100_000.0,
            receivables: 50_000.0,
            inventory: 75_000.0,
            fixed_assets: 300_000.0,
            payables: 45_000.0,
            short_term_debt: 30_000.0,
            long_term_debt: 200_000.0,
            equity: 250_000.0,
        }
    }

    fn scenario_income() -> IncomeFigures {
        IncomeFigures {
            revenue: 500_000.0,
            expenses: 450_000.0,
            interest_expense: 10_000.0,
        }
    }

    #[test]
    fn test_current_ratio_scenario() {
        let report = compute_ratios_default(&scenario_balance(), &scenario_income());
        let current = report.get(RatioKind::CurrentRatio).unwrap();

        assert!((current.value.unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(current.display_value(), "3.00");
        assert_eq!(current.interpretation, Some(Interpretation::Bon));
        assert!(!current.is_percentage);
    }

    #[test]
    fn test_net_margin_at_threshold() {
        let report = compute_ratios_default(&scenario_balance(), &scenario_income());
        let margin = report.get(RatioKind::NetMargin).unwrap();

        assert!((margin.value.unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(margin.display_value(), "10.00 %");
        assert_eq!(margin.interpretation, Some(Interpretation::Bon));
        assert!(margin.is_percentage);
    }

    #[test]
    fn test_net_margin_just_below_threshold() {
        let income = IncomeFigures {
            revenue: 500_000.0,
            expenses: 450_001.0,
            interest_expense: 0.0,
        };
        let margin = compute_ratio(
            RatioKind::NetMargin,
            &scenario_balance(),
            &income,
            &RatioThresholds::default(),
        );
        assert!(margin.value.unwrap() < 10.0);
        assert_eq!(margin.interpretation, Some(Interpretation::Faible));
    }

    #[test]
    fn test_zero_current_liabilities_is_undefined() {
        let balance = BalanceFigures {
            payables: 0.0,
            short_term_debt: 0.0,
            ..scenario_balance()
        };
        let report = compute_ratios_default(&balance, &scenario_income());

        for kind in [RatioKind::CurrentRatio, RatioKind::QuickRatio] {
            let ratio = report.get(kind).unwrap();
            assert_eq!(ratio.value, None);
            assert_eq!(ratio.interpretation, None);
            assert_eq!(ratio.display_value(), "N/A");
            assert_eq!(ratio.display_interpretation(), "N/A");
        }
    }

    #[test]
    fn test_undefined_differs_from_zero() {
        let income = IncomeFigures {
            revenue: 100.0,
            expenses: 100.0,
            interest_expense: 0.0,
        };
        let report = compute_ratios_default(&scenario_balance(), &income);

        let margin = report.get(RatioKind::NetMargin).unwrap();
        assert_eq!(margin.value, Some(0.0));
        assert_eq!(margin.interpretation, Some(Interpretation::Faible));

        let coverage = report.get(RatioKind::InterestCoverage).unwrap();
        assert_eq!(coverage.value, None);
    }

    #[test]
    fn test_all_ratios_for_scenario() {
        let report = compute_ratios_default(&scenario_balance(), &scenario_income());
        assert_eq!(report.results.len(), 10);
        assert_eq!(report.defined_count(), 10);

        let expect = |kind: RatioKind, value: f64, label: Interpretation| {
            let ratio = report.get(kind).unwrap();
            assert!(
                (ratio.value.unwrap() - value).abs() < 1e-9,
                "{:?}: expected {}, got {:?}",
                kind,
                value,
                ratio.value
            );
            assert_eq!(ratio.interpretation, Some(label), "{:?}", kind);
        };

        expect(RatioKind::QuickRatio, 2.0, Interpretation::Bon);
        expect(RatioKind::DebtRatio, 275_000.0 / 525_000.0, Interpretation::Faible);
        expect(RatioKind::ReturnOnAssets, 50_000.0 / 525_000.0 * 100.0, Interpretation::Bon);
        expect(RatioKind::ReturnOnEquity, 20.0, Interpretation::Excellent);
        expect(RatioKind::InterestCoverage, 6.0, Interpretation::Excellent);
        expect(RatioKind::FinancialLeverage, 1.1, Interpretation::Moyen);
        expect(
            RatioKind::FinancialAutonomy,
            250_000.0 / 525_000.0,
            Interpretation::Bon,
        );
        expect(RatioKind::Solvency, 525_000.0 / 275_000.0, Interpretation::Bon);
    }

    #[test]
    fn test_values_are_not_rounded() {
        let report = compute_ratios_default(&scenario_balance(), &scenario_income());
        let roa = report.get(RatioKind::ReturnOnAssets).unwrap();
        assert_eq!(roa.display_value(), "9.52 %");
        assert_ne!(roa.value.unwrap(), 9.52);
    }

    #[test]
    fn test_loss_gives_negative_margin() {
        let income = IncomeFigures {
            revenue: 100_000.0,
            expenses: 120_000.0,
            interest_expense: 0.0,
        };
        let margin = compute_ratio(
            RatioKind::NetMargin,
            &scenario_balance(),
            &income,
            &RatioThresholds::default(),
        );
        assert!((margin.value.unwrap() + 20.0).abs() < 1e-12);
        assert_eq!(margin.interpretation, Some(Interpretation::Faible));
    }

    #[test]
    fn test_lookup_by_name() {
        let report = compute_ratios_default(&scenario_balance(), &scenario_income());
        assert_eq!(
            report.by_name("Ratio d'endettement").map(|r| r.kind),
            Some(RatioKind::DebtRatio)
        );
        assert!(report.by_name("Unknown").is_none());
    }

    #[test]
    fn test_custom_thresholds_drive_labels() {
        let mut thresholds = RatioThresholds::default();
        thresholds.current_ratio = crate::thresholds::BandScale::higher_is_better(
            &[(4.0, Interpretation::Excellent), (3.5, Interpretation::Bon)],
            Interpretation::Moyen,
        );
        let ratio = compute_ratio(
            RatioKind::CurrentRatio,
            &scenario_balance(),
            &scenario_income(),
            &thresholds,
        );
        assert_eq!(ratio.interpretation, Some(Interpretation::Moyen));
    }
}
