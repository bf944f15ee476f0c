use crate::aggregator::AggregateNode;
use crate::config::StatementLayout;
use log::warn;
use serde::{Deserialize, Serialize};

/// Advisory result of comparing the asset side with the liabilities+equity side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Imbalance {
    pub detected: bool,
    /// Absolute difference between the two sides; 0 when balanced.
    pub amount: f64,
    pub assets: f64,
    pub liabilities: f64,
}

impl Imbalance {
    /// Exact comparison, no tolerance.
    pub fn between(assets: f64, liabilities: f64) -> Self {
        let detected = assets != liabilities;
        Self {
            detected,
            amount: if detected {
                (assets - liabilities).abs()
            } else {
                0.0
            },
            assets,
            liabilities,
        }
    }
}

pub struct BalanceChecker<'a> {
    layout: &'a StatementLayout,
}

impl<'a> BalanceChecker<'a> {
    pub fn new(layout: &'a StatementLayout) -> Self {
        Self { layout }
    }

    pub fn check(&self, roots: &[AggregateNode]) -> Imbalance {
        let assets = self.side_total(roots, &self.layout.asset_category);
        let liabilities = self.side_total(roots, &self.layout.liability_category);

        let imbalance = Imbalance::between(assets, liabilities);
        if imbalance.detected {
            warn!(
                "Balance sheet imbalance detected: {} ({}) vs {} ({}), difference {}",
                self.layout.asset_category,
                assets,
                self.layout.liability_category,
                liabilities,
                imbalance.amount
            );
        }
        imbalance
    }

    fn side_total(&self, roots: &[AggregateNode], name: &str) -> f64 {
        match roots.iter().find(|root| root.name == name) {
            Some(root) => root.value,
            None => {
                warn!("Balance sheet side '{}' not found, counting it as 0", name);
                0.0
            }
        }
    }
}
