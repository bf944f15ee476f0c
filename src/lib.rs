//! # Financial Statement Analyzer
//!
//! A library for turning flat accounting line items into an aggregated balance
//! sheet and income statement, and for deriving standard financial ratios from
//! the result.
//!
//! ## Core Concepts
//!
//! - **Taxonomy**: Category → Sub-category → Rubrique type, plus the chart of accounts
//! - **Line Items**: Individual amounts recorded against a rubrique type
//! - **Aggregation**: Subtotals at every level, with zero-valued groups hidden from the tree
//! - **Balance Check**: Assets compared exactly against liabilities and equity; advisory only
//! - **Ratios**: Liquidity, leverage and profitability ratios interpreted against configurable bands
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_analyzer::*;
//!
//! let taxonomy = Taxonomy {
//!     categories: vec![Category { id: 1, name: "Actif".to_string() }],
//!     sub_categories: vec![SubCategory {
//!         id: 10,
//!         name: "Actif circulant".to_string(),
//!         category_id: 1,
//!     }],
//!     types: vec![RubriqueType {
//!         id: 100,
//!         name: "Trésorerie".to_string(),
//!         sub_category_id: 10,
//!     }],
//!     accounts: vec![],
//! };
//!
//! let items = vec![LineItem::new(100, "Banque", 12_500.0)];
//!
//! let analysis = analyze_statement(&taxonomy, &items).unwrap();
//! println!("{}", to_markdown(&analysis));
//! ```

pub mod aggregator;
pub mod analysis;
pub mod balancer;
pub mod config;
pub mod error;
pub mod figures;
pub mod ingestion;
pub mod ratios;
pub mod report;
pub mod schema;
pub mod source;
pub mod taxonomy;
pub mod thresholds;

#[cfg(test)]
mod test_support;

pub use aggregator::{aggregate, AggregateNode, NodeLevel, StatementTree};
pub use analysis::{FinancialAnalysis, StatementAnalyzer};
pub use balancer::{BalanceChecker, Imbalance};
pub use config::{AnalyzerConfig, StatementLayout};
pub use error::{AnalysisError, Result};
pub use figures::{BalanceFigures, Figure, FigureMapping, FigureRule, IncomeFigures};
pub use ingestion::*;
pub use ratios::{
    compute_ratio, compute_ratios, compute_ratios_default, RatioKind, RatioReport, RatioResult,
};
pub use report::{to_csv, to_markdown};
pub use schema::*;
pub use source::{FinancialDataSource, InMemorySource, StoredStatement};
pub use taxonomy::{Lineage, TaxonomyIndex};
pub use thresholds::{BandScale, Direction, Interpretation, RatioThresholds, Tier};

/// Analyzes line items with the default layout, figure mapping and thresholds.
pub fn analyze_statement(taxonomy: &Taxonomy, items: &[LineItem]) -> Result<FinancialAnalysis> {
    StatementAnalyzer::default().analyze(taxonomy, items)
}

/// Aggregates and balance-checks line items without computing ratios.
pub fn build_statement(
    taxonomy: &Taxonomy,
    items: &[LineItem],
    layout: &StatementLayout,
) -> Result<StatementTree> {
    let index = TaxonomyIndex::build(taxonomy)?;
    StatementTree::build(items, &index, layout)
}
