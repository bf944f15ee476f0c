use crate::aggregator::StatementTree;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::figures::{BalanceFigures, IncomeFigures};
use crate::ratios::{compute_ratios, RatioReport};
use crate::schema::{AnalysisInput, Company, CompanyId, LineItem, Recommendation, Taxonomy};
use crate::source::FinancialDataSource;
use crate::taxonomy::TaxonomyIndex;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything computed for one company/year snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    pub statement: StatementTree,
    pub balance_figures: BalanceFigures,
    pub income_figures: IncomeFigures,
    pub ratios: RatioReport,

    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl FinancialAnalysis {
    pub fn is_balanced(&self) -> bool {
        !self.statement.imbalance.detected
    }
}

pub struct StatementAnalyzer {
    config: AnalyzerConfig,
}

impl Default for StatementAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl StatementAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Aggregates the items, checks the balance and computes every ratio.
    pub fn analyze(&self, taxonomy: &Taxonomy, items: &[LineItem]) -> Result<FinancialAnalysis> {
        self.config.validate()?;

        let index = TaxonomyIndex::build(taxonomy)?;
        debug!(
            "Taxonomy indexed: {} categories, {} sub-categories, {} types, {} accounts",
            taxonomy.categories.len(),
            taxonomy.sub_categories.len(),
            taxonomy.types.len(),
            taxonomy.accounts.len()
        );

        let statement = StatementTree::build(items, &index, &self.config.layout)?;
        let (balance_figures, income_figures) =
            self.config.figures.extract(&statement, &self.config.layout);
        debug!("Balance figures: {:?}", balance_figures);
        debug!("Income figures: {:?}", income_figures);

        let ratios = compute_ratios(&balance_figures, &income_figures, &self.config.thresholds);

        Ok(FinancialAnalysis {
            company: None,
            year: None,
            statement,
            balance_figures,
            income_figures,
            ratios,
            recommendations: Vec::new(),
        })
    }

    pub fn analyze_input(&self, input: &AnalysisInput) -> Result<FinancialAnalysis> {
        info!(
            "Analyzing {} line items{}",
            input.items.len(),
            describe(input.company.as_ref(), input.year)
        );

        let mut analysis = self.analyze(&input.taxonomy, &input.items)?;
        analysis.company = input.company.clone();
        analysis.year = input.year;
        analysis.recommendations = input.recommendations.clone();
        Ok(analysis)
    }

    /// Fetches one company/year from `source` and analyzes it.
    pub fn analyze_from_source(
        &self,
        source: &dyn FinancialDataSource,
        company: CompanyId,
        year: i32,
    ) -> Result<FinancialAnalysis> {
        let companies = source.companies()?;
        let company = companies
            .into_iter()
            .find(|c| c.id == company)
            .ok_or(AnalysisError::UnknownCompany(company))?;

        let input = AnalysisInput {
            taxonomy: source.taxonomy()?,
            items: source.line_items(company.id, year)?,
            recommendations: source.recommendations(company.id, year)?,
            company: Some(company),
            year: Some(year),
        };

        self.analyze_input(&input)
    }
}

fn describe(company: Option<&Company>, year: Option<i32>) -> String {
    match (company, year) {
        (Some(company), Some(year)) => format!(" for {} ({})", company.name, year),
        (Some(company), None) => format!(" for {}", company.name),
        (None, Some(year)) => format!(" for {}", year),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioKind;
    use crate::schema::RecommendationLevel;
    use crate::source::InMemorySource;
    use crate::test_support::{sample_items, sample_taxonomy};
    use crate::thresholds::{BandScale, Interpretation};

    #[test]
    fn test_analyze_balanced_sample() {
        let analysis = StatementAnalyzer::default()
            .analyze(&sample_taxonomy(), &sample_items())
            .unwrap();

        assert!(analysis.is_balanced());
        assert_eq!(analysis.statement.category_total("Actif"), Some(525_000.0));
        assert_eq!(analysis.ratios.results.len(), RatioKind::ALL.len());

        let current = analysis.ratios.get(RatioKind::CurrentRatio).unwrap();
        assert_eq!(current.display_value(), "3.00");
        assert_eq!(current.interpretation, Some(Interpretation::Bon));
    }

    #[test]
    fn test_analyze_is_repeatable() {
        let analyzer = StatementAnalyzer::default();
        let first = analyzer.analyze(&sample_taxonomy(), &sample_items()).unwrap();
        let second = analyzer.analyze(&sample_taxonomy(), &sample_items()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_thresholds_flow_through() {
        let mut config = AnalyzerConfig::default();
        config.thresholds.current_ratio = BandScale::higher_is_better(
            &[(5.0, Interpretation::Excellent)],
            Interpretation::Moyen,
        );

        let analysis = StatementAnalyzer::new(config)
            .analyze(&sample_taxonomy(), &sample_items())
            .unwrap();
        let current = analysis.ratios.get(RatioKind::CurrentRatio).unwrap();
        assert_eq!(current.interpretation, Some(Interpretation::Moyen));
    }

    #[test]
    fn test_unknown_type_aborts_analysis() {
        let mut items = sample_items();
        items.push(LineItem::new(999, "Orphelin", 1.0));
        let err = StatementAnalyzer::default()
            .analyze(&sample_taxonomy(), &items)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownType { type_id: 999 }));
    }

    #[test]
    fn test_analyze_from_source_carries_context() {
        let source = InMemorySource::new(sample_taxonomy())
            .with_company(7, "ACME SARL")
            .with_statement(7, 2024, sample_items())
            .with_recommendations(
                7,
                2024,
                vec![Recommendation {
                    level: RecommendationLevel::Success,
                    message: "Structure financière saine".to_string(),
                }],
            );

        let analysis = StatementAnalyzer::default()
            .analyze_from_source(&source, 7, 2024)
            .unwrap();

        assert_eq!(analysis.company.as_ref().map(|c| c.name.as_str()), Some("ACME SARL"));
        assert_eq!(analysis.year, Some(2024));
        assert_eq!(analysis.recommendations.len(), 1);
    }

    #[test]
    fn test_analyze_from_source_missing_year() {
        let source = InMemorySource::new(sample_taxonomy()).with_company(7, "ACME SARL");
        let err = StatementAnalyzer::default()
            .analyze_from_source(&source, 7, 2019)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NoDataForYear {
                company: 7,
                year: 2019
            }
        ));
    }
}
