use crate::error::{AnalysisError, Result};
use crate::figures::FigureMapping;
use crate::thresholds::RatioThresholds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the categories playing each statement role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatementLayout {
    #[schemars(description = "Category holding the asset side of the balance sheet")]
    pub asset_category: String,

    #[schemars(description = "Category holding liabilities and equity")]
    pub liability_category: String,

    #[schemars(description = "Income statement category holding revenue (produits)")]
    pub revenue_category: String,

    #[schemars(description = "Income statement category holding expenses (charges)")]
    pub expense_category: String,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            asset_category: "Actif".to_string(),
            liability_category: "Capitaux propres et passifs".to_string(),
            revenue_category: "Produits".to_string(),
            expense_category: "Charges".to_string(),
        }
    }
}

impl StatementLayout {
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("asset_category", &self.asset_category),
            ("liability_category", &self.liability_category),
            ("revenue_category", &self.revenue_category),
            ("expense_category", &self.expense_category),
        ];

        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(AnalysisError::InvalidEntry {
                    field,
                    details: "category name must not be empty".to_string(),
                });
            }
        }

        if self.asset_category == self.liability_category {
            return Err(AnalysisError::InvalidEntry {
                field: "liability_category",
                details: format!(
                    "'{}' cannot be both the asset and liability side",
                    self.asset_category
                ),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub layout: StatementLayout,
    pub figures: FigureMapping,
    pub thresholds: RatioThresholds,
}

impl AnalyzerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.thresholds.validate()
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalyzerConfig)
    }
}
