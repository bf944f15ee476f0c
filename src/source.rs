use crate::error::{AnalysisError, Result};
use crate::schema::{Company, CompanyId, LineItem, Recommendation, Taxonomy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference data and line items held by the backend.
pub trait FinancialDataSource {
    fn companies(&self) -> Result<Vec<Company>>;

    /// Fiscal years with recorded data, ascending.
    fn years(&self, company: CompanyId) -> Result<Vec<i32>>;

    fn taxonomy(&self) -> Result<Taxonomy>;

    fn line_items(&self, company: CompanyId, year: i32) -> Result<Vec<LineItem>>;

    /// Free-text advice served alongside the statement, if any.
    fn recommendations(&self, _company: CompanyId, _year: i32) -> Result<Vec<Recommendation>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StoredStatement {
    #[serde(rename = "societe")]
    pub company_id: CompanyId,

    #[serde(rename = "annee")]
    pub year: i32,

    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InMemorySource {
    #[serde(default)]
    pub companies: Vec<Company>,

    #[serde(default)]
    pub taxonomy: Taxonomy,

    #[serde(default)]
    pub statements: Vec<StoredStatement>,
}

impl InMemorySource {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_company(mut self, id: CompanyId, name: &str) -> Self {
        self.companies.push(Company {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_statement(mut self, company_id: CompanyId, year: i32, items: Vec<LineItem>) -> Self {
        self.statements.push(StoredStatement {
            company_id,
            year,
            items,
            recommendations: Vec::new(),
        });
        self
    }

    /// Attaches advice to an already added statement; ignored when there is none.
    pub fn with_recommendations(
        mut self,
        company_id: CompanyId,
        year: i32,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        if let Some(statement) = self
            .statements
            .iter_mut()
            .find(|s| s.company_id == company_id && s.year == year)
        {
            statement.recommendations = recommendations;
        }
        self
    }

    pub fn company(&self, id: CompanyId) -> Result<&Company> {
        self.companies
            .iter()
            .find(|c| c.id == id)
            .ok_or(AnalysisError::UnknownCompany(id))
    }

    fn statement(&self, company: CompanyId, year: i32) -> Result<&StoredStatement> {
        self.company(company)?;
        self.statements
            .iter()
            .find(|s| s.company_id == company && s.year == year)
            .ok_or(AnalysisError::NoDataForYear { company, year })
    }
}

impl FinancialDataSource for InMemorySource {
    fn companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.clone())
    }

    fn years(&self, company: CompanyId) -> Result<Vec<i32>> {
        self.company(company)?;
        let mut years: Vec<i32> = self
            .statements
            .iter()
            .filter(|s| s.company_id == company)
            .map(|s| s.year)
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }

    fn taxonomy(&self) -> Result<Taxonomy> {
        Ok(self.taxonomy.clone())
    }

    fn line_items(&self, company: CompanyId, year: i32) -> Result<Vec<LineItem>> {
        Ok(self.statement(company, year)?.items.clone())
    }

    fn recommendations(&self, company: CompanyId, year: i32) -> Result<Vec<Recommendation>> {
        Ok(self.statement(company, year)?.recommendations.clone())
    }
}
