use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type CompanyId = u32;
pub type CategoryId = u32;
pub type SubCategoryId = u32;
pub type TypeId = u32;
pub type AccountId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Company {
    #[schemars(description = "Backend identifier of the company (société)")]
    pub id: CompanyId,

    #[serde(rename = "nom")]
    #[schemars(description = "Legal name of the company")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Category {
    #[serde(rename = "idCategorie")]
    pub id: CategoryId,

    #[serde(rename = "nom")]
    #[schemars(
        description = "Top-level statement grouping, e.g. 'Actif', 'Capitaux propres et passifs', 'Produits', 'Charges'"
    )]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct SubCategory {
    #[serde(rename = "idSousCategorie")]
    pub id: SubCategoryId,

    #[serde(rename = "nom")]
    pub name: String,

    #[serde(rename = "idCategorie")]
    #[schemars(description = "Parent category id")]
    pub category_id: CategoryId,
}

/// A "type de rubrique": the level at which line items are grouped and subtotalled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct RubriqueType {
    #[serde(rename = "idTypeRubrique")]
    pub id: TypeId,

    #[serde(rename = "nom")]
    pub name: String,

    #[serde(rename = "idSousCategorie")]
    #[schemars(description = "Parent sub-category id")]
    pub sub_category_id: SubCategoryId,
}

/// Chart-of-accounts entry ("rubrique") selectable under a rubrique type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ChartAccount {
    #[serde(rename = "idRubrique")]
    pub id: AccountId,

    #[serde(rename = "libelle")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Accounting plan code, e.g. '512' for bank accounts")]
    pub code: Option<String>,

    #[serde(rename = "idTypeRubrique")]
    pub type_id: TypeId,
}

/// Reference data as served by the backend, in backend order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Taxonomy {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(rename = "subCategories", alias = "sousCategories", default)]
    pub sub_categories: Vec<SubCategory>,

    #[serde(default)]
    pub types: Vec<RubriqueType>,

    #[serde(default)]
    pub accounts: Vec<ChartAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct LineItem {
    #[serde(rename = "idTypeRubrique")]
    pub type_id: TypeId,

    #[serde(rename = "libelle")]
    pub label: String,

    #[serde(rename = "montant")]
    #[schemars(description = "Non-negative amount recorded for this line")]
    pub amount: f64,

    #[serde(rename = "idRubrique", default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
}

impl LineItem {
    pub fn new(type_id: TypeId, label: impl Into<String>, amount: f64) -> Self {
        Self {
            type_id,
            label: label.into(),
            amount,
            account_id: None,
        }
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    Success,
    Warning,
    Info,
}

/// Free-text advice produced by the backend. Carried as-is; never derived from ratios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub level: RecommendationLevel,
    pub message: String,
}

/// Everything needed to analyse one company/year snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Fiscal year (exercice) of the line items")]
    pub year: Option<i32>,

    pub taxonomy: Taxonomy,

    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisInput {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisInput)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = AnalysisInput::schema_as_json().unwrap();
        assert!(schema_json.contains("taxonomy"));
        assert!(schema_json.contains("idTypeRubrique"));
        assert!(schema_json.contains("montant"));
    }

    #[test]
    fn test_backend_field_names() {
        let json = r#"{
            "categories": [{"idCategorie": 1, "nom": "Actif"}],
            "sousCategories": [{"idSousCategorie": 10, "nom": "Actif circulant", "idCategorie": 1}],
            "types": [{"idTypeRubrique": 100, "nom": "Trésorerie", "idSousCategorie": 10}],
            "accounts": [{"idRubrique": 1000, "libelle": "Banque", "code": "512", "idTypeRubrique": 100}]
        }"#;

        let taxonomy: Taxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(taxonomy.categories[0].name, "Actif");
        assert_eq!(taxonomy.sub_categories[0].category_id, 1);
        assert_eq!(taxonomy.types[0].sub_category_id, 10);
        assert_eq!(taxonomy.accounts[0].code.as_deref(), Some("512"));

        let item: LineItem =
            serde_json::from_str(r#"{"idTypeRubrique": 100, "libelle": "Caisse", "montant": 250.5}"#)
                .unwrap();
        assert_eq!(item, LineItem::new(100, "Caisse", 250.5));
    }

    #[test]
    fn test_recommendation_level_wire_format() {
        let rec = Recommendation {
            level: RecommendationLevel::Warning,
            message: "Ratio d'endettement légèrement élevé".to_string(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains(r#""type":"warning""#));
    }
}
