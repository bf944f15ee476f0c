//! Entry payloads: the multi-row statement submission and the single journal
//! entry, plus the step-by-step state used to build the latter.

use crate::balancer::Imbalance;
use crate::config::StatementLayout;
use crate::error::{AnalysisError, Result};
use crate::schema::{AccountId, CategoryId, CompanyId, LineItem, SubCategoryId, TypeId};
use crate::taxonomy::TaxonomyIndex;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionRow {
    #[serde(rename = "idRubrique")]
    pub account_id: AccountId,

    #[serde(rename = "montant")]
    pub amount: f64,

    #[serde(rename = "idTypeRubrique")]
    pub type_id: TypeId,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BalanceSection {
    #[serde(rename = "actifs", default)]
    pub assets: Vec<SubmissionRow>,

    #[serde(rename = "passifs", default)]
    pub liabilities: Vec<SubmissionRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultSection {
    #[serde(rename = "produits", default)]
    pub revenue: Vec<SubmissionRow>,

    #[serde(rename = "charges", default)]
    pub expenses: Vec<SubmissionRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Assets,
    Liabilities,
    Revenue,
    Expenses,
}

impl Section {
    pub fn category<'a>(&self, layout: &'a StatementLayout) -> &'a str {
        match self {
            Self::Assets => &layout.asset_category,
            Self::Liabilities => &layout.liability_category,
            Self::Revenue => &layout.revenue_category,
            Self::Expenses => &layout.expense_category,
        }
    }
}

/// A whole statement entered at once for one company and fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BilanSubmission {
    #[serde(rename = "annee")]
    pub year: i32,

    #[serde(rename = "societe")]
    pub company_id: CompanyId,

    #[serde(rename = "bilan", default)]
    pub balance_sheet: BalanceSection,

    #[serde(rename = "resultat", default)]
    pub income_statement: ResultSection,
}

impl BilanSubmission {
    pub fn sections(&self) -> [(Section, &[SubmissionRow]); 4] {
        [
            (Section::Assets, self.balance_sheet.assets.as_slice()),
            (Section::Liabilities, self.balance_sheet.liabilities.as_slice()),
            (Section::Revenue, self.income_statement.revenue.as_slice()),
            (Section::Expenses, self.income_statement.expenses.as_slice()),
        ]
    }

    /// Rejects a missing company, negative or non-finite amounts, and balance
    /// sheets whose two sides differ.
    pub fn validate(&self) -> Result<()> {
        if self.company_id == 0 {
            return Err(AnalysisError::InvalidEntry {
                field: "societe",
                details: "a company must be selected".to_string(),
            });
        }

        for (_, rows) in self.sections() {
            for row in rows {
                check_amount(&row_label(row), row.amount)?;
            }
        }

        let assets: f64 = self.balance_sheet.assets.iter().map(|r| r.amount).sum();
        let liabilities: f64 = self.balance_sheet.liabilities.iter().map(|r| r.amount).sum();
        if Imbalance::between(assets, liabilities).detected {
            return Err(AnalysisError::UnbalancedSubmission {
                assets,
                liabilities,
            });
        }

        Ok(())
    }

    /// Checks each row sits under the category its section stands for and that
    /// its chart account belongs to its type.
    pub fn check_sections(&self, index: &TaxonomyIndex, layout: &StatementLayout) -> Result<()> {
        for (section, rows) in self.sections() {
            let expected = section.category(layout);
            for row in rows {
                let lineage = index.lineage(row.type_id)?;
                if lineage.category.name != expected {
                    return Err(AnalysisError::InvalidEntry {
                        field: "idTypeRubrique",
                        details: format!(
                            "type '{}' belongs to '{}', not '{}'",
                            lineage.rubrique_type.name, lineage.category.name, expected
                        ),
                    });
                }

                let account = index.account(row.account_id)?;
                if account.type_id != row.type_id {
                    return Err(AnalysisError::InvalidEntry {
                        field: "idRubrique",
                        details: format!(
                            "account '{}' is not filed under type '{}'",
                            account.label, lineage.rubrique_type.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn into_line_items(self) -> Vec<LineItem> {
        let BilanSubmission {
            balance_sheet,
            income_statement,
            ..
        } = self;

        balance_sheet
            .assets
            .into_iter()
            .chain(balance_sheet.liabilities)
            .chain(income_statement.revenue)
            .chain(income_statement.expenses)
            .map(|row| {
                LineItem::new(row.type_id, row_label(&row), row.amount)
                    .with_account(row.account_id)
            })
            .collect()
    }
}

fn row_label(row: &SubmissionRow) -> String {
    let description = row.description.trim();
    if description.is_empty() {
        format!("Rubrique {}", row.account_id)
    } else {
        description.to_string()
    }
}

fn check_amount(label: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(AnalysisError::InvalidEntry {
            field: "montant",
            details: format!("'{}' has non-finite amount {}", label, amount),
        });
    }
    if amount < 0.0 {
        return Err(AnalysisError::NegativeAmount {
            label: label.to_string(),
            amount,
        });
    }
    Ok(())
}

/// A single accounting entry filed under company → category → sub-category →
/// type ("poste") → chart account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JournalEntry {
    #[serde(rename = "idSociety")]
    pub company_id: CompanyId,

    #[serde(rename = "idCategory")]
    pub category_id: CategoryId,

    #[serde(rename = "idSubCategory")]
    pub sub_category_id: SubCategoryId,

    #[serde(rename = "idPost")]
    pub type_id: TypeId,

    #[serde(rename = "idRubrique")]
    pub account_id: AccountId,

    #[serde(rename = "montant")]
    pub amount: f64,

    pub description: String,

    #[schemars(description = "Entry date in YYYY-MM-DD format")]
    pub date: String,
}

impl JournalEntry {
    pub fn validate(&self, index: &TaxonomyIndex) -> Result<()> {
        for step in WizardStep::ALL {
            self.validate_step(step, index)?;
        }
        Ok(())
    }

    pub fn validate_step(&self, step: WizardStep, index: &TaxonomyIndex) -> Result<()> {
        match step {
            WizardStep::Company => {
                if self.company_id == 0 {
                    return Err(AnalysisError::InvalidEntry {
                        field: "idSociety",
                        details: "a company must be selected".to_string(),
                    });
                }
            }
            WizardStep::Category => {
                let category = index.category(self.category_id)?;
                let sub = index.sub_category(self.sub_category_id)?;
                if sub.category_id != category.id {
                    return Err(AnalysisError::InvalidEntry {
                        field: "idSubCategory",
                        details: format!("'{}' is not under '{}'", sub.name, category.name),
                    });
                }
            }
            WizardStep::Post => {
                let post = index.rubrique_type(self.type_id)?;
                if post.sub_category_id != self.sub_category_id {
                    return Err(AnalysisError::InvalidEntry {
                        field: "idPost",
                        details: format!(
                            "'{}' is not under sub-category {}",
                            post.name, self.sub_category_id
                        ),
                    });
                }
                let account = index.account(self.account_id)?;
                if account.type_id != post.id {
                    return Err(AnalysisError::InvalidEntry {
                        field: "idRubrique",
                        details: format!("'{}' is not under '{}'", account.label, post.name),
                    });
                }
            }
            WizardStep::Details => {
                check_amount(&self.description, self.amount)?;
                if self.description.trim().is_empty() {
                    return Err(AnalysisError::InvalidEntry {
                        field: "description",
                        details: "description is required".to_string(),
                    });
                }
                self.parsed_date()?;
            }
        }
        Ok(())
    }

    pub fn parsed_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            AnalysisError::InvalidEntry {
                field: "date",
                details: format!("Invalid date '{}'. Expected YYYY-MM-DD", self.date),
            }
        })
    }

    pub fn to_line_item(&self) -> LineItem {
        LineItem::new(self.type_id, self.description.trim(), self.amount)
            .with_account(self.account_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Company,
    Category,
    Post,
    Details,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Company,
        WizardStep::Category,
        WizardStep::Post,
        WizardStep::Details,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Company => "Société",
            Self::Category => "Catégorie",
            Self::Post => "Poste",
            Self::Details => "Détails",
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Self::Company => 0,
            Self::Category => 1,
            Self::Post => 2,
            Self::Details => 3,
        }
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.position() + 1).copied()
    }

    fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).map(|p| Self::ALL[p])
    }
}

/// Journal entry being filled in step by step. Each transition consumes the
/// current state and returns the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryWizard {
    step: WizardStep,
    draft: JournalEntry,
}

impl Default for EntryWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Company,
            draft: JournalEntry::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &JournalEntry {
        &self.draft
    }

    /// Completion percentage shown alongside the step title.
    pub fn progress(&self) -> f64 {
        (self.step.position() + 1) as f64 / WizardStep::ALL.len() as f64 * 100.0
    }

    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.draft.company_id = company_id;
        self
    }

    /// Changing the category clears the post and account picked below it.
    pub fn with_category(
        mut self,
        category_id: CategoryId,
        sub_category_id: SubCategoryId,
    ) -> Self {
        if self.draft.category_id != category_id || self.draft.sub_category_id != sub_category_id {
            self.draft.type_id = 0;
            self.draft.account_id = 0;
        }
        self.draft.category_id = category_id;
        self.draft.sub_category_id = sub_category_id;
        self
    }

    pub fn with_post(mut self, type_id: TypeId, account_id: AccountId) -> Self {
        self.draft.type_id = type_id;
        self.draft.account_id = account_id;
        self
    }

    pub fn with_details(mut self, amount: f64, description: &str, date: &str) -> Self {
        self.draft.amount = amount;
        self.draft.description = description.to_string();
        self.draft.date = date.to_string();
        self
    }

    /// Validates the current step's fields and moves to the next step.
    pub fn advance(self, index: &TaxonomyIndex) -> Result<Self> {
        self.draft.validate_step(self.step, index)?;
        let next = self.step.next().ok_or_else(|| AnalysisError::InvalidEntry {
            field: "step",
            details: "already on the last step, call finish".to_string(),
        })?;
        Ok(Self { step: next, ..self })
    }

    pub fn back(self) -> Self {
        let step = self.step.previous().unwrap_or(self.step);
        Self { step, ..self }
    }

    pub fn finish(self, index: &TaxonomyIndex) -> Result<JournalEntry> {
        if self.step != WizardStep::Details {
            return Err(AnalysisError::InvalidEntry {
                field: "step",
                details: format!("cannot finish from step '{}'", self.step.title()),
            });
        }
        self.draft.validate(index)?;
        Ok(self.draft)
    }
}
