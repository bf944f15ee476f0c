use crate::aggregator::{AggregateNode, StatementTree};
use crate::config::StatementLayout;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Balance sheet amounts the ratio engine works from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceFigures {
    pub cash: f64,
    pub receivables: f64,
    pub inventory: f64,
    pub fixed_assets: f64,
    pub payables: f64,
    pub short_term_debt: f64,
    pub long_term_debt: f64,
    pub equity: f64,
}

impl BalanceFigures {
    pub fn current_assets(&self) -> f64 {
        self.cash + self.receivables + self.inventory
    }

    /// Current assets without inventory.
    pub fn quick_assets(&self) -> f64 {
        self.cash + self.receivables
    }

    pub fn current_liabilities(&self) -> f64 {
        self.payables + self.short_term_debt
    }

    pub fn total_debt(&self) -> f64 {
        self.payables + self.short_term_debt + self.long_term_debt
    }

    pub fn total_assets(&self) -> f64 {
        self.current_assets() + self.fixed_assets
    }

    pub fn total_liabilities_and_equity(&self) -> f64 {
        self.total_debt() + self.equity
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeFigures {
    pub revenue: f64,
    /// All expenses, interest included.
    pub expenses: f64,
    pub interest_expense: f64,
}

impl IncomeFigures {
    /// Revenue minus expenses; negative for a loss.
    pub fn net_result(&self) -> f64 {
        self.revenue - self.expenses
    }

    /// Net result before interest.
    pub fn operating_result(&self) -> f64 {
        self.net_result() + self.interest_expense
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Figure {
    Cash,
    Receivables,
    Inventory,
    FixedAssets,
    Payables,
    ShortTermDebt,
    LongTermDebt,
    Equity,
    InterestExpense,
}

/// Node names (sub-category or rubrique type) that feed one figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FigureRule {
    pub figure: Figure,
    pub names: Vec<String>,
}

impl FigureRule {
    pub fn new(figure: Figure, names: &[&str]) -> Self {
        Self {
            figure,
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn matches(&self, node_name: &str) -> bool {
        let wanted = normalize(node_name);
        self.names.iter().any(|name| normalize(name) == wanted)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FigureMapping {
    pub rules: Vec<FigureRule>,
}

impl Default for FigureMapping {
    fn default() -> Self {
        Self {
            rules: vec![
                FigureRule::new(Figure::Cash, &["Trésorerie", "Disponibilités"]),
                FigureRule::new(Figure::Receivables, &["Créances clients", "Clients"]),
                FigureRule::new(Figure::Inventory, &["Stocks", "Stocks et en-cours"]),
                FigureRule::new(Figure::FixedAssets, &["Actif immobilisé", "Immobilisations"]),
                FigureRule::new(Figure::Payables, &["Dettes fournisseurs", "Fournisseurs"]),
                FigureRule::new(
                    Figure::ShortTermDebt,
                    &["Emprunts à court terme", "Concours bancaires courants"],
                ),
                FigureRule::new(
                    Figure::LongTermDebt,
                    &["Dettes à long terme", "Emprunts et dettes à long terme"],
                ),
                FigureRule::new(Figure::Equity, &["Capitaux propres"]),
                FigureRule::new(
                    Figure::InterestExpense,
                    &["Charges financières", "Charges d'intérêts"],
                ),
            ],
        }
    }
}

impl FigureMapping {
    fn rule_for(&self, node_name: &str) -> Option<Figure> {
        self.rules
            .iter()
            .find(|rule| rule.matches(node_name))
            .map(|rule| rule.figure)
    }

    /// Reads ratio inputs out of an aggregated statement.
    ///
    /// A matching sub-category contributes its whole subtotal and its types are
    /// not examined; otherwise each matching type contributes its subtotal.
    /// Revenue and expenses are the totals of the layout's income categories.
    pub fn extract(
        &self,
        tree: &StatementTree,
        layout: &StatementLayout,
    ) -> (BalanceFigures, IncomeFigures) {
        let mut balance = BalanceFigures::default();
        let mut interest_expense = 0.0;

        for root in &tree.roots {
            for sub in &root.children {
                if let Some(figure) = self.rule_for(&sub.name) {
                    debug!("Mapped sub-category '{}' to {:?}", sub.name, figure);
                    add_to(&mut balance, &mut interest_expense, figure, sub);
                    continue;
                }
                for rubrique_type in &sub.children {
                    if let Some(figure) = self.rule_for(&rubrique_type.name) {
                        debug!("Mapped type '{}' to {:?}", rubrique_type.name, figure);
                        add_to(&mut balance, &mut interest_expense, figure, rubrique_type);
                    }
                }
            }
        }

        let income = IncomeFigures {
            revenue: tree.category_total(&layout.revenue_category).unwrap_or(0.0),
            expenses: tree.category_total(&layout.expense_category).unwrap_or(0.0),
            interest_expense,
        };

        (balance, income)
    }
}

fn add_to(
    balance: &mut BalanceFigures,
    interest_expense: &mut f64,
    figure: Figure,
    node: &AggregateNode,
) {
    let slot = match figure {
        Figure::Cash => &mut balance.cash,
        Figure::Receivables => &mut balance.receivables,
        Figure::Inventory => &mut balance.inventory,
        Figure::FixedAssets => &mut balance.fixed_assets,
        Figure::Payables => &mut balance.payables,
        Figure::ShortTermDebt => &mut balance.short_term_debt,
        Figure::LongTermDebt => &mut balance.long_term_debt,
        Figure::Equity => &mut balance.equity,
        Figure::InterestExpense => interest_expense,
    };
    *slot += node.value;
}
