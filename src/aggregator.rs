use crate::balancer::{BalanceChecker, Imbalance};
use crate::config::StatementLayout;
use crate::error::{AnalysisError, Result};
use crate::schema::{LineItem, RubriqueType, TypeId};
use crate::taxonomy::TaxonomyIndex;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeLevel {
    Category,
    SubCategory,
    Type,
    Item,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateNode {
    pub name: String,
    pub level: NodeLevel,
    /// Taxonomy id at this level; for items, the chart account if one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AggregateNode>,
}

impl AggregateNode {
    pub fn is_leaf(&self) -> bool {
        self.level == NodeLevel::Item
    }

    /// Depth-first search by exact name, including `self`.
    pub fn find(&self, name: &str) -> Option<&AggregateNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Sum of every leaf amount under this node.
    pub fn leaf_sum(&self) -> f64 {
        if self.is_leaf() {
            return self.value;
        }
        self.children.iter().map(AggregateNode::leaf_sum).sum()
    }
}

/// Builds one root per taxonomy category from a flat set of line items.
///
/// Fails on the first item whose type is unknown; no partial tree is produced.
/// Type groups (and individual items) worth exactly zero are left out of the
/// tree, but every subtotal still covers them.
pub fn aggregate(items: &[LineItem], index: &TaxonomyIndex) -> Result<Vec<AggregateNode>> {
    let mut by_type: HashMap<TypeId, Vec<&LineItem>> = HashMap::new();

    for item in items {
        validate_amount(item)?;
        index.rubrique_type(item.type_id)?;
        by_type.entry(item.type_id).or_default().push(item);
    }

    let mut roots = Vec::with_capacity(index.categories().len());
    let mut suppressed = 0usize;

    for category in index.categories() {
        let mut sub_nodes = Vec::new();

        for sub in index.sub_categories_of(category.id) {
            let mut type_nodes = Vec::new();
            let mut subtotal = 0.0;

            for rubrique_type in index.types_of(sub.id) {
                let members = by_type
                    .get(&rubrique_type.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let node = type_node(rubrique_type, members);

                subtotal += node.value;
                if node.value == 0.0 {
                    suppressed += 1;
                    continue;
                }
                type_nodes.push(node);
            }

            sub_nodes.push(AggregateNode {
                name: sub.name.clone(),
                level: NodeLevel::SubCategory,
                id: Some(sub.id),
                value: subtotal,
                children: type_nodes,
            });
        }

        let total = sub_nodes.iter().map(|n| n.value).fold(0.0, |acc, v| acc + v);

        roots.push(AggregateNode {
            name: category.name.clone(),
            level: NodeLevel::Category,
            id: Some(category.id),
            value: total,
            children: sub_nodes,
        });
    }

    debug!(
        "Aggregated {} line items into {} categories ({} zero-valued type groups hidden)",
        items.len(),
        roots.len(),
        suppressed
    );

    Ok(roots)
}

fn type_node(rubrique_type: &RubriqueType, members: &[&LineItem]) -> AggregateNode {
    let mut value = 0.0;
    let mut children = Vec::with_capacity(members.len());

    for item in members {
        value += item.amount;
        if item.amount == 0.0 {
            continue;
        }
        children.push(AggregateNode {
            name: item.label.clone(),
            level: NodeLevel::Item,
            id: item.account_id,
            value: item.amount,
            children: Vec::new(),
        });
    }

    AggregateNode {
        name: rubrique_type.name.clone(),
        level: NodeLevel::Type,
        id: Some(rubrique_type.id),
        value,
        children,
    }
}

fn validate_amount(item: &LineItem) -> Result<()> {
    if !item.amount.is_finite() {
        return Err(AnalysisError::InvalidEntry {
            field: "montant",
            details: format!("'{}' has non-finite amount {}", item.label, item.amount),
        });
    }
    if item.amount < 0.0 {
        return Err(AnalysisError::NegativeAmount {
            label: item.label.clone(),
            amount: item.amount,
        });
    }
    Ok(())
}

/// An aggregated statement for one company/year together with its balance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTree {
    pub roots: Vec<AggregateNode>,
    pub imbalance: Imbalance,
}

impl StatementTree {
    pub fn build(
        items: &[LineItem],
        index: &TaxonomyIndex,
        layout: &StatementLayout,
    ) -> Result<Self> {
        let roots = aggregate(items, index)?;
        let imbalance = BalanceChecker::new(layout).check(&roots);
        Ok(Self { roots, imbalance })
    }

    pub fn category(&self, name: &str) -> Option<&AggregateNode> {
        self.roots.iter().find(|root| root.name == name)
    }

    pub fn category_total(&self, name: &str) -> Option<f64> {
        self.category(name).map(|root| root.value)
    }

    pub fn find(&self, name: &str) -> Option<&AggregateNode> {
        self.roots.iter().find_map(|root| root.find(name))
    }

    /// Asset and liability sides, in layout order, when present.
    pub fn balance_sheet<'a>(&'a self, layout: &StatementLayout) -> Vec<&'a AggregateNode> {
        [&layout.asset_category, &layout.liability_category]
            .into_iter()
            .filter_map(|name| self.category(name))
            .collect()
    }

    /// Revenue and expense sides, in layout order, when present.
    pub fn income_statement<'a>(&'a self, layout: &StatementLayout) -> Vec<&'a AggregateNode> {
        [&layout.revenue_category, &layout.expense_category]
            .into_iter()
            .filter_map(|name| self.category(name))
            .collect()
    }
}
