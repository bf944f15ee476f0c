//! Plain-text renderings of an analysis: a markdown summary and a CSV export
//! of the aggregated tree.

use crate::aggregator::{AggregateNode, NodeLevel, StatementTree};
use crate::analysis::FinancialAnalysis;
use crate::schema::RecommendationLevel;
use std::fmt::Write;

pub const CSV_HEADER: &str = "Category,SubCategory,Type,Item,Value";

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn to_markdown(analysis: &FinancialAnalysis) -> String {
    let mut out = String::new();

    let _ = write!(out, "# Analyse financière");
    if let Some(company) = &analysis.company {
        let _ = write!(out, " : {}", company.name);
    }
    if let Some(year) = analysis.year {
        let _ = write!(out, " ({})", year);
    }
    out.push_str("\n\n");

    for category in &analysis.statement.roots {
        write_category(&mut out, category);
    }

    let imbalance = &analysis.statement.imbalance;
    if imbalance.detected {
        let _ = writeln!(out, "> Déséquilibre détecté : {}\n", amount(imbalance.amount));
    }

    out.push_str("## Ratios\n\n");
    out.push_str("| Ratio | Valeur | Interprétation |\n");
    out.push_str("|---|---:|---|\n");
    for ratio in analysis.ratios.iter() {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            ratio.name,
            ratio.display_value(),
            ratio.display_interpretation()
        );
    }

    if !analysis.recommendations.is_empty() {
        out.push_str("\n## Recommandations\n\n");
        for recommendation in &analysis.recommendations {
            let marker = match recommendation.level {
                RecommendationLevel::Success => "✔",
                RecommendationLevel::Warning => "⚠",
                RecommendationLevel::Info => "ℹ",
            };
            let _ = writeln!(out, "- {} {}", marker, recommendation.message);
        }
    }

    out
}

fn write_category(out: &mut String, category: &AggregateNode) {
    let _ = writeln!(out, "## {}\n", category.name);
    out.push_str("| Rubrique | Montant |\n");
    out.push_str("|---|---:|\n");

    for sub in &category.children {
        let _ = writeln!(out, "| **{}** | |", sub.name);
        for rubrique_type in &sub.children {
            let _ = writeln!(out, "| {} | {} |", rubrique_type.name, amount(rubrique_type.value));
            for item in &rubrique_type.children {
                let _ = writeln!(out, "| &nbsp;&nbsp;{} | {} |", item.name, amount(item.value));
            }
        }
        let _ = writeln!(out, "| Total {} | {} |", sub.name, amount(sub.value));
    }

    let _ = writeln!(out, "| **Total {}** | **{}** |\n", category.name, amount(category.value));
}

/// One row per node, parents before children, deeper columns left empty.
pub fn to_csv(tree: &StatementTree) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    let mut path: Vec<&str> = Vec::with_capacity(4);
    for root in &tree.roots {
        write_csv_rows(&mut out, root, &mut path);
    }
    out
}

fn write_csv_rows<'a>(out: &mut String, node: &'a AggregateNode, path: &mut Vec<&'a str>) {
    path.push(&node.name);

    for column in 0..4 {
        let field = path.get(column).copied().unwrap_or("");
        out.push_str(&csv_field(field));
        out.push(',');
    }
    out.push_str(&amount(node.value));
    out.push('\n');

    if node.level != NodeLevel::Item {
        for child in &node.children {
            write_csv_rows(out, child, path);
        }
    }

    path.pop();
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
