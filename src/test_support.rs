//! Shared fixtures for unit tests.

use crate::schema::{Category, ChartAccount, LineItem, RubriqueType, SubCategory, Taxonomy};

fn category(id: u32, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
    }
}

fn sub_category(id: u32, name: &str, category_id: u32) -> SubCategory {
    SubCategory {
        id,
        name: name.to_string(),
        category_id,
    }
}

fn rubrique_type(id: u32, name: &str, sub_category_id: u32) -> RubriqueType {
    RubriqueType {
        id,
        name: name.to_string(),
        sub_category_id,
    }
}

fn account(id: u32, label: &str, code: &str, type_id: u32) -> ChartAccount {
    ChartAccount {
        id,
        label: label.to_string(),
        code: Some(code.to_string()),
        type_id,
    }
}

pub fn sample_taxonomy() -> Taxonomy {
    Taxonomy {
        categories: vec![
            category(1, "Actif"),
            category(2, "Capitaux propres et passifs"),
            category(3, "Produits"),
            category(4, "Charges"),
        ],
        sub_categories: vec![
            sub_category(10, "Actif immobilisé", 1),
            sub_category(11, "Actif circulant", 1),
            sub_category(20, "Capitaux propres", 2),
            sub_category(21, "Dettes à long terme", 2),
            sub_category(22, "Dettes à court terme", 2),
            sub_category(30, "Produits d'exploitation", 3),
            sub_category(40, "Charges d'exploitation", 4),
            sub_category(41, "Charges financières", 4),
        ],
        types: vec![
            rubrique_type(100, "Immobilisations", 10),
            rubrique_type(110, "Stocks", 11),
            rubrique_type(111, "Créances clients", 11),
            rubrique_type(112, "Trésorerie", 11),
            rubrique_type(113, "Valeurs mobilières de placement", 11),
            rubrique_type(200, "Capital social", 20),
            rubrique_type(201, "Réserves", 20),
            rubrique_type(210, "Emprunts et dettes à long terme", 21),
            rubrique_type(220, "Dettes fournisseurs", 22),
            rubrique_type(221, "Emprunts à court terme", 22),
            rubrique_type(300, "Ventes de marchandises", 30),
            rubrique_type(400, "Achats consommés", 40),
            rubrique_type(401, "Charges de personnel", 40),
            rubrique_type(410, "Intérêts des emprunts", 41),
        ],
        accounts: vec![
            account(1000, "Matériel industriel", "215", 100),
            account(1120, "Banque", "512", 112),
            account(1121, "Caisse", "53", 112),
            account(2200, "Fournisseurs", "401", 220),
            account(3000, "Ventes", "707", 300),
        ],
    }
}

/// A balanced statement: Actif = Passif = 525 000, revenue 500 000, expenses 450 000.
pub fn sample_items() -> Vec<LineItem> {
    vec![
        LineItem::new(100, "Matériel industriel", 300_000.0).with_account(1000),
        LineItem::new(110, "Marchandises", 75_000.0),
        LineItem::new(111, "Clients", 50_000.0),
        LineItem::new(112, "Banque", 90_000.0).with_account(1120),
        LineItem::new(112, "Caisse", 10_000.0).with_account(1121),
        LineItem::new(200, "Capital", 200_000.0),
        LineItem::new(201, "Réserve légale", 50_000.0),
        LineItem::new(210, "Emprunt bancaire", 200_000.0),
        LineItem::new(220, "Fournisseurs", 45_000.0).with_account(2200),
        LineItem::new(221, "Découvert", 30_000.0),
        LineItem::new(300, "Ventes", 500_000.0).with_account(3000),
        LineItem::new(400, "Achats", 300_000.0),
        LineItem::new(401, "Salaires", 140_000.0),
        LineItem::new(410, "Intérêts", 10_000.0),
    ]
}
