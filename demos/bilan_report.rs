use financial_statement_analyzer::{
    to_csv, to_markdown, Category, InMemorySource, LineItem, Recommendation, RecommendationLevel,
    RubriqueType, StatementAnalyzer, SubCategory, Taxonomy,
};

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

fn main() {
    let taxonomy = Taxonomy {
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
            rubrique_type(200, "Capital social", 20),
            rubrique_type(210, "Emprunts et dettes à long terme", 21),
            rubrique_type(220, "Dettes fournisseurs", 22),
            rubrique_type(300, "Ventes de marchandises", 30),
            rubrique_type(400, "Achats consommés", 40),
            rubrique_type(401, "Charges de personnel", 40),
            rubrique_type(410, "Intérêts des emprunts", 41),
        ],
        accounts: vec![],
    };

    let items_2023 = vec![
        LineItem::new(100, "Four professionnel", 80_000.0),
        LineItem::new(110, "Farine et matières premières", 6_000.0),
        LineItem::new(111, "Clients professionnels", 4_000.0),
        LineItem::new(112, "Banque", 20_000.0),
        LineItem::new(200, "Capital", 50_000.0),
        LineItem::new(210, "Prêt d'équipement", 45_000.0),
        LineItem::new(220, "Meunerie", 15_000.0),
        LineItem::new(300, "Ventes boutique", 210_000.0),
        LineItem::new(400, "Achats matières", 90_000.0),
        LineItem::new(401, "Salaires", 95_000.0),
        LineItem::new(410, "Intérêts du prêt", 2_500.0),
    ];

    // Same year with a payable keyed in twice.
    let mut items_2024 = items_2023.clone();
    items_2024.push(LineItem::new(220, "Meunerie (doublon)", 1_500.0));

    let source = InMemorySource::new(taxonomy)
        .with_company(1, "Boulangerie Martin")
        .with_statement(1, 2023, items_2023)
        .with_statement(1, 2024, items_2024)
        .with_recommendations(
            1,
            2023,
            vec![Recommendation {
                level: RecommendationLevel::Success,
                message: "Marge nette supérieure à 10 %".to_string(),
            }],
        );

    let analyzer = StatementAnalyzer::default();

    for year in [2023, 2024] {
        let analysis = analyzer
            .analyze_from_source(&source, 1, year)
            .expect("demo statement should analyze");

        println!("{}", to_markdown(&analysis));

        if analysis.is_balanced() {
            println!("✅ Bilan équilibré\n");
        } else {
            println!(
                "⚠️  Écart de {:.2} entre l'actif et le passif\n",
                analysis.statement.imbalance.amount
            );
        }

        if year == 2023 {
            println!("```csv\n{}```\n", to_csv(&analysis.statement));
        }
    }
}
