use crate::error::{AnalysisError, Result};
use crate::schema::{
    AccountId, Category, CategoryId, ChartAccount, RubriqueType, SubCategory, SubCategoryId,
    Taxonomy, TypeId,
};
use log::debug;
use std::collections::HashMap;

/// The category, sub-category and type a rubrique type resolves to.
#[derive(Debug, Clone, Copy)]
pub struct Lineage<'a> {
    pub category: &'a Category,
    pub sub_category: &'a SubCategory,
    pub rubrique_type: &'a RubriqueType,
}

/// Id-indexed view over a [`Taxonomy`], built once and passed explicitly.
///
/// Construction checks every parent reference, so any lookup that succeeds
/// can walk up to its category without further failure.
#[derive(Debug, Clone)]
pub struct TaxonomyIndex {
    taxonomy: Taxonomy,
    category_pos: HashMap<CategoryId, usize>,
    sub_category_pos: HashMap<SubCategoryId, usize>,
    type_pos: HashMap<TypeId, usize>,
    account_pos: HashMap<AccountId, usize>,
}

impl TaxonomyIndex {
    pub fn build(taxonomy: &Taxonomy) -> Result<Self> {
        let category_pos = index_ids("categories", &taxonomy.categories, |c| c.id)?;
        let sub_category_pos =
            index_ids("sub-categories", &taxonomy.sub_categories, |s| s.id)?;
        let type_pos = index_ids("types", &taxonomy.types, |t| t.id)?;
        let account_pos = index_ids("accounts", &taxonomy.accounts, |a| a.id)?;

        for sub in &taxonomy.sub_categories {
            if !category_pos.contains_key(&sub.category_id) {
                return Err(AnalysisError::UnknownCategory {
                    id: sub.category_id,
                    referenced_by: format!("sub-category {} '{}'", sub.id, sub.name),
                });
            }
        }

        for rtype in &taxonomy.types {
            if !sub_category_pos.contains_key(&rtype.sub_category_id) {
                return Err(AnalysisError::UnknownSubCategory {
                    id: rtype.sub_category_id,
                    referenced_by: format!("type {} '{}'", rtype.id, rtype.name),
                });
            }
        }

        for account in &taxonomy.accounts {
            if !type_pos.contains_key(&account.type_id) {
                return Err(AnalysisError::UnknownType {
                    type_id: account.type_id,
                });
            }
        }

        debug!(
            "Indexed taxonomy: {} categories, {} sub-categories, {} types, {} accounts",
            taxonomy.categories.len(),
            taxonomy.sub_categories.len(),
            taxonomy.types.len(),
            taxonomy.accounts.len()
        );

        Ok(Self {
            taxonomy: taxonomy.clone(),
            category_pos,
            sub_category_pos,
            type_pos,
            account_pos,
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn categories(&self) -> &[Category] {
        &self.taxonomy.categories
    }

    pub fn category(&self, id: CategoryId) -> Result<&Category> {
        self.category_pos
            .get(&id)
            .map(|&pos| &self.taxonomy.categories[pos])
            .ok_or_else(|| AnalysisError::UnknownCategory {
                id,
                referenced_by: "lookup".to_string(),
            })
    }

    pub fn sub_category(&self, id: SubCategoryId) -> Result<&SubCategory> {
        self.sub_category_pos
            .get(&id)
            .map(|&pos| &self.taxonomy.sub_categories[pos])
            .ok_or_else(|| AnalysisError::UnknownSubCategory {
                id,
                referenced_by: "lookup".to_string(),
            })
    }

    pub fn rubrique_type(&self, id: TypeId) -> Result<&RubriqueType> {
        self.type_pos
            .get(&id)
            .map(|&pos| &self.taxonomy.types[pos])
            .ok_or(AnalysisError::UnknownType { type_id: id })
    }

    pub fn account(&self, id: AccountId) -> Result<&ChartAccount> {
        self.account_pos
            .get(&id)
            .map(|&pos| &self.taxonomy.accounts[pos])
            .ok_or(AnalysisError::UnknownAccount(id))
    }

    pub fn lineage(&self, type_id: TypeId) -> Result<Lineage<'_>> {
        let rubrique_type = self.rubrique_type(type_id)?;
        let sub_category = self.sub_category(rubrique_type.sub_category_id)?;
        let category = self.category(sub_category.category_id)?;

        Ok(Lineage {
            category,
            sub_category,
            rubrique_type,
        })
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.taxonomy.categories.iter().find(|c| c.name == name)
    }

    /// Sub-categories of a category, in taxonomy order.
    pub fn sub_categories_of(
        &self,
        category_id: CategoryId,
    ) -> impl Iterator<Item = &SubCategory> + '_ {
        self.taxonomy
            .sub_categories
            .iter()
            .filter(move |s| s.category_id == category_id)
    }

    /// Rubrique types of a sub-category, in taxonomy order.
    pub fn types_of(
        &self,
        sub_category_id: SubCategoryId,
    ) -> impl Iterator<Item = &RubriqueType> + '_ {
        self.taxonomy
            .types
            .iter()
            .filter(move |t| t.sub_category_id == sub_category_id)
    }

    /// Rubrique types whose sub-category belongs to the category.
    pub fn types_in_category(
        &self,
        category_id: CategoryId,
    ) -> impl Iterator<Item = &RubriqueType> + '_ {
        self.taxonomy.types.iter().filter(move |t| {
            self.sub_category_pos
                .get(&t.sub_category_id)
                .map(|&pos| self.taxonomy.sub_categories[pos].category_id == category_id)
                .unwrap_or(false)
        })
    }

    pub fn accounts_of(&self, type_id: TypeId) -> impl Iterator<Item = &ChartAccount> + '_ {
        self.taxonomy
            .accounts
            .iter()
            .filter(move |a| a.type_id == type_id)
    }
}

fn index_ids<T>(
    table: &'static str,
    rows: &[T],
    id_of: impl Fn(&T) -> u32,
) -> Result<HashMap<u32, usize>> {
    let mut positions = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        let id = id_of(row);
        if positions.insert(id, pos).is_some() {
            return Err(AnalysisError::DuplicateId { table, id });
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_taxonomy;

    #[test]
    fn test_lineage_resolves_to_category() {
        let index = TaxonomyIndex::build(&sample_taxonomy()).unwrap();
        let lineage = index.lineage(112).unwrap();

        assert_eq!(lineage.rubrique_type.name, "Trésorerie");
        assert_eq!(lineage.sub_category.name, "Actif circulant");
        assert_eq!(lineage.category.name, "Actif");
    }

    #[test]
    fn test_children_preserve_taxonomy_order() {
        let index = TaxonomyIndex::build(&sample_taxonomy()).unwrap();

        let subs: Vec<u32> = index.sub_categories_of(2).map(|s| s.id).collect();
        assert_eq!(subs, vec![20, 21, 22]);

        let types: Vec<&str> = index.types_of(11).map(|t| t.name.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "Stocks",
                "Créances clients",
                "Trésorerie",
                "Valeurs mobilières de placement"
            ]
        );

        let in_actif = index.types_in_category(1).count();
        assert_eq!(in_actif, 5);
    }

    #[test]
    fn test_unknown_type_lookup_fails() {
        let index = TaxonomyIndex::build(&sample_taxonomy()).unwrap();
        let err = index.rubrique_type(999).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownType { type_id: 999 }));
        assert!(err.is_reference_error());
    }

    #[test]
    fn test_dangling_sub_category_rejected() {
        let mut taxonomy = sample_taxonomy();
        taxonomy.types.push(RubriqueType {
            id: 999,
            name: "Orphan".to_string(),
            sub_category_id: 77,
        });

        let err = TaxonomyIndex::build(&taxonomy).unwrap_err();
        match err {
            AnalysisError::UnknownSubCategory { id, referenced_by } => {
                assert_eq!(id, 77);
                assert!(referenced_by.contains("Orphan"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_category_rejected() {
        let mut taxonomy = sample_taxonomy();
        taxonomy.sub_categories[0].category_id = 42;

        let err = TaxonomyIndex::build(&taxonomy).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownCategory { id: 42, .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut taxonomy = sample_taxonomy();
        let duplicate = taxonomy.types[0].clone();
        taxonomy.types.push(duplicate);

        let err = TaxonomyIndex::build(&taxonomy).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DuplicateId {
                table: "types",
                id: 100
            }
        ));
    }

    #[test]
    fn test_accounts_of_type() {
        let index = TaxonomyIndex::build(&sample_taxonomy()).unwrap();
        let labels: Vec<&str> = index.accounts_of(112).map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Banque", "Caisse"]);
        assert_eq!(index.account(1121).unwrap().code.as_deref(), Some("53"));
        assert!(matches!(
            index.account(5).unwrap_err(),
            AnalysisError::UnknownAccount(5)
        ));
    }
}
