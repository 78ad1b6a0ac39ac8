use super::RulesError;
use crate::scoring::normalizer::normalize_text;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

const TABLE: &str = "category";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Specific building use; a keyword hit is strong evidence.
    Standard,
    /// Broad bucket such as "mixed use"; a hit is weaker evidence.
    Generic,
    /// Presumed contamination; always scores zero.
    Hazard,
    /// Returned when nothing matches.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingCategory {
    pub id: String,
    pub label: String,
    pub kind: CategoryKind,
    pub base_score: u8,
    /// Normalized keywords in table order.
    pub keywords: Vec<String>,
}

impl BuildingCategory {
    pub fn is_hazard(&self) -> bool {
        self.kind == CategoryKind::Hazard
    }

    pub fn is_generic(&self) -> bool {
        self.kind == CategoryKind::Generic
    }
}

/// Canonical, ordered category list. Table order is the classifier's tie-breaker.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<BuildingCategory>,
    fallback: usize,
}

impl CategoryTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RulesError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut categories = Vec::new();

        for (index, row) in csv_reader.deserialize::<CategoryRow>().enumerate() {
            let row = row.map_err(|source| RulesError::Csv {
                table: TABLE,
                source,
            })?;
            categories.push(row.into_category(index + 1)?);
        }

        Self::from_categories(categories)
    }

    pub fn from_categories(categories: Vec<BuildingCategory>) -> Result<Self, RulesError> {
        if categories.is_empty() {
            return Err(RulesError::Empty { table: TABLE });
        }

        let mut seen = HashSet::with_capacity(categories.len());
        for (index, category) in categories.iter().enumerate() {
            if !seen.insert(category.id.as_str()) {
                return Err(RulesError::Duplicate {
                    table: TABLE,
                    key: category.id.clone(),
                });
            }
            validate(category, index + 1)?;
        }

        let fallbacks: Vec<usize> = categories
            .iter()
            .enumerate()
            .filter(|(_, category)| category.kind == CategoryKind::Fallback)
            .map(|(index, _)| index)
            .collect();
        let fallback = match fallbacks.as_slice() {
            [only] => *only,
            other => return Err(RulesError::FallbackCount { found: other.len() }),
        };

        Ok(Self {
            categories,
            fallback,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildingCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BuildingCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn fallback(&self) -> &BuildingCategory {
        &self.categories[self.fallback]
    }
}

fn validate(category: &BuildingCategory, row: usize) -> Result<(), RulesError> {
    let invalid = |reason: String| RulesError::InvalidRow {
        table: TABLE,
        row,
        reason,
    };

    if category.id.is_empty() {
        return Err(invalid("category id is blank".to_string()));
    }
    if category.base_score > 100 {
        return Err(invalid(format!(
            "base score {} exceeds 100",
            category.base_score
        )));
    }

    match category.kind {
        CategoryKind::Hazard if category.base_score != 0 => Err(invalid(format!(
            "hazard category '{}' must score 0, found {}",
            category.id, category.base_score
        ))),
        CategoryKind::Standard | CategoryKind::Generic | CategoryKind::Fallback
            if category.base_score == 0 =>
        {
            Err(invalid(format!(
                "only hazard categories may score 0 ('{}')",
                category.id
            )))
        }
        CategoryKind::Fallback if !category.keywords.is_empty() => Err(invalid(format!(
            "fallback category '{}' must not list keywords",
            category.id
        ))),
        CategoryKind::Standard | CategoryKind::Generic | CategoryKind::Hazard
            if category.keywords.is_empty() =>
        {
            Err(invalid(format!(
                "category '{}' has no keywords",
                category.id
            )))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    label: String,
    kind: CategoryKind,
    base_score: u8,
    #[serde(default)]
    keywords: String,
}

impl CategoryRow {
    fn into_category(self, row: usize) -> Result<BuildingCategory, RulesError> {
        let mut keywords: Vec<String> = Vec::new();
        for keyword in self.keywords.split('|').map(normalize_text) {
            if keyword.is_empty() || keywords.contains(&keyword) {
                continue;
            }
            keywords.push(keyword);
        }

        if self.label.is_empty() {
            return Err(RulesError::InvalidRow {
                table: TABLE,
                row,
                reason: format!("category '{}' has no label", self.id),
            });
        }

        Ok(BuildingCategory {
            id: self.id,
            label: self.label,
            kind: self.kind,
            base_score: self.base_score,
            keywords,
        })
    }
}
