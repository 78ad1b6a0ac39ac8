use super::normalizer::normalize_text;
use super::tables::{BuildingCategory, CategoryTable};

/// Category chosen for a use description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub category: &'a BuildingCategory,
    /// Normalized keyword that selected `category`; `None` for the fallback.
    pub matched_keyword: Option<&'a str>,
}

impl Classification<'_> {
    pub fn matched(&self) -> bool {
        self.matched_keyword.is_some()
    }
}

/// Keyword matcher over the canonical category table.
///
/// Every keyword of every category is tested for case-insensitive containment in the
/// description. When several hit, the longest keyword wins and equal lengths go to the
/// category listed first in the table. Nothing matching yields the fallback category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryClassifier<'a> {
    table: &'a CategoryTable,
}

impl<'a> CategoryClassifier<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, use_description: &str) -> Classification<'a> {
        self.classify_normalized(&normalize_text(use_description))
    }

    pub(crate) fn classify_normalized(&self, description: &str) -> Classification<'a> {
        let table: &'a CategoryTable = self.table;
        let mut best: Option<(&'a BuildingCategory, &'a str)> = None;

        if !description.is_empty() {
            for category in table.iter() {
                for keyword in &category.keywords {
                    if !description.contains(keyword.as_str()) {
                        continue;
                    }

                    let longer = match best {
                        Some((_, current)) => keyword.chars().count() > current.chars().count(),
                        None => true,
                    };
                    if longer {
                        best = Some((category, keyword.as_str()));
                    }
                }
            }
        }

        match best {
            Some((category, keyword)) => Classification {
                category,
                matched_keyword: Some(keyword),
            },
            None => Classification {
                category: table.fallback(),
                matched_keyword: None,
            },
        }
    }
}
